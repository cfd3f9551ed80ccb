//! Glyph assets embedded into the binary with `rust-embed`.

use bomber::{AssetError, AssetRegistry};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// Names the client waits for before building a frontend.
pub const REQUIRED: [&str; 3] = ["bomb", "tombstone", "heroes"];

/// Feeds every embedded glyph file into a fresh registry.
pub fn load_registry() -> Result<AssetRegistry, AssetError> {
    let mut registry = AssetRegistry::new(REQUIRED);
    for name in REQUIRED {
        let path = format!("{}.txt", name);
        let file = Assets::get(&path).ok_or_else(|| AssetError::Missing(path.clone()))?;
        registry.insert(name, file.data.into_owned())?;
    }
    Ok(registry)
}

/// Two-column cell glyphs used by the terminal renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub bomb: String,
    pub tombstone: String,
    pub heroes: Vec<String>,
}

impl Glyphs {
    pub fn from_registry(registry: &AssetRegistry) -> Result<Self, AssetError> {
        let heroes: Vec<String> = text(registry, "heroes")?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(cell)
            .collect();
        if heroes.is_empty() {
            return Err(AssetError::Missing("heroes".to_string()));
        }

        Ok(Self {
            bomb: cell(text(registry, "bomb")?.trim_end()),
            tombstone: cell(text(registry, "tombstone")?.trim_end()),
            heroes,
        })
    }

    /// Glyph for a player's figure index, wrapping around the set.
    pub fn hero(&self, figure: usize) -> &str {
        &self.heroes[figure % self.heroes.len()]
    }
}

fn text(registry: &AssetRegistry, name: &str) -> Result<String, AssetError> {
    registry
        .require(name)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

fn cell(raw: &str) -> String {
    let glyph: String = raw.chars().take(2).collect();
    format!("{:<2}", glyph)
}
