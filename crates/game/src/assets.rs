//! Owned asset cache with a one-shot readiness signal.
//!
//! The client names every asset it needs up front. Loaders hand in bytes as
//! they arrive; the moment the last expected asset lands, every
//! [`AssetsReady`] handle resolves.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset {0:?} was never requested")]
    Unexpected(String),
    #[error("asset {0:?} was loaded twice")]
    Duplicate(String),
    #[error("asset {0:?} is not loaded")]
    Missing(String),
}

#[derive(Debug)]
pub struct AssetRegistry {
    expected: BTreeSet<String>,
    loaded: HashMap<String, Vec<u8>>,
    ready_tx: watch::Sender<bool>,
}

impl AssetRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let (ready_tx, _) = watch::channel(expected.is_empty());
        Self {
            expected,
            loaded: HashMap::new(),
            ready_tx,
        }
    }

    pub fn ready(&self) -> AssetsReady {
        AssetsReady {
            rx: self.ready_tx.subscribe(),
        }
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), AssetError> {
        if !self.expected.contains(name) {
            return Err(AssetError::Unexpected(name.to_string()));
        }
        if self.loaded.contains_key(name) {
            return Err(AssetError::Duplicate(name.to_string()));
        }

        log::debug!("Loaded asset {} ({} bytes)", name, bytes.len());
        self.loaded.insert(name.to_string(), bytes);

        if self.all_loaded() {
            log::info!("All {} assets loaded", self.expected.len());
            self.ready_tx.send_replace(true);
        }
        Ok(())
    }

    pub fn all_loaded(&self) -> bool {
        self.loaded.len() == self.expected.len()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.loaded.get(name).map(Vec::as_slice)
    }

    /// Asset contents as UTF-8, lossily.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn require(&self, name: &str) -> Result<&[u8], AssetError> {
        self.get(name)
            .ok_or_else(|| AssetError::Missing(name.to_string()))
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.expected
            .iter()
            .filter(|name| !self.loaded.contains_key(*name))
            .map(String::as_str)
    }
}

/// Resolves once every expected asset is in the registry.
#[derive(Debug, Clone)]
pub struct AssetsReady {
    rx: watch::Receiver<bool>,
}

impl AssetsReady {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Returns false if the registry was dropped before becoming ready.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}
