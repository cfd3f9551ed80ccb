use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TOKEN_RANGE: u64 = 1_000_001;

/// Client identity the server uses to hand back the same player after a
/// reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u32);

impl SessionToken {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn generate() -> Self {
        Self((rand_u64() % TOKEN_RANGE) as u32)
    }

    /// Reuse the stored token, minting and storing a new one only when absent.
    pub fn load_or_create<S: TokenStore + ?Sized>(store: &mut S) -> Result<Self, TokenError> {
        if let Some(token) = store.load()? {
            log::debug!("Reusing session token {}", token);
            return Ok(token);
        }

        let token = Self::generate();
        store.save(token)?;
        log::info!("Generated session token {}", token);
        Ok(token)
    }

    /// Appends `token=<value>` to a connection URL.
    pub fn apply_to(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}token={}", url, separator, self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn rand_u64() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default(),
    );
    hasher.finish()
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token file {} holds {:?}, not a number", .path.display(), .value)]
    Parse { path: PathBuf, value: String },
}

pub trait TokenStore {
    fn load(&self) -> Result<Option<SessionToken>, TokenError>;
    fn save(&mut self, token: SessionToken) -> Result<(), TokenError>;
}

/// Keeps the token for as long as the process runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Option<SessionToken>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, TokenError> {
        Ok(self.token)
    }

    fn save(&mut self, token: SessionToken) -> Result<(), TokenError> {
        self.token = Some(token);
        Ok(())
    }
}

/// Keeps the token in a file so it outlives client restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> TokenError {
        TokenError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, TokenError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let value = contents.trim();
        if value.is_empty() {
            return Ok(None);
        }

        value
            .parse()
            .map(|v| Some(SessionToken(v)))
            .map_err(|_| TokenError::Parse {
                path: self.path.clone(),
                value: value.to_string(),
            })
    }

    fn save(&mut self, token: SessionToken) -> Result<(), TokenError> {
        fs::write(&self.path, format!("{}\n", token)).map_err(|e| self.io_error(e))
    }
}
