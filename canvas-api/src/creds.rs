use std::env::{self, VarError};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use std::{fmt, fs, io};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://canvas.instructure.com/api/v1";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3001/api/canvas";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creds {
    token: String,
    base_url: String,
}

impl Creds {
    pub fn from_env() -> Result<Self, VarError> {
        let token = env::var("CANVAS_TOKEN")?;
        let base_url = match env::var("CANVAS_BASE_URL") {
            Ok(base_url) => base_url,
            Err(VarError::NotPresent) => DEFAULT_BASE_URL.to_owned(),
            Err(err) => return Err(err),
        };
        Ok(Self::new(token, base_url))
    }

    pub fn new(token: String, base_url: String) -> Self {
        Self { token, base_url }
    }

    pub fn with_default_base_url(token: String) -> Self {
        Self::new(token, DEFAULT_BASE_URL.to_owned())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for Creds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creds")
            .field("token", &"<hidden>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Where requests are actually sent. The proxy forwards them to `Creds::base_url`.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    proxy_url: String,
    timeout: Duration,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let proxy_url = env::var("CANVAS_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_URL.to_owned());
        Self::new(proxy_url)
    }

    pub fn new(proxy_url: String) -> Self {
        Self {
            proxy_url,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL.to_owned())
    }
}

/// Persistence for the credential between runs.
pub trait CredentialStore {
    fn get(&self) -> Result<Option<Creds>>;
    fn set(&self, creds: &Creds) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the credential as JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Creds>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("could not read credentials at {:?}", self.path));
            }
        };
        let creds = serde_json::from_str(&data)
            .with_context(|| format!("malformed credentials file {:?}", self.path))?;
        Ok(Some(creds))
    }

    #[tracing::instrument(skip(creds))]
    fn set(&self, creds: &Creds) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create directory {parent:?}"))?;
        }
        let data = serde_json::to_string_pretty(creds)?;
        fs::write(&self.path, data)
            .with_context(|| format!("could not write credentials to {:?}", self.path))?;
        debug!("stored credentials");
        Ok(())
    }

    #[tracing::instrument]
    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("could not remove credentials at {:?}", self.path))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    creds: Mutex<Option<Creds>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Creds>> {
        // A poisoned slot still holds a whole `Option<Creds>`
        self.creds.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Creds>> {
        Ok(self.slot().clone())
    }

    fn set(&self, creds: &Creds) -> Result<()> {
        *self.slot() = Some(creds.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
