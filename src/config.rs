//! Client configuration: backend base URLs, timeout, session file

use directories::BaseDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::ReqwestTransport;
use crate::types::{GocabError, Result};

/// Public catalog backend
pub const DEFAULT_API_BASE_URL: &str = "https://gocab-khaki.vercel.app";

/// Admin backend
pub const DEFAULT_ADMIN_API_BASE_URL: &str = "https://gocab-atsk.vercel.app";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub admin_api_base_url: String,
    pub timeout: Duration,
    pub session_path: PathBuf,
}

impl ClientConfig {
    pub fn new(
        api_base_url: &str,
        admin_api_base_url: &str,
        timeout_secs: u64,
        session_path: Option<PathBuf>,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(GocabError::Config("timeout must be at least 1 second".into()));
        }
        let session_path = match session_path {
            Some(path) => path,
            None => Self::default_session_path()?,
        };
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            admin_api_base_url: normalize_base_url(admin_api_base_url)?,
            timeout: Duration::from_secs(timeout_secs),
            session_path,
        })
    }

    /// Get the default session file path (~/.gocab/session.json)
    pub fn default_session_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| GocabError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".gocab").join("session.json"))
    }

    pub fn catalog_transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::new(&self.api_base_url, self.timeout)
    }

    pub fn admin_transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::new(&self.admin_api_base_url, self.timeout)
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(GocabError::Config(format!(
            "base URL must start with http:// or https://: '{}'",
            url
        )));
    }
    Ok(trimmed.to_string())
}
