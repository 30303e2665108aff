//! Admin session: bearer token persistence and lifecycle
//!
//! The token lives in a small JSON file (`{"adminToken": "..."}`). A
//! missing, empty or unreadable file means nobody is logged in.

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::admin::{AdminService, Credentials};
use crate::types::{GocabError, Outcome, Result};

/// Key the token is stored under
pub const TOKEN_KEY: &str = "adminToken";

/// An authenticated admin session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    #[serde(rename = "adminToken")]
    admin_token: String,
}

/// File-backed token storage
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writers lock this sibling, since the token file is replaced by rename.
    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Read the stored token under a shared lock.
    pub fn load(&self) -> Option<String> {
        let lock = File::open(self.lock_path()).ok();
        if let Some(lock) = &lock {
            lock.lock_shared().ok()?;
        }

        let read = fs::read_to_string(&self.path);
        if let Some(lock) = &lock {
            let _ = lock.unlock();
        }
        let content = read.ok()?;

        let stored: StoredToken = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                return None;
            }
        };
        let token = stored.admin_token.trim().to_string();
        (!token.is_empty()).then_some(token)
    }

    /// Save using atomic write (temp file + rename) while holding an
    /// exclusive lock. The file is readable by the owner only.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&StoredToken {
            admin_token: token.to_string(),
        })
        .map_err(|e| GocabError::Session(format!("Serialization failed: {}", e)))?;

        let lock = self.write_lock()?;
        let written = self.replace_with(content.as_bytes());
        let _ = lock.unlock();
        written
    }

    fn write_lock(&self) -> Result<File> {
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()
            .map_err(|e| GocabError::Session(format!("Failed to acquire write lock: {}", e)))?;
        Ok(lock)
    }

    fn replace_with(&self, content: &[u8]) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        // A leftover temp file would keep its old permissions
        let _ = fs::remove_file(&temp_path);
        {
            let mut file = private_file_options()
                .open(&temp_path)
                .map_err(|e| GocabError::Session(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content)
                .map_err(|e| GocabError::Session(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| GocabError::Session(format!("Failed to sync temp file: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| GocabError::Session(format!("Failed to rename temp file: {}", e)))
    }

    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let lock = self.write_lock()?;
        let removed = fs::remove_file(&self.path);
        let _ = lock.unlock();
        match removed {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

/// Owns the session lifecycle: created on login, dropped on logout
pub struct SessionManager {
    store: TokenStore,
}

impl SessionManager {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Session restored from the store, if any
    pub fn current(&self) -> Option<Session> {
        self.store.load().map(Session::new)
    }

    pub fn state(&self) -> SessionState {
        match self.current() {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        }
    }

    /// Authenticate and persist the issued token.
    pub fn login(&self, admin: &AdminService, credentials: &Credentials) -> Outcome<Session> {
        let token = match admin.login(credentials) {
            Outcome::Live(token) => token,
            Outcome::Degraded { data, .. } => data,
            Outcome::Failed { message, error } => return Outcome::Failed { message, error },
        };

        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "could not persist session token");
            return Outcome::failed_with("Logged in, but the session could not be saved", &e);
        }
        info!(path = %self.store.path().display(), "admin logged in");
        Outcome::Live(Session::new(token))
    }

    /// Tell the backend (best effort), then always forget the local token.
    pub fn logout(&self, admin: &AdminService) -> Outcome<()> {
        if let Some(session) = self.current() {
            if let Outcome::Failed { message, .. } = admin.logout(&session) {
                warn!(%message, "backend logout failed; clearing local session anyway");
            }
        }

        match self.store.clear() {
            Ok(()) => {
                info!("admin logged out");
                Outcome::Live(())
            }
            Err(e) => Outcome::failed_with("Could not clear the local session", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::HttpMethod;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TokenStore {
        TokenStore::new(dir.path().join("nested").join("session.json"))
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "admin@gocab.co".into(),
            password: "secret".into(),
        }
    }

    // ========== TokenStore ==========

    #[test]
    fn test_store_roundtrip_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("tok-123").unwrap();

        assert_eq!(store.load().as_deref(), Some("tok-123"));
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(TOKEN_KEY));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        // Stale temp file from an interrupted save, world-readable
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let temp_path = store.path().with_extension("json.tmp");
        fs::write(&temp_path, "{}").unwrap();
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o644)).unwrap();

        store.save("tok").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_store_lock_file_survives_rename() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("first").unwrap();
        store.save("second").unwrap();

        assert!(store.lock_path().exists());
        assert_ne!(store.lock_path(), store.path());
        assert_eq!(store.load().as_deref(), Some("second"));
    }

    #[test]
    fn test_store_concurrent_saves_are_serialized() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir).path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || TokenStore::new(path).save(&format!("tok-{}", i)))
            })
            .collect();
        for handle in handles {
            // Unserialized writers would collide on the shared temp file
            handle.join().unwrap().unwrap();
        }

        let token = TokenStore::new(path).load().unwrap();
        assert!(token.starts_with("tok-"));
    }

    #[test]
    fn test_store_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_none());
    }

    #[test]
    fn test_store_corrupt_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        fs::write(store.path(), "not valid json{{{").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_store_blank_token_is_none() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        fs::write(store.path(), r#"{"adminToken": "  "}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("t").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let rendered = format!("{:?}", Session::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    // ========== SessionManager ==========

    #[test]
    fn test_state_follows_store() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(store_in(&dir));
        assert_eq!(manager.state(), SessionState::Anonymous);

        manager.store().save("tok").unwrap();
        assert_eq!(manager.state(), SessionState::Authenticated);
        assert_eq!(manager.current().unwrap().token(), "tok");
    }

    #[test]
    fn test_login_persists_token() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(store_in(&dir));
        let admin = AdminService::new(Box::new(ScriptedTransport::new().on(
            HttpMethod::Post,
            "/api/admin/login",
            200,
            json!({ "success": true, "token": "jwt-abc" }),
        )));

        let outcome = manager.login(&admin, &credentials());

        assert_eq!(outcome, Outcome::Live(Session::new("jwt-abc")));
        assert_eq!(manager.current(), Some(Session::new("jwt-abc")));
    }

    #[test]
    fn test_login_rejected_leaves_anonymous() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(store_in(&dir));
        let admin = AdminService::new(Box::new(ScriptedTransport::new().on(
            HttpMethod::Post,
            "/api/admin/login",
            401,
            json!({ "success": false, "message": "Invalid credentials" }),
        )));

        let outcome = manager.login(&admin, &credentials());

        assert_eq!(outcome.message(), Some("Invalid credentials"));
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_logout_clears_even_when_backend_down() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(store_in(&dir));
        manager.store().save("tok").unwrap();
        let transport = ScriptedTransport::offline();
        let log = transport.requests();
        let admin = AdminService::new(Box::new(transport));

        let outcome = manager.logout(&admin);

        assert_eq!(outcome, Outcome::Live(()));
        assert_eq!(manager.state(), SessionState::Anonymous);
        let requests = log.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_logout_when_anonymous_skips_backend() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(store_in(&dir));
        let transport = ScriptedTransport::offline();
        let log = transport.requests();
        let admin = AdminService::new(Box::new(transport));

        assert!(manager.logout(&admin).is_success());
        assert!(log.lock().unwrap().is_empty());
    }
}
