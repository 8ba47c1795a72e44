//! Session context
//!
//! Holds the logged-in user and bearer token. The context is an ordinary
//! value handed to whatever needs the token; the token is read at call time,
//! so nothing keeps using it after logout.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// The user record returned by the auth endpoints
///
/// Fields the editor doesn't use are kept in `extra` so the record survives
/// a trip through storage unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    /// Name to show in the UI, falling back to the email
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Persisted session values
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.token.is_none()
    }
}

/// Where the session survives between runs
pub trait SessionStorage: Send {
    /// Read the stored session; an absent store yields an empty session
    fn load(&self) -> Result<Session, SessionError>;

    fn store(&mut self, session: &Session) -> Result<(), SessionError>;

    fn clear(&mut self) -> Result<(), SessionError>;
}

/// JSON file in the platform data directory
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` under the platform data directory
    pub fn default_location() -> Result<Self, SessionError> {
        use directories::ProjectDirs;

        let proj_dirs = ProjectDirs::from("", "", "neverlost").ok_or(SessionError::NoDataDir)?;
        Ok(Self::new(proj_dirs.data_dir().join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn store(&mut self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)?;

        // Write to a temp file, then rename over the old one
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage for tests and throwaway runs
///
/// Clones share the same slot, so a test can keep one handle and inspect
/// what the context persisted.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// What is currently persisted, if anything
    pub fn stored(&self) -> Option<Session> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Session, SessionError> {
        Ok(self.stored().unwrap_or_default())
    }

    fn store(&mut self, session: &Session) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// The live session plus the storage it is mirrored to
pub struct SessionContext {
    session: Session,
    storage: Box<dyn SessionStorage>,
}

impl SessionContext {
    /// Restore the session from storage
    ///
    /// Missing or unreadable storage yields a logged-out session.
    pub fn hydrate(storage: impl SessionStorage + 'static) -> Self {
        let session = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Failed to restore session: {}", e);
                Session::default()
            }
        };
        if session.token.is_some() {
            log::debug!("Restored session token from storage");
        }
        Self {
            session,
            storage: Box::new(storage),
        }
    }

    /// A logged-out session that is never written anywhere durable
    pub fn ephemeral() -> Self {
        Self::hydrate(MemorySessionStorage::new())
    }

    /// Record a successful login and persist it
    ///
    /// The in-memory session is updated even if persisting fails.
    pub fn login(&mut self, user: UserRecord, token: impl Into<String>) -> Result<(), SessionError> {
        log::info!("Logged in as {}", user.display_name());
        self.session = Session {
            user: Some(user),
            token: Some(token.into()),
        };
        self.storage.store(&self.session)
    }

    /// Forget the user and token, including the persisted copies
    pub fn logout(&mut self) -> Result<(), SessionError> {
        log::info!("Logged out");
        self.session = Session::default();
        self.storage.clear()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.token.is_some()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.session.user)
            .field("token", &self.session.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRecord {
        serde_json::from_str(r#"{"_id": "u1", "username": "alice", "email": "a@example.com", "role": "admin"}"#)
            .unwrap()
    }

    #[test]
    fn test_user_record_keeps_extra_fields() {
        let user = alice();
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.extra["role"], "admin");

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["_id"], "u1");
    }

    #[test]
    fn test_login_logout_memory_storage() {
        let storage = MemorySessionStorage::new();
        let mut ctx = SessionContext::hydrate(storage.clone());
        assert!(!ctx.is_authenticated());

        ctx.login(alice(), "tok").unwrap();
        assert_eq!(ctx.token(), Some("tok"));
        assert_eq!(storage.stored().unwrap().token.as_deref(), Some("tok"));

        // A second context sees the persisted session
        let restored = SessionContext::hydrate(storage.clone());
        assert_eq!(restored.user().map(|u| u.username.as_str()), Some("alice"));

        ctx.logout().unwrap();
        assert_eq!(ctx.token(), None);
        assert!(ctx.user().is_none());
        assert!(storage.stored().is_none());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut ctx = SessionContext::hydrate(FileSessionStorage::new(&path));
        ctx.login(alice(), "file-token").unwrap();
        assert!(path.exists());

        let restored = SessionContext::hydrate(FileSessionStorage::new(&path));
        assert_eq!(restored.token(), Some("file-token"));

        ctx.logout().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine
        FileSessionStorage::new(&path).clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_hydrates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let ctx = SessionContext::hydrate(FileSessionStorage::new(&path));
        assert!(!ctx.is_authenticated());
        assert!(ctx.session().is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut ctx = SessionContext::ephemeral();
        ctx.login(alice(), "secret").unwrap();
        assert!(!format!("{:?}", ctx).contains("secret"));
    }
}
