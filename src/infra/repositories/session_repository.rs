//! Session persistence and the authorization gate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use parking_lot::Mutex;

use crate::config::{ADMIN_USER_NAME, SESSION_TTL_MS};
use crate::domain::Session;
use crate::errors::AppResult;
use crate::infra::snapshot;

/// Session repository trait for dependency injection.
///
/// Sessions are keyed by the owning user's id; a user has at most one.
/// Every method that mutates the store persists the snapshot before
/// returning, and any of those may surface a storage fault.
#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    /// Create a session for the user, replacing any existing session with
    /// that id. Returns `None` (and leaves the store untouched) when the
    /// user name is empty.
    fn create_session(&self, id: u32, user_name: &str) -> AppResult<Option<Session>>;

    /// Get a session by id.
    fn get_session(&self, id: u32) -> AppResult<Option<Session>>;

    /// Get the first session matching the user name.
    fn get_session_by_user(&self, user_name: &str) -> AppResult<Option<Session>>;

    /// Replace an already-existing session; `None` if no session with the
    /// same id exists.
    fn update_session(&self, session: Session) -> AppResult<Option<Session>>;

    /// Delete a session by id, returning the removed record. An absent id
    /// is not an error: the result is `None` and the snapshot is still
    /// rewritten.
    fn delete_session(&self, id: u32) -> AppResult<Option<Session>>;

    /// Whether the session's lifetime has elapsed.
    fn is_expired(&self, session: &Session) -> bool;

    /// Whether a stored session matches by id or by user name.
    fn session_exists(&self, session: &Session) -> AppResult<bool>;

    /// Authorization gate, identity given as a user name.
    ///
    /// With `admin` set, an active session for the admin user authorizes
    /// anything, regardless of the other arguments. Otherwise the supplied
    /// session must be unexpired and its user name must equal `user_name`;
    /// a missing session or a `None` identity never authorizes.
    fn is_authorized(
        &self,
        session: Option<Session>,
        user_name: Option<String>,
        admin: bool,
    ) -> AppResult<bool>;

    /// Authorization gate, identity given as a user id. Same rules as
    /// [`SessionRepository::is_authorized`] with integer identity equality.
    fn is_authorized_by_id(
        &self,
        session: Option<Session>,
        id: u32,
        admin: bool,
    ) -> AppResult<bool>;
}

/// File-backed session store.
///
/// Expired sessions are never swept; they stay in the map (and the
/// snapshot) until deleted, and expiry is computed lazily on each check.
pub struct SessionFileStore {
    path: PathBuf,
    sessions: Mutex<BTreeMap<u32, Session>>,
}

impl SessionFileStore {
    /// Open the store, loading all sessions from the snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let records: Vec<Session> = snapshot::load(&path)?;
        let sessions = records.into_iter().map(|s| (s.id, s)).collect();

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
        })
    }

    fn persist(&self, sessions: &BTreeMap<u32, Session>) -> AppResult<()> {
        let records: Vec<Session> = sessions.values().cloned().collect();
        snapshot::save(&self.path, &records)
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Whether an unexpired session for the admin user exists.
    fn admin_session_active(&self) -> AppResult<bool> {
        let admin_session = self.get_session_by_user(ADMIN_USER_NAME)?;
        Ok(admin_session.is_some_and(|session| !self.is_expired(&session)))
    }
}

impl SessionRepository for SessionFileStore {
    fn create_session(&self, id: u32, user_name: &str) -> AppResult<Option<Session>> {
        if user_name.is_empty() {
            return Ok(None);
        }

        let session = Session::new(id, user_name, Self::now_ms());
        let mut sessions = self.sessions.lock();
        sessions.insert(id, session.clone());
        self.persist(&sessions)?;
        Ok(Some(session))
    }

    fn get_session(&self, id: u32) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().get(&id).cloned())
    }

    fn get_session_by_user(&self, user_name: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.lock();
        Ok(sessions
            .values()
            .find(|session| session.user_name == user_name)
            .cloned())
    }

    fn update_session(&self, session: Session) -> AppResult<Option<Session>> {
        let mut sessions = self.sessions.lock();
        if !sessions.contains_key(&session.id) {
            return Ok(None);
        }

        sessions.insert(session.id, session.clone());
        self.persist(&sessions)?;
        Ok(Some(session))
    }

    fn delete_session(&self, id: u32) -> AppResult<Option<Session>> {
        let mut sessions = self.sessions.lock();
        let removed = sessions.remove(&id);
        self.persist(&sessions)?;
        Ok(removed)
    }

    fn is_expired(&self, session: &Session) -> bool {
        Self::now_ms() - session.created_at > SESSION_TTL_MS
    }

    fn session_exists(&self, session: &Session) -> AppResult<bool> {
        Ok(self.get_session(session.id)?.is_some()
            || self.get_session_by_user(&session.user_name)?.is_some())
    }

    fn is_authorized(
        &self,
        session: Option<Session>,
        user_name: Option<String>,
        admin: bool,
    ) -> AppResult<bool> {
        if admin && self.admin_session_active()? {
            return Ok(true);
        }

        match session {
            Some(session) => {
                let fresh = !self.is_expired(&session);
                let matches = user_name.is_some_and(|name| session.user_name == name);
                Ok(fresh && matches)
            }
            None => Ok(false),
        }
    }

    fn is_authorized_by_id(
        &self,
        session: Option<Session>,
        id: u32,
        admin: bool,
    ) -> AppResult<bool> {
        if admin && self.admin_session_active()? {
            return Ok(true);
        }

        match session {
            Some(session) => Ok(!self.is_expired(&session) && session.id == id),
            None => Ok(false),
        }
    }
}
