//! The shared session registry.
//!
//! [`SessionStore`] maps tokens to [`Session`] records in a sharded
//! concurrent map. New tokens are inserted through the map's entry API, so
//! the existence check and the insert happen under one shard lock and two
//! concurrent creations can never overwrite each other.
//!
//! A token presented by a client is never adopted: an unknown token always
//! yields a session with a freshly drawn token.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, error, warn};

use crate::error::{SessionError, SessionResult};
use crate::session::Session;
use crate::token::{self, OsRngTokens, TokenSource};

/// Tokens drawn before a run of collisions is reported as an error.
const MAX_TOKEN_ATTEMPTS: usize = 4;

/// Concurrent token → session map.
///
/// # Example
///
/// ```rust
/// use switchyard_session::SessionStore;
///
/// let store = SessionStore::new();
/// let session = store.create_session().unwrap();
///
/// let again = store.get_or_create_session(session.id()).unwrap();
/// assert_eq!(again, session);
///
/// let fresh = store.get_or_create_session("not-a-known-token").unwrap();
/// assert_ne!(fresh.id(), "not-a-known-token");
/// assert_eq!(store.len(), 2);
/// ```
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    tokens: Arc<dyn TokenSource>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty store drawing tokens from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_token_source(Arc::new(OsRngTokens))
    }

    /// Creates an empty store drawing tokens from `tokens`.
    #[must_use]
    pub fn with_token_source(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            sessions: DashMap::new(),
            tokens,
        }
    }

    /// Creates a new unauthorized session under a fresh token.
    ///
    /// The session is in the store when this returns.
    pub fn create_session(&self) -> SessionResult<Session> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = token::generate(self.tokens.as_ref()).map_err(|e| {
                error!(error = %e, "Failed to draw session token");
                SessionError::RandomSourceExhausted(e)
            })?;

            match self.sessions.entry(token) {
                Entry::Occupied(_) => {
                    warn!(attempt, "Session token collision, drawing again");
                }
                Entry::Vacant(slot) => {
                    let session = Session::new(slot.key().clone());
                    slot.insert(session.clone());
                    debug!(sessions = self.sessions.len(), "Session created");
                    return Ok(session);
                }
            }
        }

        Err(SessionError::TokenCollision {
            attempts: MAX_TOKEN_ATTEMPTS,
        })
    }

    /// Returns the session for `token`, or creates a new one.
    ///
    /// When `token` is unknown the returned session carries a different,
    /// freshly drawn token. Callers must send the returned id back to the
    /// client.
    pub fn get_or_create_session(&self, token: &str) -> SessionResult<Session> {
        if let Some(session) = self.get(token) {
            return Ok(session);
        }
        self.create_session()
    }

    /// Returns a snapshot of the session for `token`.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Returns true if `token` names a stored session.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }

    /// Sets the authorized flag of the stored session.
    pub fn set_authorized(&self, token: &str, authorized: bool) -> SessionResult<Session> {
        let mut entry = self.sessions.get_mut(token).ok_or(SessionError::NotFound)?;
        entry.set_authorized(authorized);
        Ok(entry.clone())
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
