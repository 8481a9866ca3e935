//! The session record.

/// A server-side session.
///
/// Sessions are created by [`SessionStore`](crate::SessionStore) and live
/// for the lifetime of the store. Values handed out by the store are
/// snapshots; use [`SessionStore::set_authorized`](crate::SessionStore::set_authorized)
/// to change the stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    authorized: bool,
}

impl Session {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            authorized: false,
        }
    }

    /// The session token, as sent in the `session` cookie.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the session has been marked authorized.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub(crate) fn set_authorized(&mut self, authorized: bool) {
        self.authorized = authorized;
    }
}
