//! In-memory session registry for Switchyard.
//!
//! Sessions are identified by a 44-character token: 32 bytes from the
//! operating system CSPRNG, encoded as standard base64 with padding. The
//! token travels to the client in the `session` cookie.
//!
//! The store is owned by the application and shared behind an `Arc`.
//! Sessions are never expired or evicted.
//!
//! ```rust
//! use std::sync::Arc;
//! use switchyard_session::SessionStore;
//!
//! let store = Arc::new(SessionStore::new());
//! let session = store.create_session()?;
//! assert_eq!(session.id().len(), 44);
//! assert!(!session.is_authorized());
//!
//! store.set_authorized(session.id(), true)?;
//! assert!(store.get(session.id()).unwrap().is_authorized());
//! # Ok::<(), switchyard_session::SessionError>(())
//! ```

mod error;
mod session;
mod store;
mod token;

pub use error::{SessionError, SessionResult};
pub use session::Session;
pub use store::SessionStore;
pub use token::{is_well_formed, OsRngTokens, TokenSource, TOKEN_BYTES, TOKEN_LEN};
