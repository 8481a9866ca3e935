//! Built-in middleware stages.
//!
//! - [`session::SessionMiddleware`]: attaches a session and issues the cookie
//! - [`logger::LoggerMiddleware`]: access log through `tracing`

pub mod logger;
pub mod session;

pub use logger::LoggerMiddleware;
pub use session::{SessionMiddleware, SESSION_COOKIE};
