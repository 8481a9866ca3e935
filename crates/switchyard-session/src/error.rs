//! Session error types.

use thiserror::Error;

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operating system random source could not supply token bytes.
    #[error("Random source exhausted: {0}")]
    RandomSourceExhausted(#[from] rand::Error),

    /// No session exists for the token.
    #[error("Session not found")]
    NotFound,

    /// Every generated token was already taken.
    #[error("Token collision after {attempts} attempts")]
    TokenCollision {
        /// Number of tokens drawn before giving up.
        attempts: usize,
    },
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SessionError::NotFound.to_string(), "Session not found");
        assert_eq!(
            SessionError::TokenCollision { attempts: 4 }.to_string(),
            "Token collision after 4 attempts"
        );
    }

    #[test]
    fn test_random_source_from() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "entropy");
        let err: SessionError = rand::Error::new(io).into();
        assert!(matches!(err, SessionError::RandomSourceExhausted(_)));
        assert!(err.to_string().starts_with("Random source exhausted"));
    }
}
