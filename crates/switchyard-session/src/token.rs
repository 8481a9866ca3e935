//! Session token generation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a session token.
pub const TOKEN_BYTES: usize = 32;

/// Length of an encoded token: standard base64 of [`TOKEN_BYTES`] with padding.
pub const TOKEN_LEN: usize = 44;

/// A source of random bytes for session tokens.
///
/// The store draws every token through this trait, so tests can substitute
/// a deterministic or failing source.
pub trait TokenSource: Send + Sync + 'static {
    /// Fills `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// Token source backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokens;

impl TokenSource for OsRngTokens {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// Draws [`TOKEN_BYTES`] from `source` and encodes them.
pub(crate) fn generate(source: &dyn TokenSource) -> Result<String, rand::Error> {
    let mut bytes = [0u8; TOKEN_BYTES];
    source.fill(&mut bytes)?;
    Ok(STANDARD.encode(bytes))
}

/// Returns true if `token` has the shape of a generated token.
///
/// Only the alphabet and length are checked.
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token.ends_with('=')
        && token[..TOKEN_LEN - 1]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
