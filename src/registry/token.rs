//! Stream tokens
//!
//! The bearer credential authorizing sends to a session. Minted on
//! first send for an unclaimed name, replaced only via an
//! authenticated rotation.

use rand::rngs::OsRng;
use rand::RngCore;

const TOKEN_BYTES: usize = 16;

/// Bearer credential for one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamToken(String);

impl StreamToken {
    /// Generate a fresh random token (128 bits, hex-encoded)
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        let mut encoded = String::with_capacity(TOKEN_BYTES * 2);
        for byte in bytes {
            use std::fmt::Write;
            write!(encoded, "{:02x}", byte).expect("writing to String cannot fail");
        }
        Self(encoded)
    }

    /// Whether a presented credential matches this token
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }

    /// The token text, for handing back to the creating producer
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
