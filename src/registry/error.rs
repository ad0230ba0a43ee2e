//! Registry error types
//!
//! Rejection taxonomy for registry operations. Validation and auth
//! failures are final; `RateLimited` is retry-later and the caller
//! owns the backoff policy. Read-only queries ([`info`]) never produce
//! any of these — absent names get a default result instead.
//!
//! [`info`]: super::StreamRegistry::info

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name does not match the 3-30 char alphanumeric/underscore pattern
    InvalidName(String),
    /// Line text empty or over the length limit
    InvalidText,
    /// Unrecognized line kind
    InvalidKind(String),
    /// Name is banned
    Banned(String),
    /// Presented token does not match the session's token
    TokenMismatch,
    /// No session exists for this name
    UnknownStream(String),
    /// A fixed-window rate limit was hit; retry later
    RateLimited,
    /// Stream is at its viewer cap
    Capacity(String),
    /// Operation requires an active stream
    StreamOffline(String),
    /// Chat requires a live subscription to the stream
    NotSubscribed(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::InvalidName(name) => write!(f, "Invalid stream name: {}", name),
            RegistryError::InvalidText => write!(f, "Invalid line text"),
            RegistryError::InvalidKind(kind) => write!(f, "Invalid line kind: {}", kind),
            RegistryError::Banned(name) => write!(f, "Stream is banned: {}", name),
            RegistryError::TokenMismatch => write!(f, "Token mismatch"),
            RegistryError::UnknownStream(name) => write!(f, "Unknown stream: {}", name),
            RegistryError::RateLimited => write!(f, "Rate limited"),
            RegistryError::Capacity(name) => write!(f, "Stream at viewer capacity: {}", name),
            RegistryError::StreamOffline(name) => write!(f, "Stream offline: {}", name),
            RegistryError::NotSubscribed(name) => {
                write!(f, "Connection not subscribed to stream: {}", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
