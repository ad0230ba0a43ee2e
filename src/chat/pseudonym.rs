//! Pseudonym derivation
//!
//! Display names are derived from the connection id with SHA-256: the
//! same connection always maps to the same name, different connections
//! to practically distinct ones, and the mapping cannot be reversed to
//! recover the connection id.

use sha2::{Digest, Sha256};

use crate::presence::ConnId;

const ADJECTIVES: [&str; 16] = [
    "Swift", "Quiet", "Amber", "Bold", "Cosmic", "Dusty", "Electric", "Frosty",
    "Golden", "Hidden", "Iron", "Jade", "Lunar", "Misty", "Neon", "Crimson",
];

const ANIMALS: [&str; 16] = [
    "Fox", "Owl", "Lynx", "Crow", "Otter", "Wolf", "Heron", "Moth",
    "Badger", "Falcon", "Newt", "Hare", "Raven", "Stoat", "Wren", "Viper",
];

/// Derive the stable display name for a connection
pub fn pseudonym(conn: ConnId) -> String {
    let digest = Sha256::digest(conn.raw().to_le_bytes());

    let adjective = ADJECTIVES[(digest[0] & 0x0f) as usize];
    let animal = ANIMALS[(digest[1] & 0x0f) as usize];
    format!("{}{}-{:02x}{:02x}", adjective, animal, digest[2], digest[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_connection_same_name() {
        let a = pseudonym(ConnId::new(7));
        let b = pseudonym(ConnId::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_connections_distinct() {
        let names: std::collections::HashSet<String> =
            (0..100).map(|id| pseudonym(ConnId::new(id))).collect();
        assert_eq!(names.len(), 100);
    }

    #[test]
    fn test_name_shape() {
        let name = pseudonym(ConnId::new(1));
        let (words, suffix) = name.split_once('-').unwrap();
        assert!(!words.is_empty());
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
