//! Player identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a player interacting with the board.
///
/// Player ids are opaque strings chosen by the front end. By convention
/// they are non-empty and free of whitespace; the board treats them
/// purely as keys and never inspects their contents. Player state is
/// created lazily on a player's first move and is never removed.
///
/// # Equality Semantics
///
/// Two ids are the same player iff their strings are byte-equal. There
/// is no normalization: `"Alice"` and `"alice"` are different players.
///
/// # Example
///
/// ```
/// use scramble_types::PlayerId;
///
/// let alice = PlayerId::new("alice");
/// assert_eq!(alice.as_str(), "alice");
/// assert_eq!(alice, PlayerId::new("alice"));
/// assert_ne!(alice, PlayerId::new("bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_and_access() {
        let id = PlayerId::new("alice");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn equality_is_byte_equality() {
        assert_eq!(PlayerId::new("bob"), PlayerId::from("bob"));
        assert_ne!(PlayerId::new("bob"), PlayerId::new("Bob"));
    }

    #[test]
    fn from_string() {
        let id: PlayerId = String::from("carol").into();
        assert_eq!(id.as_str(), "carol");
    }

    #[test]
    fn serde_transparent() {
        let id = PlayerId::new("alice");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"alice\"");

        let back: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
