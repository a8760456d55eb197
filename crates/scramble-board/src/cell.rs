//! Card cell state.

use scramble_types::PlayerId;
use serde::{Deserialize, Serialize};

/// One cell of the board.
///
/// A cell is either `Removed` (the empty space a matched pair leaves
/// behind) or `Present` with a value, a face-up flag, and an optional
/// controller.
///
/// # Invariants
///
/// For every reachable `Present` cell:
///
/// - a controlled cell is face up (`controller.is_some()` implies
///   `face_up`);
/// - at most one player controls the cell (carried by the `Option`
///   itself).
///
/// A `Removed` cell never becomes `Present` again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Card {
    /// Empty space; a matched pair was cleared from here.
    Removed,
    /// A card occupies this cell.
    Present {
        /// Card value. Non-empty and whitespace-free, validated at
        /// board construction.
        value: String,
        /// Whether the card currently shows its value.
        face_up: bool,
        /// The player holding exclusive right to pair this card, if any.
        controller: Option<PlayerId>,
    },
}

impl Card {
    /// Creates a face-down, uncontrolled card.
    #[must_use]
    pub fn face_down(value: impl Into<String>) -> Self {
        Self::Present {
            value: value.into(),
            face_up: false,
            controller: None,
        }
    }

    /// Returns `true` if the cell is empty.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Returns the card value, or `None` for a removed cell.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Removed => None,
            Self::Present { value, .. } => Some(value),
        }
    }

    /// Returns `true` if the cell holds a card controlled by `player`.
    #[must_use]
    pub fn is_controlled_by(&self, player: &PlayerId) -> bool {
        matches!(self, Self::Present { controller: Some(holder), .. } if holder == player)
    }

    /// Returns `true` if the cell holds a card controlled by anyone.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Present { controller: Some(_), .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_down_card() {
        let card = Card::face_down("A");
        assert!(!card.is_removed());
        assert!(!card.is_controlled());
        assert_eq!(card.value(), Some("A"));
    }

    #[test]
    fn removed_cell() {
        let cell = Card::Removed;
        assert!(cell.is_removed());
        assert!(!cell.is_controlled());
        assert_eq!(cell.value(), None);
    }

    #[test]
    fn controller_queries() {
        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");
        let card = Card::Present {
            value: "A".to_string(),
            face_up: true,
            controller: Some(alice.clone()),
        };

        assert!(card.is_controlled());
        assert!(card.is_controlled_by(&alice));
        assert!(!card.is_controlled_by(&bob));
    }

    #[test]
    fn serde_tagged() {
        let card = Card::face_down("A");
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["state"], "present");
        assert_eq!(json["value"], "A");
        assert_eq!(json["face_up"], false);

        let removed = serde_json::to_value(Card::Removed).unwrap();
        assert_eq!(removed["state"], "removed");
    }
}
