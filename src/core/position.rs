//! Structured addressing for every entity in a match.
//!
//! Entities never hold references to each other. They refer to one another
//! through a [`Position`]: player, area, index within the area. Combined with
//! the per-object [`ObjectId`] this makes removal idempotent - a stale
//! position simply stops resolving instead of dangling.

use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
///
/// The engine is strictly dual-player; there is no player count to configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The first player.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The second player.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a player ID. Panics on anything but 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < 2, "dual-player game: player index must be 0 or 1");
        Self(id)
    }

    /// Get the raw index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players, first seat first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Unique identifier for a live object, allocated by the match.
///
/// Object IDs are never reused within a match. An action carrying both a
/// position and an ID can detect that the slot has been reoccupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Create an object ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// The area of a table a position points into.
///
/// `CharacterStatus` carries the roster index of the character the status is
/// attached to; every other area is flat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    /// The character roster.
    Character,
    /// Statuses attached to one character.
    CharacterStatus {
        /// Roster index of the owning character.
        character: usize,
    },
    /// Statuses attached to the whole team.
    TeamStatus,
    /// The summon zone.
    Summon,
    /// The support zone.
    Support,
    /// Cards held in hand.
    Hand,
}

impl Area {
    /// The area discriminant without any payload, for query filtering.
    #[must_use]
    pub const fn kind(self) -> AreaKind {
        match self {
            Area::Character => AreaKind::Character,
            Area::CharacterStatus { .. } => AreaKind::CharacterStatus,
            Area::TeamStatus => AreaKind::TeamStatus,
            Area::Summon => AreaKind::Summon,
            Area::Support => AreaKind::Support,
            Area::Hand => AreaKind::Hand,
        }
    }
}

/// Payload-free area discriminant used by query predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    Character,
    CharacterStatus,
    TeamStatus,
    Summon,
    Support,
    Hand,
}

/// Structured address of an entity: player, area, index within the area.
///
/// Positions are immutable values. Whether a position currently resolves to a
/// live object is a property of the match state, not of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// The owning player.
    pub player: PlayerId,
    /// The area within that player's table.
    pub area: Area,
    /// Index within the area.
    pub index: usize,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(player: PlayerId, area: Area, index: usize) -> Self {
        Self { player, area, index }
    }

    /// Position of a character by roster index.
    #[must_use]
    pub const fn character(player: PlayerId, index: usize) -> Self {
        Self::new(player, Area::Character, index)
    }

    /// Position of a status attached to a character.
    #[must_use]
    pub const fn character_status(player: PlayerId, character: usize, index: usize) -> Self {
        Self::new(player, Area::CharacterStatus { character }, index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{:?}[{}]", self.player, self.area, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
        assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    }

    #[test]
    fn test_both_order() {
        let players: Vec<_> = PlayerId::both().collect();
        assert_eq!(players, vec![PlayerId::FIRST, PlayerId::SECOND]);
    }

    #[test]
    #[should_panic(expected = "player index must be 0 or 1")]
    fn test_invalid_player() {
        let _ = PlayerId::new(2);
    }

    #[test]
    fn test_area_kind() {
        assert_eq!(Area::Character.kind(), AreaKind::Character);
        assert_eq!(
            Area::CharacterStatus { character: 3 }.kind(),
            AreaKind::CharacterStatus
        );
        assert_eq!(Area::Summon.kind(), AreaKind::Summon);
    }

    #[test]
    fn test_position_constructors() {
        let pos = Position::character_status(PlayerId::SECOND, 1, 0);
        assert_eq!(pos.player, PlayerId::SECOND);
        assert_eq!(pos.area, Area::CharacterStatus { character: 1 });
        assert_eq!(pos.index, 0);
    }

    #[test]
    fn test_position_serialization() {
        let pos = Position::character(PlayerId::FIRST, 2);
        let json = serde_json::to_string(&pos).unwrap();
        let deserialized: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, deserialized);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ObjectId::new(7)), "Object(7)");
        assert_eq!(format!("{}", PlayerId::FIRST), "Player 0");
    }
}
