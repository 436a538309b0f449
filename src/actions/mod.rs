//! Actions: the only legal state-mutation surface.
//!
//! An action is a declarative instruction carrying exactly the fields needed
//! to perform one mutation. Content handlers return actions; the execution
//! loop applies them, emits the corresponding event, and queues whatever the
//! dispatch produces behind everything already pending.

mod executor;

pub use executor::run_actions;

use serde::{Deserialize, Serialize};

use crate::core::{Area, DiceColor, ObjectId, PlayerId, Position};
use crate::values::DamageValue;

/// A declarative state mutation.
///
/// Every variant is fully reconstructible from its fields - the action log
/// is sufficient for deterministic replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Deal damage to a character. The amount is folded through the damage
    /// pipeline in REAL mode when the action executes.
    MakeDamage { damage: DamageValue },

    /// Heal a character, clamped at max HP.
    Heal { target: Position, amount: i32 },

    /// Create (or renew) a content object in a zone.
    ///
    /// `area` must be a status/summon/support area; the index is allocated
    /// by the engine. An existing object of the same name is renewed in
    /// place instead of duplicated.
    CreateObject {
        player: PlayerId,
        area: Area,
        name: String,
    },

    /// Remove an object. Removing an absent position is a no-op; `id`, when
    /// given, guards against removing a different object that reoccupied
    /// the slot.
    RemoveObject {
        position: Position,
        id: Option<ObjectId>,
    },

    /// Change an object's usage counter. The delta is folded through the
    /// usage pipeline before it is applied.
    ChangeUsage { position: Position, delta: i32 },

    /// Draw cards from deck to hand. Overdrawn cards are burned.
    DrawCard { player: PlayerId, count: usize },

    /// Discard a card from hand (elemental tuning).
    DiscardCard { player: PlayerId, hand_index: usize },

    /// Add dice to a pool, capped at the configured maximum.
    CreateDice {
        player: PlayerId,
        colors: Vec<DiceColor>,
    },

    /// Remove dice from a pool by index.
    RemoveDice {
        player: PlayerId,
        indices: Vec<usize>,
    },

    /// Change a character's charge, clamped at its maximum.
    Charge {
        player: PlayerId,
        character: usize,
        delta: i32,
    },

    /// Move the active-character slot.
    SwitchCharacter { player: PlayerId, to: usize },

    /// Cast a character skill. The character's behavior object produces the
    /// skill's actions.
    UseSkill { position: Position, skill: usize },

    /// Play a card from hand. The card's behavior object produces the
    /// play actions.
    PlayCard { player: PlayerId, hand_index: usize },

    /// Short-circuit the remainder of the current step's queue.
    SkipPlayerAction { player: PlayerId },
}

/// An executed action with replay metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action that executed.
    pub action: Action,
    /// Round it executed in.
    pub round: u32,
    /// Global sequence number within the match.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a record.
    #[must_use]
    pub fn new(action: Action, round: u32, sequence: u32) -> Self {
        Self {
            action,
            round,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialization() {
        let action = Action::MakeDamage {
            damage: DamageValue::new(
                2,
                Some(DiceColor::Electro),
                Position::character(PlayerId::FIRST, 0),
                Position::character(PlayerId::SECOND, 0),
            ),
        };
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, deserialized);
    }

    #[test]
    fn test_record_serialization() {
        let record = ActionRecord::new(
            Action::DrawCard {
                player: PlayerId::FIRST,
                count: 2,
            },
            3,
            17,
        );
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
