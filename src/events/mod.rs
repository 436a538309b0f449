//! Events and the dispatcher.
//!
//! Every executed action emits exactly one event: a read-only snapshot
//! carrying enough information for handlers to react. Handlers never mutate
//! the match - they return actions, which the execution loop queues behind
//! everything already pending. Dispatch is synchronous and single-threaded,
//! so two objects reacting to the same event can never race.

mod dispatch;

pub use dispatch::dispatch_event;

use serde::{Deserialize, Serialize};

use crate::core::{DiceColor, PlayerId, Position};

/// Payload-free discriminant of an event, for logs and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    RoundPrepare,
    RoundEnd,
    DamageDealt,
    Healed,
    ObjectCreated,
    ObjectRemoved,
    UsageChanged,
    CardsDrawn,
    CardDiscarded,
    CardPlayed,
    DiceCreated,
    DiceRemoved,
    Charged,
    CharacterSwitched,
    SkillUsed,
    PlayerActionSkipped,
}

/// A state-change notification emitted after an action executed.
///
/// Events are fully reconstructible from their fields; nothing refers back
/// into engine internals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new round is being prepared; statuses reset or expire here.
    RoundPrepare { round: u32 },

    /// The round is over; end-of-round effects fire here.
    RoundEnd { round: u32 },

    /// Damage was applied to a character.
    DamageDealt {
        source: Position,
        target: Position,
        element: Option<DiceColor>,
        /// Final amount after the modifier pipeline.
        amount: i32,
        /// Target hit points after the hit.
        hp_after: i32,
        /// Did the hit defeat the target?
        defeated: bool,
    },

    /// A character was healed.
    Healed {
        target: Position,
        amount: i32,
        hp_after: i32,
    },

    /// An object entered play (or was renewed in place).
    ObjectCreated {
        position: Position,
        name: String,
        /// True when an existing same-name object was refreshed instead of
        /// a new slot being appended.
        renewed: bool,
    },

    /// An object left play.
    ObjectRemoved { position: Position, name: String },

    /// An object's usage counter changed.
    UsageChanged {
        position: Position,
        delta: i32,
        /// The counter value after the change.
        remaining: u32,
    },

    /// A player drew cards.
    CardsDrawn { player: PlayerId, count: usize },

    /// A card left the hand without being played (tuning).
    CardDiscarded { player: PlayerId, name: String },

    /// A card was played from hand.
    CardPlayed { player: PlayerId, name: String },

    /// Dice entered a pool.
    DiceCreated {
        player: PlayerId,
        colors: Vec<DiceColor>,
    },

    /// Dice left a pool.
    DiceRemoved { player: PlayerId, count: usize },

    /// A character's charge changed.
    Charged {
        player: PlayerId,
        character: usize,
        delta: i32,
        /// Charge after the change.
        charge: u8,
    },

    /// The active-character slot moved.
    CharacterSwitched {
        player: PlayerId,
        from: usize,
        to: usize,
    },

    /// A skill was cast.
    SkillUsed {
        source: Position,
        skill: usize,
        name: String,
    },

    /// The rest of the current step was skipped.
    PlayerActionSkipped { player: PlayerId },
}

impl Event {
    /// The payload-free discriminant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RoundPrepare { .. } => EventKind::RoundPrepare,
            Event::RoundEnd { .. } => EventKind::RoundEnd,
            Event::DamageDealt { .. } => EventKind::DamageDealt,
            Event::Healed { .. } => EventKind::Healed,
            Event::ObjectCreated { .. } => EventKind::ObjectCreated,
            Event::ObjectRemoved { .. } => EventKind::ObjectRemoved,
            Event::UsageChanged { .. } => EventKind::UsageChanged,
            Event::CardsDrawn { .. } => EventKind::CardsDrawn,
            Event::CardDiscarded { .. } => EventKind::CardDiscarded,
            Event::CardPlayed { .. } => EventKind::CardPlayed,
            Event::DiceCreated { .. } => EventKind::DiceCreated,
            Event::DiceRemoved { .. } => EventKind::DiceRemoved,
            Event::Charged { .. } => EventKind::Charged,
            Event::CharacterSwitched { .. } => EventKind::CharacterSwitched,
            Event::SkillUsed { .. } => EventKind::SkillUsed,
            Event::PlayerActionSkipped { .. } => EventKind::PlayerActionSkipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Event::RoundPrepare { round: 1 }.kind(), EventKind::RoundPrepare);
        assert_eq!(
            Event::CardsDrawn {
                player: PlayerId::FIRST,
                count: 2
            }
            .kind(),
            EventKind::CardsDrawn
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::DamageDealt {
            source: Position::character(PlayerId::FIRST, 0),
            target: Position::character(PlayerId::SECOND, 1),
            element: Some(DiceColor::Pyro),
            amount: 3,
            hp_after: 7,
            defeated: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
