//! Per-character state: vitals owned by the engine, behavior owned by content.
//!
//! Hit points, charge, and liveness are engine bookkeeping mutated only by
//! the action loop. The boxed behavior object supplies skills and hooks.

use crate::core::{CharacterBlueprint, DiceColor, ObjectId};

use super::object::{GameObject, ObjectSlot};

/// One character on a roster.
pub struct CharacterState {
    /// Match-unique ID.
    pub id: ObjectId,
    /// Content name.
    pub name: String,
    /// The character's element (drives dice usefulness and tuning).
    pub element: DiceColor,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Current charge (burst energy).
    pub charge: u8,
    /// Maximum charge.
    pub max_charge: u8,
    /// Alive flag; dead characters stop participating in dispatch.
    pub alive: bool,
    /// Statuses attached to this character.
    pub statuses: Vec<ObjectSlot>,
    behavior: Option<Box<dyn GameObject>>,
}

impl CharacterState {
    /// Build a character from its blueprint and behavior object.
    pub fn new(id: ObjectId, blueprint: &CharacterBlueprint, behavior: Box<dyn GameObject>) -> Self {
        Self {
            id,
            name: blueprint.name.clone(),
            element: blueprint.element,
            hp: blueprint.max_hp,
            max_hp: blueprint.max_hp,
            charge: 0,
            max_charge: blueprint.max_charge,
            alive: true,
            statuses: Vec::new(),
            behavior: Some(behavior),
        }
    }

    /// Borrow the behavior object, if not currently lifted out.
    #[must_use]
    pub fn behavior(&self) -> Option<&dyn GameObject> {
        self.behavior.as_deref()
    }

    /// Mutably borrow the behavior object.
    pub fn behavior_mut(&mut self) -> Option<&mut Box<dyn GameObject>> {
        self.behavior.as_mut()
    }

    /// Lift the behavior out for a dispatch call.
    pub(crate) fn take_behavior(&mut self) -> Option<Box<dyn GameObject>> {
        self.behavior.take()
    }

    /// Return the behavior after a dispatch call.
    pub(crate) fn put_behavior(&mut self, behavior: Box<dyn GameObject>) {
        debug_assert!(self.behavior.is_none(), "behavior already present");
        self.behavior = Some(behavior);
    }
}

impl std::fmt::Debug for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hp", &self.hp)
            .field("charge", &self.charge)
            .field("alive", &self.alive)
            .field("statuses", &self.statuses.len())
            .finish()
    }
}
