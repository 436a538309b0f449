//! The content extension point.
//!
//! Every character, status, summon, support, and card implements
//! [`GameObject`]. Content never calls engine internals: handlers express
//! intent as returned [`Action`]s and modifier hooks rewrite the [`Value`]
//! they are handed. The engine guarantees call order and mode semantics to
//! every object uniformly.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::{Cost, DiceColor, EngineError, EngineResult, ObjectId, Position};
use crate::events::Event;
use crate::game::MatchState;
use crate::values::{DamageValue, Value, ValueMode};

/// What kind of object this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Character,
    CharacterStatus,
    TeamStatus,
    Summon,
    Support,
    Card,
}

/// A remaining-activations counter.
///
/// Reaching zero is the removal trigger for many objects, but removal itself
/// always happens through an explicit `RemoveObject` action returned by the
/// object - never as a side effect of the counter hitting zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    current: u32,
    max: u32,
}

impl Usage {
    /// A fresh counter with `n` activations.
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self { current: n, max: n }
    }

    /// Remaining activations.
    #[must_use]
    pub const fn current(self) -> u32 {
        self.current
    }

    /// Maximum activations.
    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Has the counter reached zero?
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        self.current == 0
    }

    /// Spend `n` activations.
    ///
    /// Spending more than remains is an invariant violation: content is
    /// required to check before consuming.
    pub fn consume(&mut self, n: u32) -> EngineResult<()> {
        if n > self.current {
            return Err(EngineError::invariant(format!(
                "usage consumed below zero: {} - {}",
                self.current, n
            )));
        }
        self.current -= n;
        Ok(())
    }

    /// Apply a signed delta, clamped at `max` on the way up.
    ///
    /// Going below zero is an invariant violation. Returns the new count.
    pub fn apply_delta(&mut self, delta: i32) -> EngineResult<u32> {
        let next = self.current as i64 + delta as i64;
        if next < 0 {
            return Err(EngineError::invariant(format!(
                "usage delta {} drives counter {} negative",
                delta, self.current
            )));
        }
        self.current = (next as u32).min(self.max);
        Ok(self.current)
    }

    /// Refill to maximum (round renewal).
    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// One character skill: name, cost, and the default damage profile.
///
/// Content with richer behavior overrides [`GameObject::use_skill`] and can
/// ignore the damage fields entirely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name (for events and logs).
    pub name: String,
    /// Dice/charge requirement before modifiers.
    pub cost: Cost,
    /// Base damage dealt to the opponent's active character.
    pub damage: i32,
    /// Damage element; `None` means physical.
    pub element: Option<DiceColor>,
    /// Charge granted to the user on cast.
    pub charge_gain: u8,
}

impl Skill {
    /// Create a skill.
    pub fn new(name: impl Into<String>, cost: Cost, damage: i32) -> Self {
        Self {
            name: name.into(),
            cost,
            damage,
            element: None,
            charge_gain: 1,
        }
    }

    /// Set the damage element (builder pattern).
    #[must_use]
    pub fn with_element(mut self, element: DiceColor) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the charge granted on cast (builder pattern).
    #[must_use]
    pub fn with_charge_gain(mut self, charge_gain: u8) -> Self {
        self.charge_gain = charge_gain;
        self
    }
}

/// Shared capability set of every content object.
///
/// All methods other than `name`, `kind`, and `clone_box` have defaults, so
/// an object only implements the hooks it cares about.
///
/// ## Contract
///
/// - `handle_event` must not assume it runs at any particular moment other
///   than "after the event's action executed"; it returns actions, it never
///   mutates the match.
/// - `modify_value` must contribute identically in TEST and REAL mode; only
///   REAL mode may consume usage. The pipeline verifies that TEST calls
///   leave the usage counter untouched and aborts the match otherwise.
pub trait GameObject: Send {
    /// Content name. Stable - it is the factory lookup key.
    fn name(&self) -> &str;

    /// The object kind.
    fn kind(&self) -> ObjectKind;

    /// Remaining-activations counter, if this object carries one.
    fn usage(&self) -> Option<Usage> {
        None
    }

    /// Mutable access to the usage counter for `ChangeUsage` actions.
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        None
    }

    /// Base cost to play this object from hand (cards only).
    fn cost(&self) -> Option<Cost> {
        None
    }

    /// The skills this object offers (characters only).
    fn skills(&self) -> Vec<Skill> {
        Vec::new()
    }

    /// React to an event with follow-up actions.
    fn handle_event(
        &mut self,
        _event: &Event,
        _pos: Position,
        _state: &MatchState,
    ) -> Vec<Action> {
        Vec::new()
    }

    /// Contribute to a value computation.
    ///
    /// `mode` is threaded through so the hook knows whether it may commit
    /// side effects (consume usage). Contribution logic must be identical in
    /// both modes.
    fn modify_value(
        &mut self,
        _value: &mut Value,
        _pos: Position,
        _state: &MatchState,
        _mode: ValueMode,
    ) -> EngineResult<()> {
        Ok(())
    }

    /// Produce the actions of casting skill `index`.
    ///
    /// The default targets the opponent's active character with the skill's
    /// damage profile and grants the caster's charge.
    fn use_skill(&mut self, index: usize, pos: Position, state: &MatchState) -> Vec<Action> {
        let Some(skill) = self.skills().get(index).cloned() else {
            return Vec::new();
        };
        let target = state.table(pos.player.opponent()).active_position();
        let mut out = vec![Action::MakeDamage {
            damage: DamageValue::new(skill.damage, skill.element, pos, target),
        }];
        if skill.charge_gain > 0 {
            out.push(Action::Charge {
                player: pos.player,
                character: pos.index,
                delta: skill.charge_gain as i32,
            });
        }
        out
    }

    /// Produce the actions of playing this object from hand (cards only).
    ///
    /// `pos` is the hand position the card occupied; it is removed from hand
    /// before this runs.
    fn on_play(&mut self, _pos: Position, _state: &MatchState) -> Vec<Action> {
        Vec::new()
    }

    /// Clone behind the trait object.
    fn clone_box(&self) -> Box<dyn GameObject>;
}

impl Clone for Box<dyn GameObject> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Host-provided registry resolving content names to objects.
///
/// The mapping from serialized names to content classes lives outside the
/// engine; this trait is the seam it plugs into.
pub trait ObjectFactory: Send {
    /// Instantiate the content object registered under `name`.
    fn create(&self, name: &str) -> Option<Box<dyn GameObject>>;
}

/// A zone slot holding one object.
///
/// The name is cached outside the box so queries and removal events can read
/// it even while the object is temporarily lifted out during dispatch.
#[derive(Clone)]
pub struct ObjectSlot {
    /// Match-unique ID of the occupant.
    pub id: ObjectId,
    /// Cached content name.
    pub name: String,
    object: Option<Box<dyn GameObject>>,
}

impl ObjectSlot {
    /// Create a slot around an object.
    pub fn new(id: ObjectId, object: Box<dyn GameObject>) -> Self {
        Self {
            id,
            name: object.name().to_string(),
            object: Some(object),
        }
    }

    /// Borrow the occupant, if it is not currently lifted out.
    #[must_use]
    pub fn object(&self) -> Option<&dyn GameObject> {
        self.object.as_deref()
    }

    /// Mutably borrow the occupant.
    pub fn object_mut(&mut self) -> Option<&mut Box<dyn GameObject>> {
        self.object.as_mut()
    }

    /// Lift the occupant out for a dispatch call.
    pub(crate) fn take(&mut self) -> Option<Box<dyn GameObject>> {
        self.object.take()
    }

    /// Return the occupant after a dispatch call.
    pub(crate) fn put_back(&mut self, object: Box<dyn GameObject>) {
        debug_assert!(self.object.is_none(), "slot already occupied");
        self.object = Some(object);
    }
}

impl std::fmt::Debug for ObjectSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSlot")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("taken", &self.object.is_none())
            .finish()
    }
}
