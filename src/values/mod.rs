//! Derived values and the two-phase modifier pipeline.
//!
//! Costs, damage, and usage changes are not computed in place: the raw value
//! is folded through every eligible object's modifier hook in the fixed
//! traversal order. The same fold runs in two modes:
//!
//! - [`ValueMode::Test`] probes the result without committing anything -
//!   "can I afford this", "what would the final damage be".
//! - [`ValueMode::Real`] is the identical traversal, but hooks may consume
//!   their own usage as a side effect of contributing.
//!
//! A hook whose contribution differs between the modes is a defect; the
//! pipeline enforces the cheap half of that contract by verifying that TEST
//! calls leave usage counters untouched.

mod pipeline;

pub use pipeline::compute_value;

use serde::{Deserialize, Serialize};

use crate::core::{Cost, CostKind, DiceColor, Position};

/// Whether a pipeline pass may commit side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMode {
    /// Non-mutating probe. Hooks must not change any state.
    Test,
    /// Committing pass. Hooks may consume their own usage.
    Real,
}

/// A cost being computed for a specific payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostValue {
    /// The requirement, rewritten by discount hooks.
    pub cost: Cost,
    /// What the payment is for.
    pub kind: CostKind,
    /// Position of the thing being paid for (skill owner, hand card, or the
    /// character being switched in).
    pub position: Position,
}

impl CostValue {
    /// Wrap a raw cost.
    #[must_use]
    pub fn new(cost: Cost, kind: CostKind, position: Position) -> Self {
        Self {
            cost,
            kind,
            position,
        }
    }
}

/// A damage computation in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageValue {
    /// Damage amount, rewritten by boost/reduction hooks. May not go
    /// negative; the pipeline clamps at zero after the fold.
    pub amount: i32,
    /// Damage element; `None` is physical.
    pub element: Option<DiceColor>,
    /// Who is dealing the damage.
    pub source: Position,
    /// The character being hit.
    pub target: Position,
}

impl DamageValue {
    /// Create a damage value.
    #[must_use]
    pub fn new(
        amount: i32,
        element: Option<DiceColor>,
        source: Position,
        target: Position,
    ) -> Self {
        Self {
            amount,
            element,
            source,
            target,
        }
    }
}

/// A usage change in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageValue {
    /// Signed delta applied to the counter.
    pub delta: i32,
    /// The object whose counter changes.
    pub position: Position,
}

impl UsageValue {
    /// Create a usage-change value.
    #[must_use]
    pub fn new(delta: i32, position: Position) -> Self {
        Self { delta, position }
    }
}

/// A value moving through the modifier pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// A cost computation.
    Cost(CostValue),
    /// A damage computation.
    Damage(DamageValue),
    /// A usage-change computation.
    Usage(UsageValue),
}

impl Value {
    /// The cost payload, if this is a cost value.
    #[must_use]
    pub fn as_cost(&self) -> Option<&CostValue> {
        match self {
            Value::Cost(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable cost payload.
    pub fn as_cost_mut(&mut self) -> Option<&mut CostValue> {
        match self {
            Value::Cost(v) => Some(v),
            _ => None,
        }
    }

    /// The damage payload, if this is a damage value.
    #[must_use]
    pub fn as_damage(&self) -> Option<&DamageValue> {
        match self {
            Value::Damage(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable damage payload.
    pub fn as_damage_mut(&mut self) -> Option<&mut DamageValue> {
        match self {
            Value::Damage(v) => Some(v),
            _ => None,
        }
    }

    /// The usage payload, if this is a usage value.
    #[must_use]
    pub fn as_usage(&self) -> Option<&UsageValue> {
        match self {
            Value::Usage(v) => Some(v),
            _ => None,
        }
    }
}
