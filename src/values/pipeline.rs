//! The modifier fold.
//!
//! Traversal order is the engine-owned position order (acting player's
//! table first, zone by zone, index by index), so two discounts on the same
//! cost always apply in one well-defined sequence regardless of when their
//! objects entered play.

use tracing::trace;

use crate::core::{EngineError, EngineResult};
use crate::game::MatchState;

use super::{Value, ValueMode};

/// Fold `value` through every eligible object's modifier hook.
///
/// In [`ValueMode::Test`] the traversal must leave the match untouched; the
/// pipeline verifies that each hook's usage counter is unchanged and treats
/// any drift as a fatal invariant violation. [`ValueMode::Real`] runs the
/// identical traversal but lets hooks consume usage.
///
/// Damage amounts are clamped at zero after the fold so over-eager
/// reductions cannot heal.
pub fn compute_value(
    state: &mut MatchState,
    value: Value,
    mode: ValueMode,
) -> EngineResult<Value> {
    let mut value = value;
    for pos in state.dispatch_order() {
        let Some(mut object) = state.take_object(pos) else {
            continue;
        };
        let usage_before = object.usage();

        let result = object.modify_value(&mut value, pos, state, mode);
        let usage_after = object.usage();
        state.put_object(pos, object)?;
        result?;

        if mode == ValueMode::Test && usage_after != usage_before {
            return Err(EngineError::invariant_at(
                "modifier hook mutated usage in TEST mode",
                pos,
            ));
        }
        trace!(position = %pos, ?mode, "modifier applied");
    }

    if let Value::Damage(damage) = &mut value {
        damage.amount = damage.amount.max(0);
    }
    Ok(value)
}
