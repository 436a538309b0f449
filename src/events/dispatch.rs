//! Event dispatch.
//!
//! Dispatch walks every live object in the engine-owned position order and
//! collects the actions their handlers return. Handlers see the match
//! read-only; their effects are queued, not applied, in dispatch order.

use tracing::trace;

use crate::actions::Action;
use crate::core::EngineResult;
use crate::game::MatchState;

use super::Event;

/// Invoke every live object's handler for `event`, in the fixed traversal
/// order, and return the concatenated actions.
///
/// Dispatch never mutates anything except the handlers' own internal state
/// (an object is free to remember what it saw); all state changes happen
/// later, when the returned actions execute.
pub fn dispatch_event(state: &mut MatchState, event: &Event) -> EngineResult<Vec<Action>> {
    let mut collected = Vec::new();

    for pos in state.dispatch_order() {
        let Some(mut object) = state.take_object(pos) else {
            continue;
        };
        let actions = object.handle_event(event, pos, state);
        state.put_object(pos, object)?;

        if !actions.is_empty() {
            trace!(position = %pos, kind = ?event.kind(), count = actions.len(),
                "handler returned actions");
            collected.extend(actions);
        }
    }

    Ok(collected)
}
