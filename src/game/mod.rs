//! The match aggregate, phase machine, and driver surface.
//!
//! `Start → RoundPrepare → Roll → Action → RoundEnd → (RoundPrepare |
//! MatchEnd)`. Phase transitions run through [`MatchState::advance`]; the
//! action phase advances through [`MatchState::submit`] instead, one player
//! action at a time.

mod driver;
mod state;

pub use driver::PlayerAction;
pub use state::{MatchResult, MatchState, Phase};
