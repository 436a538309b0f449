//! Core engine types: positions, dice, costs, configuration, errors, RNG.
//!
//! These are the building blocks everything else is expressed in. Content
//! objects only ever see positions and structured values, never references
//! into the match tree.

pub mod config;
pub mod dice;
pub mod error;
pub mod position;
pub mod rng;

pub use config::{CharacterBlueprint, MatchConfig};
pub use dice::{Cost, CostKind, DiceColor, DicePool};
pub use error::{EngineError, EngineResult};
pub use position::{Area, AreaKind, ObjectId, PlayerId, Position};
pub use rng::{MatchRng, MatchRngState};
