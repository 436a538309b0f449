//! # omni-tcg
//!
//! The rules-resolution engine of a turn-based, dual-player dice TCG.
//!
//! ## Design Principles
//!
//! 1. **Content-Agnostic**: No cards or characters are hardcoded. Content
//!    implements `GameObject` and is resolved by name through the host's
//!    `ObjectFactory`.
//!
//! 2. **Positions Over References**: Entities address each other through
//!    `Position` (player, area, index). Stale positions stop resolving
//!    instead of dangling; removal is idempotent.
//!
//! 3. **Actions Are The Only Mutation**: Handlers and hooks return
//!    `Action`s; the executor applies them one at a time, emits the
//!    corresponding `Event`, and queues reactions breadth-first. The action
//!    log plus the seed replays the match.
//!
//! ## Architecture
//!
//! - **Two-Phase Values**: Costs, damage, and usage changes are folded
//!   through every object's modifier hook. A TEST pass probes without side
//!   effects; the REAL pass is the identical traversal but may consume
//!   usage. Divergence between the passes aborts the match.
//!
//! - **Deterministic Throughout**: Fixed traversal order, seeded ChaCha8
//!   RNG with O(1) state capture, persistent (`im`) action log.
//!
//! ## Modules
//!
//! - `core`: Positions, dice and costs, configuration, errors, RNG
//! - `objects`: The `GameObject` trait, characters, per-player tables
//! - `values`: Value kinds and the TEST/REAL modifier pipeline
//! - `events`: Event variants and the dispatcher
//! - `actions`: Action variants and the execution loop
//! - `query`: Structured read-only board lookups
//! - `game`: Match state, phase machine, player-action driver
//! - `selector`: Default dice selection for costs, rerolls, and tuning

pub mod actions;
pub mod core;
pub mod events;
pub mod game;
pub mod objects;
pub mod query;
pub mod selector;
pub mod values;

// Re-export commonly used types
pub use crate::core::{
    Area, AreaKind, CharacterBlueprint, Cost, CostKind, DiceColor, DicePool, EngineError,
    EngineResult, MatchConfig, MatchRng, MatchRngState, ObjectId, PlayerId, Position,
};

pub use crate::objects::{
    CharacterState, GameObject, ObjectFactory, ObjectKind, ObjectSlot, PlayerTable, Skill, Usage,
};

pub use crate::values::{
    compute_value, CostValue, DamageValue, UsageValue, Value, ValueMode,
};

pub use crate::events::{dispatch_event, Event, EventKind};

pub use crate::actions::{run_actions, Action, ActionRecord};

pub use crate::query::{PlayerRelation, Query, Role};

pub use crate::game::{MatchResult, MatchState, Phase, PlayerAction};

pub use crate::selector::{
    cost_satisfied, select_for_cost, select_reroll, select_tuning, ColorPriority, DiceSelection,
};
