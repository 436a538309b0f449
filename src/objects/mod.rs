//! Game objects: the content extension trait, per-character state, and the
//! per-player table.

pub mod character;
pub mod object;
pub mod table;

pub use character::CharacterState;
pub use object::{GameObject, ObjectFactory, ObjectKind, ObjectSlot, Skill, Usage};
pub use table::PlayerTable;
