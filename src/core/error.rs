//! Engine error taxonomy.
//!
//! Two families share one enum:
//!
//! - **Request errors** (`InsufficientDice`, `CostUnmet`, `NotPermitted`,
//!   `NotFound`): the caller asked for something the current state does not
//!   allow. Match state is unchanged and the caller may retry.
//! - **Invariant violations**: a contract between engine and content was
//!   broken (malformed position shape, TEST-mode mutation, negative usage).
//!   These are fatal - the match is aborted, never silently continued.

use thiserror::Error;

use super::position::Position;

/// Every fallible engine operation returns this.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The dice pool cannot satisfy a cost requirement.
    #[error("insufficient dice: requirement needs {needed}, pool holds {available} usable")]
    InsufficientDice { needed: usize, available: usize },

    /// A validated cost was not covered by the submitted payment.
    #[error("cost not met: {0}")]
    CostUnmet(String),

    /// The request is illegal in the current state (wrong phase, wrong
    /// player, dead target, ...).
    #[error("action not permitted: {0}")]
    NotPermitted(String),

    /// A must-find query matched nothing. Distinct from an empty `all()`
    /// result, which is not an error.
    #[error("no object found: {0}")]
    NotFound(String),

    /// Engine or content bug. Fatal to the match.
    #[error("engine invariant violated: {message}")]
    InvariantViolation {
        message: String,
        /// The offending position, when one is known.
        position: Option<Position>,
    },
}

impl EngineError {
    /// Build an invariant violation without positional context.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
            position: None,
        }
    }

    /// Build an invariant violation pointing at a position.
    pub fn invariant_at(message: impl Into<String>, position: Position) -> Self {
        Self::InvariantViolation {
            message: message.into(),
            position: Some(position),
        }
    }

    /// Does this error abort the match?
    ///
    /// Request errors are recovered at the action-validation boundary;
    /// invariant violations propagate to the top.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}
