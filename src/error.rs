/// Errors raised by tree construction, editing and generation.
use thiserror::Error;

use crate::types::{ActivityId, IntervalId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A precondition on an argument failed (date order, duration bounds, ratio).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The edit would break the Project/Task/Interval nesting rules.
    #[error("structural violation: {0}")]
    StructuralViolation(String),
    #[error("unknown {0}")]
    UnknownActivity(ActivityId),
    #[error("unknown {0}")]
    UnknownInterval(IntervalId),
}

pub type TreeResult<T> = Result<T, TreeError>;
