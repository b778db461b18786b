//! Hierarchical time tracking: Projects hold Projects and Tasks, Tasks hold
//! Intervals, and every composite carries a period derived from its leaves.
pub mod consistency;
pub mod error;
pub mod format;
pub mod generator;
pub mod tree;
pub mod types;

pub use consistency::{recompute, refresh_ancestors};
pub use error::{TreeError, TreeResult};
pub use generator::{GeneratorParams, RandomDate, RandomTreeGenerator, generate};
pub use tree::{Activity, ActivityKind, Interval, Tree};
pub use types::{ActivityId, IntervalId, TimePeriod};
