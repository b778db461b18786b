use chrono::{DateTime, TimeDelta, Utc};
use rand::RngExt;
use rand::rngs::StdRng;

use crate::error::{TreeError, TreeResult};

/// Uniform instants between two bounds, both inclusive, at millisecond resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomDate {
    start: DateTime<Utc>,
    span_ms: i64,
}

impl RandomDate {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> TreeResult<Self> {
        if end < start {
            return Err(TreeError::InvalidArgument(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self {
            start,
            span_ms: (end - start).num_milliseconds(),
        })
    }

    /// Draws the next instant from the caller's random source.
    pub fn next_date(&self, rng: &mut StdRng) -> DateTime<Utc> {
        self.start + TimeDelta::milliseconds(rng.random_range(0..=self.span_ms))
    }
}
