use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::error::{TreeError, TreeResult};

/// Arena index of a Project or Task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityId(pub(crate) u32);

/// Arena index of an Interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalId(pub(crate) u32);

impl ActivityId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl IntervalId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "activity#{}", self.0)
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interval#{}", self.0)
    }
}

/// Start, end and accumulated duration of a node.
///
/// For Intervals the duration is assigned directly. For Projects and Tasks it
/// is the sum of the children's durations and may differ from `end - start`
/// when children overlap or leave gaps.
///
/// A node without content carries the empty sentinel: `start` at the largest
/// representable instant, `end` at the smallest, duration zero. Check
/// [`TimePeriod::is_empty`] before showing or comparing spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimePeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_secs: i64,
}

impl TimePeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, duration_secs: i64) -> TreeResult<Self> {
        if end < start {
            return Err(TreeError::InvalidArgument(format!(
                "period ends at {end} before it starts at {start}"
            )));
        }
        if duration_secs < 0 {
            return Err(TreeError::InvalidArgument(format!(
                "period duration {duration_secs}s is negative"
            )));
        }
        Ok(Self {
            start,
            end,
            duration_secs,
        })
    }

    /// Period whose duration is exactly its span, rounded to whole seconds.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> TreeResult<Self> {
        let duration_secs = round_to_seconds(end - start);
        Self::new(start, end, duration_secs)
    }

    pub const fn empty() -> Self {
        Self {
            start: DateTime::<Utc>::MAX_UTC,
            end: DateTime::<Utc>::MIN_UTC,
            duration_secs: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == DateTime::<Utc>::MAX_UTC && self.end == DateTime::<Utc>::MIN_UTC
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration_secs
    }

    /// Accumulated duration, saturating at `Duration::MAX` for huge sums.
    pub fn duration(&self) -> Duration {
        Duration::try_seconds(self.duration_secs).unwrap_or(Duration::MAX)
    }

    /// Wall-clock distance between start and end, `None` for the empty sentinel.
    pub fn span(&self) -> Option<Duration> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - self.start)
        }
    }

    /// Widens this period to cover `other` and adds its duration, saturating at `i64::MAX`.
    pub(crate) fn absorb(&mut self, other: &TimePeriod) {
        if other.start < self.start {
            self.start = other.start;
        }
        if other.end > self.end {
            self.end = other.end;
        }
        self.duration_secs = self.duration_secs.saturating_add(other.duration_secs);
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        Self::empty()
    }
}

/// Rounds half away from zero to whole seconds.
pub(crate) fn round_to_seconds(delta: Duration) -> i64 {
    (delta.num_milliseconds() as f64 / 1000.0).round() as i64
}
