use crate::types::{ActivityId, IntervalId, TimePeriod};

/// What an Activity holds beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Project { children: Vec<ActivityId> },
    Task { intervals: Vec<IntervalId> },
}

///A Project or a Task. Its period is derived from whatever sits below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) period: TimePeriod,
    pub(crate) parent: Option<ActivityId>,
    pub(crate) kind: ActivityKind,
}

impl Activity {
    pub(crate) fn project(name: String, description: String, parent: Option<ActivityId>) -> Self {
        Self {
            name,
            description,
            period: TimePeriod::empty(),
            parent,
            kind: ActivityKind::Project {
                children: Vec::new(),
            },
        }
    }

    pub(crate) fn task(name: String, description: String, parent: ActivityId) -> Self {
        Self {
            name,
            description,
            period: TimePeriod::empty(),
            parent: Some(parent),
            kind: ActivityKind::Task {
                intervals: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn period(&self) -> &TimePeriod {
        &self.period
    }

    /// `None` only for the root Project.
    pub fn parent(&self) -> Option<ActivityId> {
        self.parent
    }

    pub fn kind(&self) -> &ActivityKind {
        &self.kind
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, ActivityKind::Project { .. })
    }

    pub fn is_task(&self) -> bool {
        matches!(self.kind, ActivityKind::Task { .. })
    }
}

/// A recorded stretch of work, owned by exactly one Task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub(crate) task: ActivityId,
    pub(crate) period: TimePeriod,
}

impl Interval {
    pub fn task(&self) -> ActivityId {
        self.task
    }

    pub fn period(&self) -> &TimePeriod {
        &self.period
    }
}
