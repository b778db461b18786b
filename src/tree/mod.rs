//! Arena-backed Project/Task/Interval tree.
//!
//! Every node lives in the [`Tree`]; parents refer to children by id and
//! children keep their parent's id as a plain back-reference. Edits are
//! checked at the call site: Activities only go under Projects, Intervals
//! only under Tasks. Nothing here recomputes periods, follow an edit with
//! [`crate::consistency::recompute`] or [`crate::consistency::refresh_ancestors`].
mod node;

use log::debug;

use crate::error::{TreeError, TreeResult};
use crate::types::{ActivityId, IntervalId, TimePeriod};

pub use node::{Activity, ActivityKind, Interval};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    activities: Vec<Option<Activity>>,
    intervals: Vec<Option<Interval>>,
    root: ActivityId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the unnamed root Project.
    pub fn new() -> Self {
        Self {
            activities: vec![Some(Activity::project(String::new(), String::new(), None))],
            intervals: Vec::new(),
            root: ActivityId(0),
        }
    }

    pub fn root(&self) -> ActivityId {
        self.root
    }

    pub fn activity(&self, id: ActivityId) -> TreeResult<&Activity> {
        self.activities
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownActivity(id))
    }

    pub(crate) fn activity_mut(&mut self, id: ActivityId) -> TreeResult<&mut Activity> {
        self.activities
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownActivity(id))
    }

    pub fn interval(&self, id: IntervalId) -> TreeResult<&Interval> {
        self.intervals
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownInterval(id))
    }

    fn interval_mut(&mut self, id: IntervalId) -> TreeResult<&mut Interval> {
        self.intervals
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownInterval(id))
    }

    /// Child Activities of a Project, in insertion order.
    pub fn children(&self, project: ActivityId) -> TreeResult<&[ActivityId]> {
        let activity = self.activity(project)?;
        match &activity.kind {
            ActivityKind::Project { children } => Ok(children),
            ActivityKind::Task { .. } => Err(TreeError::StructuralViolation(format!(
                "task '{}' has no child activities",
                activity.name
            ))),
        }
    }

    /// Intervals of a Task, in insertion order.
    pub fn intervals(&self, task: ActivityId) -> TreeResult<&[IntervalId]> {
        let activity = self.activity(task)?;
        match &activity.kind {
            ActivityKind::Task { intervals } => Ok(intervals),
            ActivityKind::Project { .. } => Err(TreeError::StructuralViolation(format!(
                "project '{}' has no intervals",
                activity.name
            ))),
        }
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: ActivityId) -> impl Iterator<Item = ActivityId> + '_ {
        let first = self.activity(id).ok().and_then(Activity::parent);
        std::iter::successors(first, move |current| {
            self.activity(*current).ok().and_then(Activity::parent)
        })
    }

    /// Live Activities in depth-first pre-order, starting at the root.
    pub fn activity_ids(&self) -> Vec<ActivityId> {
        let mut ordered = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            ordered.push(id);
            if let Ok(children) = self.children(id) {
                stack.extend(children.iter().rev());
            }
        }
        ordered
    }

    pub fn activity_count(&self) -> usize {
        self.activities.iter().flatten().count()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.iter().flatten().count()
    }

    pub fn add_project(
        &mut self,
        parent: ActivityId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> TreeResult<ActivityId> {
        self.children(parent)?;
        let activity = Activity::project(name.into(), description.into(), Some(parent));
        self.attach_activity(parent, activity)
    }

    pub fn add_task(
        &mut self,
        parent: ActivityId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> TreeResult<ActivityId> {
        self.children(parent)?;
        let activity = Activity::task(name.into(), description.into(), parent);
        self.attach_activity(parent, activity)
    }

    pub fn add_interval(&mut self, task: ActivityId, period: TimePeriod) -> TreeResult<IntervalId> {
        self.intervals(task)?;
        let id = IntervalId(next_slot(self.intervals.len())?);
        self.intervals.push(Some(Interval { task, period }));
        if let ActivityKind::Task { intervals } = &mut self.activity_mut(task)?.kind {
            intervals.push(id);
        }
        Ok(id)
    }

    /// Overwrites a leaf period. Ancestors keep their old period until recomputed.
    pub fn set_interval_period(&mut self, id: IntervalId, period: TimePeriod) -> TreeResult<()> {
        self.interval_mut(id)?.period = period;
        Ok(())
    }

    /// Detaches an Activity from its Project and drops everything beneath it.
    pub fn remove_activity(&mut self, id: ActivityId) -> TreeResult<()> {
        let parent = self.activity(id)?.parent.ok_or_else(|| {
            TreeError::StructuralViolation("the root project cannot be removed".to_string())
        })?;
        if let ActivityKind::Project { children } = &mut self.activity_mut(parent)?.kind {
            children.retain(|child| *child != id);
        }

        let mut pending = vec![id];
        let mut dropped_intervals = 0usize;
        while let Some(current) = pending.pop() {
            let Some(activity) = self.activities.get_mut(current.index()).and_then(Option::take)
            else {
                continue;
            };
            match activity.kind {
                ActivityKind::Project { children } => pending.extend(children),
                ActivityKind::Task { intervals } => {
                    for interval in intervals {
                        if let Some(slot) = self.intervals.get_mut(interval.index()) {
                            *slot = None;
                            dropped_intervals += 1;
                        }
                    }
                }
            }
        }
        debug!("removed {id} and {dropped_intervals} intervals beneath it");
        Ok(())
    }

    pub fn remove_interval(&mut self, id: IntervalId) -> TreeResult<()> {
        let task = self.interval(id)?.task;
        if let ActivityKind::Task { intervals } = &mut self.activity_mut(task)?.kind {
            intervals.retain(|interval| *interval != id);
        }
        self.intervals[id.index()] = None;
        Ok(())
    }

    pub(crate) fn set_activity_period(&mut self, id: ActivityId, period: TimePeriod) -> TreeResult<()> {
        self.activity_mut(id)?.period = period;
        Ok(())
    }

    fn attach_activity(&mut self, parent: ActivityId, activity: Activity) -> TreeResult<ActivityId> {
        let id = ActivityId(next_slot(self.activities.len())?);
        self.activities.push(Some(activity));
        if let ActivityKind::Project { children } = &mut self.activity_mut(parent)?.kind {
            children.push(id);
        }
        Ok(id)
    }
}

fn next_slot(len: usize) -> TreeResult<u32> {
    u32::try_from(len).map_err(|_| {
        TreeError::InvalidArgument(format!("node index {len} exceeds the limit of {}", u32::MAX))
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn period(start_hour: u32, end_hour: u32) -> TimePeriod {
        TimePeriod::between(
            Utc.with_ymd_and_hms(2020, 1, 1, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 1, 1, end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn new_tree_has_unnamed_root() {
        let tree = Tree::new();
        let root = tree.activity(tree.root()).unwrap();
        assert!(root.is_project());
        assert_eq!(root.name(), "");
        assert_eq!(root.parent(), None);
        assert!(root.period().is_empty());
        assert_eq!(tree.activity_count(), 1);
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_project(root, "P 001", "a").unwrap();
        let b = tree.add_task(root, "T 002", "b").unwrap();
        let c = tree.add_project(root, "P 003", "c").unwrap();
        assert_eq!(tree.children(root).unwrap(), &[a, b, c]);
        assert_eq!(tree.activity(b).unwrap().parent(), Some(root));
    }

    #[test]
    fn ancestors_walk_up_to_root() {
        let mut tree = Tree::new();
        let root = tree.root();
        let outer = tree.add_project(root, "outer", "").unwrap();
        let inner = tree.add_project(outer, "inner", "").unwrap();
        let task = tree.add_task(inner, "task", "").unwrap();
        let chain: Vec<_> = tree.ancestors(task).collect();
        assert_eq!(chain, vec![inner, outer, root]);
        assert_eq!(tree.ancestors(root).count(), 0);
    }

    #[test]
    fn activity_ids_are_preorder() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_project(root, "a", "").unwrap();
        let b = tree.add_task(root, "b", "").unwrap();
        let a1 = tree.add_task(a, "a1", "").unwrap();
        assert_eq!(tree.activity_ids(), vec![root, a, a1, b]);
    }

    #[test]
    fn intervals_only_under_tasks() {
        let mut tree = Tree::new();
        let root = tree.root();
        let err = tree.add_interval(root, period(9, 10)).unwrap_err();
        assert!(matches!(err, TreeError::StructuralViolation(_)));
        assert_eq!(tree.interval_count(), 0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn slot_limit_is_reported_as_u32_max() {
        assert_eq!(next_slot(7), Ok(7));
        assert_eq!(next_slot(u32::MAX as usize), Ok(u32::MAX));
        let over = u32::MAX as usize + 1;
        let err = next_slot(over).unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidArgument(format!("node index {over} exceeds the limit of 4294967295"))
        );
    }

    #[test]
    fn removing_interval_detaches_it() {
        let mut tree = Tree::new();
        let task = tree.add_task(tree.root(), "t", "").unwrap();
        let first = tree.add_interval(task, period(9, 10)).unwrap();
        let second = tree.add_interval(task, period(11, 12)).unwrap();
        tree.remove_interval(first).unwrap();
        assert_eq!(tree.intervals(task).unwrap(), &[second]);
        assert_eq!(tree.interval(first), Err(TreeError::UnknownInterval(first)));
    }
}
