/// Bottom-up propagation of periods from Intervals to Tasks and Projects.
///
/// A composite starts at the earliest start below it, ends at the latest end
/// and accumulates the sum of the durations. Interval periods are leaf data
/// and are only read here.
use log::debug;

use crate::error::TreeResult;
use crate::tree::{ActivityKind, Tree};
use crate::types::{ActivityId, TimePeriod};

/// Recomputes `id` and every Project or Task beneath it, children first.
pub fn recompute(tree: &mut Tree, id: ActivityId) -> TreeResult<()> {
    recompute_subtree(tree, id)?;
    debug!("recomputed periods under {id}");
    Ok(())
}

/// Refolds `id` and each of its ancestors from their direct children.
///
/// Use after editing a single Task or Project when the rest of the tree is
/// already consistent; siblings along the chain are read, not revisited.
pub fn refresh_ancestors(tree: &mut Tree, id: ActivityId) -> TreeResult<()> {
    tree.activity(id)?;
    let chain: Vec<ActivityId> = std::iter::once(id).chain(tree.ancestors(id)).collect();
    for current in chain {
        let period = fold_children(tree, current)?;
        tree.set_activity_period(current, period)?;
    }
    Ok(())
}

/// Visits the subtree in pre-order, then folds it back to front so every
/// child is settled before its parent reads it.
fn recompute_subtree(tree: &mut Tree, id: ActivityId) -> TreeResult<()> {
    let mut preorder = Vec::new();
    let mut pending = vec![id];
    while let Some(current) = pending.pop() {
        // Intervals are leaves; a Task folds them directly.
        if let ActivityKind::Project { children } = tree.activity(current)?.kind() {
            pending.extend(children.iter().copied());
        }
        preorder.push(current);
    }
    for current in preorder.into_iter().rev() {
        let period = fold_children(tree, current)?;
        tree.set_activity_period(current, period)?;
    }
    Ok(())
}

/// Folds the periods directly below `id`; no children yields the empty sentinel.
fn fold_children(tree: &Tree, id: ActivityId) -> TreeResult<TimePeriod> {
    let mut period = TimePeriod::empty();
    match tree.activity(id)?.kind() {
        ActivityKind::Project { children } => {
            for child in children {
                period.absorb(tree.activity(*child)?.period());
            }
        }
        ActivityKind::Task { intervals } => {
            for interval in intervals {
                period.absorb(tree.interval(*interval)?.period());
            }
        }
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn task_folds_its_intervals() {
        let mut tree = Tree::new();
        let root = tree.root();
        let task = tree.add_task(root, "T 100", "").unwrap();
        tree.add_interval(task, TimePeriod::new(at(9), at(10), 3600).unwrap())
            .unwrap();
        tree.add_interval(task, TimePeriod::new(at(12), at(14), 7200).unwrap())
            .unwrap();

        recompute(&mut tree, root).unwrap();

        let period = tree.activity(task).unwrap().period();
        assert_eq!(period.start(), at(9));
        assert_eq!(period.end(), at(14));
        assert_eq!(period.duration_secs(), 10800);
    }

    #[test]
    fn empty_task_keeps_sentinel_and_does_not_widen_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let empty = tree.add_task(root, "T 001", "").unwrap();
        let busy = tree.add_task(root, "T 002", "").unwrap();
        tree.add_interval(busy, TimePeriod::new(at(8), at(9), 3600).unwrap())
            .unwrap();

        recompute(&mut tree, root).unwrap();

        assert!(tree.activity(empty).unwrap().period().is_empty());
        let root_period = tree.activity(root).unwrap().period();
        assert_eq!(root_period.start(), at(8));
        assert_eq!(root_period.end(), at(9));
        assert_eq!(root_period.duration_secs(), 3600);
    }

    #[test]
    fn deep_chain_recomputes_without_recursion() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut parent = root;
        for _ in 0..50_000 {
            parent = tree.add_project(parent, "P 1", "").unwrap();
        }
        let task = tree.add_task(parent, "T 2", "").unwrap();
        tree.add_interval(task, TimePeriod::new(at(8), at(9), 3600).unwrap())
            .unwrap();

        recompute(&mut tree, root).unwrap();

        let root_period = tree.activity(root).unwrap().period();
        assert_eq!(root_period.start(), at(8));
        assert_eq!(root_period.end(), at(9));
        assert_eq!(root_period.duration_secs(), 3600);
    }

    #[test]
    fn refresh_only_touches_the_chain() {
        let mut tree = Tree::new();
        let root = tree.root();
        let project = tree.add_project(root, "P 001", "").unwrap();
        let task = tree.add_task(project, "T 002", "").unwrap();
        tree.add_interval(task, TimePeriod::new(at(8), at(9), 3600).unwrap())
            .unwrap();

        refresh_ancestors(&mut tree, task).unwrap();

        assert_eq!(tree.activity(root).unwrap().period().duration_secs(), 3600);
        assert_eq!(tree.activity(project).unwrap().period().start(), at(8));
    }
}
