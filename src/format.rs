/// Plain-text dumps and counts of a tree.
use std::fmt::Write;

use chrono::{DateTime, Duration, Utc};

use crate::tree::{ActivityKind, Tree};
use crate::types::{ActivityId, TimePeriod};

const NAME_WIDTH: usize = 24;
const INDENT: &str = "  ";

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `start  end  duration`, with dashes for the empty sentinel.
pub fn format_period(period: &TimePeriod) -> String {
    if period.is_empty() {
        return format!("{:<19}  {:<19}  {}", "-", "-", format_duration(period.duration()));
    }
    format!(
        "{}  {}  {}",
        format_instant(period.start()),
        format_instant(period.end()),
        format_duration(period.duration())
    )
}

/// One line per Activity, indented by depth, optionally followed by its Intervals.
pub fn render_tree(tree: &Tree, with_intervals: bool) -> String {
    let mut out = String::new();
    let mut stack: Vec<(ActivityId, usize)> = vec![(tree.root(), 0)];
    while let Some((id, depth)) = stack.pop() {
        let Ok(activity) = tree.activity(id) else {
            continue;
        };
        let name = if activity.parent().is_none() {
            "(root)"
        } else {
            activity.name()
        };
        let indent = INDENT.repeat(depth);
        let width = NAME_WIDTH.saturating_sub(indent.len());
        let _ = writeln!(
            out,
            "{indent}{}  {}",
            clamp_name(name, width),
            format_period(activity.period())
        );

        match activity.kind() {
            ActivityKind::Project { children } => {
                stack.extend(children.iter().rev().map(|child| (*child, depth + 1)));
            }
            ActivityKind::Task { intervals } if with_intervals => {
                let indent = INDENT.repeat(depth + 1);
                let width = NAME_WIDTH.saturating_sub(indent.len());
                for interval in intervals {
                    if let Ok(interval) = tree.interval(*interval) {
                        let _ = writeln!(
                            out,
                            "{indent}{}  {}",
                            clamp_name("·", width),
                            format_period(interval.period())
                        );
                    }
                }
            }
            ActivityKind::Task { .. } => {}
        }
    }
    out
}

/// Node counts below the root plus the root's accumulated duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub projects: usize,
    pub tasks: usize,
    pub intervals: usize,
    pub total_seconds: i64,
}

impl TreeStats {
    pub fn collect(tree: &Tree) -> Self {
        let mut stats = Self::default();
        for id in tree.activity_ids() {
            let Ok(activity) = tree.activity(id) else {
                continue;
            };
            match activity.kind() {
                ActivityKind::Project { .. } if id == tree.root() => {
                    stats.total_seconds = activity.period().duration_secs();
                }
                ActivityKind::Project { .. } => stats.projects += 1,
                ActivityKind::Task { intervals } => {
                    stats.tasks += 1;
                    stats.intervals += intervals.len();
                }
            }
        }
        stats
    }
}
