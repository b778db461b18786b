//! Reproducible random Project/Task/Interval trees.
//!
//! The same seed and the same [`GeneratorParams`] always give the same tree:
//! every draw comes from one [`StdRng`] owned by the generator, in a fixed
//! order. Only Interval periods are drawn; Task and Project periods are filled
//! in by a consistency pass once the structure is complete.
mod random_date;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::consistency;
use crate::error::{TreeError, TreeResult};
use crate::tree::Tree;
use crate::types::{ActivityId, TimePeriod};

pub use random_date::RandomDate;

/// Generated names are a number below this bound.
const NAME_RANGE: f64 = 1000.0;

/// Shape of a generated tree.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    /// Levels of Activities below the root. Intervals are not counted.
    pub levels: usize,
    /// Upper bound on the children drawn for each Project.
    pub max_child_activities: usize,
    /// Upper bound on the Intervals drawn for each Task.
    pub max_intervals: usize,
    /// Chance that a new child is a Project rather than a Task, in `[0, 1]`.
    pub project_ratio: f64,
    /// Earliest Interval start.
    pub start_date: DateTime<Utc>,
    /// Latest Interval end; longer Intervals are clamped to it.
    pub end_date: DateTime<Utc>,
    pub min_interval_secs: i64,
    pub max_interval_secs: i64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            levels: 3,
            max_child_activities: 5,
            max_intervals: 5,
            project_ratio: 0.3,
            // 2020-01-01T00:00:00Z .. 2020-01-31T00:00:00Z
            start_date: DateTime::from_timestamp(1_577_836_800, 0).unwrap_or_default(),
            end_date: DateTime::from_timestamp(1_580_428_800, 0).unwrap_or_default(),
            min_interval_secs: 60,
            max_interval_secs: 7200,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> TreeResult<()> {
        if self.end_date < self.start_date {
            return Err(TreeError::InvalidArgument(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.min_interval_secs < 0 {
            return Err(TreeError::InvalidArgument(format!(
                "minimum interval duration {}s is negative",
                self.min_interval_secs
            )));
        }
        if self.max_interval_secs < self.min_interval_secs {
            return Err(TreeError::InvalidArgument(format!(
                "maximum interval duration {}s is below the minimum {}s",
                self.max_interval_secs, self.min_interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.project_ratio) {
            return Err(TreeError::InvalidArgument(format!(
                "project ratio {} is outside [0, 1]",
                self.project_ratio
            )));
        }
        Ok(())
    }
}

/// Builds random trees level by level from a seeded random source.
///
/// Reusing one generator for several calls continues the same random
/// sequence, so the second tree depends on the first.
pub struct RandomTreeGenerator {
    rng: StdRng,
}

impl Default for RandomTreeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomTreeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a tree and makes every Project and Task period consistent.
    pub fn generate(&mut self, params: &GeneratorParams) -> TreeResult<Tree> {
        params.validate()?;
        let dates = RandomDate::new(params.start_date, params.end_date)?;

        let mut tree = Tree::new();
        let root = tree.root();
        let mut frontier = vec![root];
        for level in 0..params.levels {
            debug!("level {}: expanding {} projects", level + 1, frontier.len());
            let mut next_frontier = Vec::new();
            for parent in frontier {
                let count = self.draw_count(params.max_child_activities);
                for _ in 0..count {
                    if let Some(project) = self.add_child(&mut tree, parent, params, &dates)? {
                        next_frontier.push(project);
                    }
                }
            }
            frontier = next_frontier;
        }

        consistency::recompute(&mut tree, root)?;
        info!(
            "generated tree: activities={} intervals={} levels={}",
            tree.activity_count(),
            tree.interval_count(),
            params.levels
        );
        Ok(tree)
    }

    /// Adds one Project or Task under `parent`. Returns the id when it is a Project.
    fn add_child(
        &mut self,
        tree: &mut Tree,
        parent: ActivityId,
        params: &GeneratorParams,
        dates: &RandomDate,
    ) -> TreeResult<Option<ActivityId>> {
        let number = (NAME_RANGE * self.rng.random::<f64>()) as u32;
        let description = self.rng.random::<i64>().unsigned_abs().to_string();

        if self.rng.random::<f64>() < params.project_ratio {
            let project = tree.add_project(parent, format!("P {number}"), description)?;
            debug!("project P {number} ({project}) under {parent}");
            return Ok(Some(project));
        }

        let task = tree.add_task(parent, format!("T {number}"), description)?;
        let count = self.draw_count(params.max_intervals);
        debug!("task T {number} ({task}) under {parent} with {count} intervals");
        for _ in 0..count {
            let period = self.draw_period(params, dates)?;
            tree.add_interval(task, period)?;
        }
        Ok(None)
    }

    fn draw_period(&mut self, params: &GeneratorParams, dates: &RandomDate) -> TreeResult<TimePeriod> {
        let spread = (params.max_interval_secs - params.min_interval_secs) as f64;
        let duration_secs =
            (params.min_interval_secs as f64 + spread * self.rng.random::<f64>()).round() as i64;
        let start = dates.next_date(&mut self.rng);

        let end = TimeDelta::try_seconds(duration_secs)
            .and_then(|duration| start.checked_add_signed(duration))
            .filter(|end| *end <= params.end_date);
        match end {
            Some(end) => TimePeriod::new(start, end, duration_secs),
            None => {
                debug!("interval starting {start} clamped to {}", params.end_date);
                TimePeriod::between(start, params.end_date)
            }
        }
    }

    /// `round(max * U)` with U uniform in `[0, 1)`.
    fn draw_count(&mut self, max: usize) -> usize {
        (max as f64 * self.rng.random::<f64>()).round() as usize
    }
}

/// One-shot generation with a fresh random source seeded by `seed`.
pub fn generate(params: &GeneratorParams, seed: u64) -> TreeResult<Tree> {
    RandomTreeGenerator::new(seed).generate(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(GeneratorParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_reversed_dates() {
        let defaults = GeneratorParams::default();
        let params = GeneratorParams {
            start_date: defaults.end_date,
            end_date: defaults.start_date,
            ..defaults
        };
        assert!(matches!(
            generate(&params, 0),
            Err(TreeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_inverted_duration_bounds() {
        let params = GeneratorParams {
            min_interval_secs: 600,
            max_interval_secs: 60,
            ..GeneratorParams::default()
        };
        assert!(matches!(
            generate(&params, 0),
            Err(TreeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_ratio_outside_unit_range() {
        for ratio in [-0.1, 1.5, f64::NAN] {
            let params = GeneratorParams {
                project_ratio: ratio,
                ..GeneratorParams::default()
            };
            assert!(params.validate().is_err(), "ratio {ratio} accepted");
        }
    }

    #[test]
    fn draw_count_never_exceeds_max() {
        let mut generator = RandomTreeGenerator::new(3);
        for _ in 0..1000 {
            assert!(generator.draw_count(4) <= 4);
        }
        assert_eq!(generator.draw_count(0), 0);
    }

    #[test]
    fn default_generator_matches_seed_zero() {
        let params = GeneratorParams::default();
        let from_default = RandomTreeGenerator::default().generate(&params).unwrap();
        let from_seed = generate(&params, 0).unwrap();
        assert_eq!(from_default, from_seed);
    }

    #[test]
    fn first_call_on_generator_matches_one_shot() {
        let params = GeneratorParams::default();
        let mut generator = RandomTreeGenerator::new(11);
        let first = generator.generate(&params).unwrap();
        assert_eq!(first, generate(&params, 11).unwrap());
        assert!(generator.generate(&params).is_ok());
    }
}
