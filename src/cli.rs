/// CLI argument parsing and command handling.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use timetree::format::{TreeStats, format_duration, render_tree};
use timetree::{GeneratorParams, Tree, generate};

#[derive(Parser)]
#[command(
    name = "timetree",
    version,
    about = "timetree - Generate and inspect random project/task/interval trees"
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a generated tree, one line per node.
    Generate {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Leave Interval lines out of the dump.
        #[arg(long = "no-intervals")]
        no_intervals: bool,
    },
    /// Print node counts and the total duration of a generated tree.
    Stats {
        #[command(flatten)]
        shape: ShapeArgs,
    },
}

/// Generator knobs. Anything left out falls back to `GeneratorParams::default()`.
#[derive(Args, Debug)]
pub struct ShapeArgs {
    #[arg(short = 'l', long = "levels")]
    levels: Option<usize>,
    #[arg(short = 'c', long = "max-children")]
    max_children: Option<usize>,
    #[arg(short = 'i', long = "max-intervals")]
    max_intervals: Option<usize>,
    #[arg(short = 'r', long = "ratio")]
    ratio: Option<f64>,
    #[arg(short = 's', long = "start")]
    start: Option<String>,
    #[arg(short = 'e', long = "end")]
    end: Option<String>,
    #[arg(long = "min-duration")]
    min_duration: Option<i64>,
    #[arg(long = "max-duration")]
    max_duration: Option<i64>,
    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,
}

impl ShapeArgs {
    fn params(&self) -> Result<GeneratorParams> {
        let defaults = GeneratorParams::default();
        Ok(GeneratorParams {
            levels: self.levels.unwrap_or(defaults.levels),
            max_child_activities: self.max_children.unwrap_or(defaults.max_child_activities),
            max_intervals: self.max_intervals.unwrap_or(defaults.max_intervals),
            project_ratio: self.ratio.unwrap_or(defaults.project_ratio),
            start_date: parse_optional_datetime(self.start.as_deref())?.unwrap_or(defaults.start_date),
            end_date: parse_optional_datetime(self.end.as_deref())?.unwrap_or(defaults.end_date),
            min_interval_secs: self.min_duration.unwrap_or(defaults.min_interval_secs),
            max_interval_secs: self.max_duration.unwrap_or(defaults.max_interval_secs),
        })
    }

    fn build(&self) -> Result<Tree> {
        let params = self.params()?;
        let tree = generate(&params, self.seed)?;
        Ok(tree)
    }
}

/// Execute a CLI command (generate or stats).
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            shape,
            no_intervals,
        } => handle_generate(&shape, !no_intervals)?,
        Command::Stats { shape } => handle_stats(&shape)?,
    }
    Ok(())
}

fn handle_generate(shape: &ShapeArgs, with_intervals: bool) -> Result<()> {
    let tree = shape.build()?;
    print!("{}", render_tree(&tree, with_intervals));
    Ok(())
}

fn handle_stats(shape: &ShapeArgs) -> Result<()> {
    let tree = shape.build()?;
    let stats = TreeStats::collect(&tree);
    println!("Projects : {}", stats.projects);
    println!("Tasks    : {}", stats.tasks);
    println!("Intervals: {}", stats.intervals);
    println!(
        "Total    : {}",
        format_duration(
            chrono::Duration::try_seconds(stats.total_seconds).unwrap_or(chrono::Duration::MAX)
        )
    );
    Ok(())
}

fn parse_optional_datetime(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(s) => {
            let dt = DateTime::parse_from_rfc3339(s)
                .with_context(|| format!("'{s}' is not an RFC 3339 timestamp"))?
                .with_timezone(&Utc);
            Ok(Some(dt))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_fall_back_to_defaults() {
        let cli = Cli::try_parse_from(["timetree", "stats"]).unwrap();
        let Command::Stats { shape } = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(shape.params().unwrap(), GeneratorParams::default());
        assert_eq!(shape.seed, 0);
    }

    #[test]
    fn flags_override_params() {
        let cli = Cli::try_parse_from([
            "timetree",
            "generate",
            "--levels",
            "2",
            "--ratio",
            "0",
            "--start",
            "2020-01-01T00:00:00Z",
            "--end",
            "2020-01-02T00:00:00Z",
            "--seed",
            "42",
            "--no-intervals",
        ])
        .unwrap();
        let Command::Generate {
            shape,
            no_intervals,
        } = cli.command
        else {
            panic!("expected generate command");
        };
        let params = shape.params().unwrap();
        assert!(no_intervals);
        assert_eq!(params.levels, 2);
        assert_eq!(params.project_ratio, 0.0);
        assert_eq!(params.end_date - params.start_date, chrono::Duration::days(1));
        assert_eq!(shape.seed, 42);
    }

    #[test]
    fn bad_timestamp_is_reported() {
        assert!(parse_optional_datetime(Some("yesterday")).is_err());
    }
}
