/// Logger bootstrap for the command-line front end.
use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Starts logging to stderr. `RUST_LOG` wins over `level` when set.
///
/// The returned handle must stay alive for as long as records should be written.
pub fn init(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("failed to start logger")
}
