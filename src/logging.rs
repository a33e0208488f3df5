//! Opt-in `env_logger` backend for the `log` calls made throughout the crate.
//!
//! The library itself only talks to the `log` facade; a driver that wants to
//! see buffer activity calls `enable_verbose_logging` once at startup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::KzError;

static INIT_LOGGER: Once = Once::new();

/// Most detailed level the verbose logger shows. Metric records pass it.
pub(crate) const VERBOSE_LEVEL: LevelFilter = LevelFilter::Info;

/// Installs an info-level logger that prints `[LEVEL] message` lines, either to
/// stderr or appended to `log_file`. Calls after the first are no-ops.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), KzError> {
    let target = match log_file {
        Some(path) => Some(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| KzError::file_access(path, e))?,
        ),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(VERBOSE_LEVEL);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });

    Ok(())
}
