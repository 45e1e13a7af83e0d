//! Logger setup for the terminal front end.
//!
//! The renderer owns the terminal while it runs, so log output never goes to
//! stderr: it is written to a file, and is off unless a file or a filter is
//! given.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

/// Log file used when a filter is given without an explicit file
pub const DEFAULT_LOG_FILE: &str = "glview-terminal.log";

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glview_core=debug"). `RUST_LOG` is consulted when it is `None`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Where log records go, or `None` when logging is off
    pub fn log_path(&self) -> Option<&Path> {
        match (&self.file, &self.filter) {
            (Some(path), _) => Some(path),
            (None, Some(_)) => Some(Path::new(DEFAULT_LOG_FILE)),
            (None, None) => None,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored and leave an
/// already open log file untouched.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let mut result = Ok(());

    INIT.call_once(|| {
        let Some(path) = config.log_path() else {
            return;
        };
        let file = match File::create(path) {
            Ok(file) => file,
            Err(e) => {
                result = Err(e);
                return;
            }
        };

        let mut builder = env_logger::Builder::new();
        if let Some(filter) = &config.filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.target(env_logger::Target::Pipe(Box::new(file)));
        builder.init();

        log::debug!("logging initialized");
    });

    result
}
