pub mod config;
pub mod errors;

pub use config::{AppConfig, LoggingConfig, PathsConfig, DEFAULT_CONFIG_FILE};
pub use errors::{ErrorKind, PayrollSortError, Result};
