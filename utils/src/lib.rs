//! Shared utilities for dobverify.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_tracing, LogConfig, LogFormat, LoggingError};
pub use stats::VerdictTally;
pub use time::format_elapsed;
