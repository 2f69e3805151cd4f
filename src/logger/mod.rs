//! Global `tracing` subscriber with a reloadable filter. Bootstrapped before
//! settings are parsed, then narrowed to `log.filter`.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
