//! Logger initialisation for the `stepconf` binary.
//!
//! Library code only talks to the [`log`] facade.  The binary installs
//! [`env_logger`] once at startup with a default level derived from the
//! command line; setting `RUST_LOG` overrides it:
//!
//! ```sh
//! $> RUST_LOG=stepconf=trace stepconf -i app.conf
//! ```

use log::{LevelFilter, SetLoggerError};

/// Install the global logger.  Fails only if a logger is already set.
pub fn init(default_level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
}
