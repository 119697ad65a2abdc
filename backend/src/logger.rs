//! Tracing setup for the library and the CLI.
//!
//! Verbosity is controlled with the `INSCRIPTA_LOG` environment variable
//! using the usual `EnvFilter` directives (e.g. `debug` or
//! `inscripta_backend=trace`). Defaults to `info`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("INSCRIPTA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
