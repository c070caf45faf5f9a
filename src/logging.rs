//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "KYOTEI_LOG";

/// Initialize logging to stderr.
///
/// `KYOTEI_LOG` takes the usual filter syntax (`KYOTEI_LOG=kyotei_rank=trace`).
/// Without it, `--verbose` shows debug output and the default is warnings only.
/// Calling this more than once is a no-op.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "kyotei_rank=debug"
        } else {
            "kyotei_rank=warn"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose),
            )
            .with(filter)
            .init();
    });
}
