use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "wirekit=warn,wirekit_common=warn";
const VERBOSE_DIRECTIVES: &str = "wirekit=debug,wirekit_common=debug";

/// Install the stderr log subscriber.
///
/// `--verbose` forces debug output for wirekit's own crates; otherwise
/// `RUST_LOG` is honoured, falling back to warnings only.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_DIRECTIVES.into())
    };
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init();
    if let Err(e) = result {
        eprintln!("[wirekit] warning: could not initialise logging: {e}");
    }
}
