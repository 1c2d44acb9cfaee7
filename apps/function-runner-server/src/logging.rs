//! Global tracing subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter directive used when `RUST_LOG` is unset: `-v` is debug, `-vv` and
/// above is trace, otherwise the configured level.
fn default_directive(config: &LoggingConfig, verbose: u8) -> &str {
    match verbose {
        0 => &config.level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the subscriber. Output goes to stderr so stdout stays free for
/// `--print-config` and `check`.
pub fn init_logging(config: &LoggingConfig, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
