//! Tracing subscriber setup for trimview binaries and tests.
//!
//! Logs go to stderr so stdout stays free for command output.

use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the level filter, letting `RUST_LOG` override the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

fn build_subscriber<W>(
    config: &LoggingConfig,
    writer: W,
) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = env_filter(config);

    if config.json {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .json()
                .with_current_span(false)
                .finish(),
        )
    } else {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    }
}

/// Install the global subscriber described by `config`, writing to stderr.
///
/// Returns false when another global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let subscriber = build_subscriber(config, std::io::stderr);
    let installed = tracing::subscriber::set_global_default(subscriber).is_ok();

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    }
    installed
}

/// Route logs through the test harness's captured output.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
