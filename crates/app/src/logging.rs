//! Tracing subscriber setup.

use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins unless `-v`/`-q` was given explicitly.
pub fn init(verbosity: &Verbosity<WarnLevel>) {
    let level = verbosity.tracing_level_filter();
    let filter = if verbosity.is_present() {
        build_env_filter(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| build_env_filter(level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Our crates at `level`; dependencies stay at warn.
fn build_env_filter(level: LevelFilter) -> EnvFilter {
    let level = level.to_string().to_lowercase();
    EnvFilter::new(format!(
        "warn,flashdeck={level},services={level},storage={level},flashdeck_core={level}"
    ))
}
