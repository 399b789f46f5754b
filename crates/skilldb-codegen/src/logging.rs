//! Log filter setup for the `regenerate-skilldb` binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Builder, LevelFilter};

fn filter_builder() -> Builder {
    EnvFilter::builder().with_default_directive(LevelFilter::INFO.into())
}

/// Filter from `RUST_LOG`, falling back to `info` only when it sets no
/// directives. Malformed directives are skipped.
pub fn env_filter() -> EnvFilter {
    filter_builder().from_env_lossy()
}

/// Same as [`env_filter`], with the directives given as a string.
pub fn parse_filter(directives: &str) -> EnvFilter {
    filter_builder().parse_lossy(directives)
}
