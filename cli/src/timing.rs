//! Tracing setup with optional latency output.
//!
//! With `--timing`, every `#[instrument]`ed command logs its duration when its
//! span closes (`FmtSpan::CLOSE`). Records emitted by the business crate through
//! `log` are bridged into the same subscriber.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Level used when `RUST_LOG` is not set.
///
/// Span close events are emitted at INFO, so timing needs at least INFO.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    match (verbose, timing) {
        (true, _) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    }
}

fn span_events(timing: bool) -> FmtSpan {
    if timing { FmtSpan::CLOSE } else { FmtSpan::NONE }
}

/// Install the global subscriber. Output goes to stderr so tables on stdout stay clean.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events(timing))
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
