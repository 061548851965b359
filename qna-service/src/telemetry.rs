//! Log output for `qna_service` events.
//!
//! The binary owns the subscriber; this module hands it a layer that renders
//! only this crate's events (client construction, each `generateanswer` call,
//! retries) and the `EnvFilter` the whole process runs under.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "qna_service";

/// RFC3339 UTC timestamps, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Compact single-line layer for `qna_service` events only.
///
/// Span events stay off: the client logs flat events with `latency_ms`
/// fields and opens no spans of its own.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let only_this_crate = filter::filter_fn(|meta| meta.target().starts_with(TARGET_PREFIX));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_ansi(io::stdout().is_terminal())
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate)
}

/// Directive for this crate only, e.g. `qna_service=debug`.
pub fn level_directive(level: Level) -> Result<Directive, ParseError> {
    Directive::from_str(&format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase()))
}

/// Process-wide filter.
///
/// A valid `RUST_LOG` is used exactly as given, so `RUST_LOG=qna_service=debug`
/// shows the per-request `POST` lines. Otherwise everything logs at
/// `default_level` and this crate at `crate_level`.
pub fn env_filter(default_level: Level, crate_level: Level) -> EnvFilter {
    filter_from(
        std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        default_level,
        crate_level,
    )
}

fn filter_from(rust_log: Option<&str>, default_level: Level, crate_level: Level) -> EnvFilter {
    if let Some(spec) = rust_log.filter(|s| !s.trim().is_empty()) {
        match EnvFilter::try_new(spec) {
            Ok(f) => return f,
            Err(e) => eprintln!("ignoring invalid RUST_LOG `{spec}`: {e}"),
        }
    }

    let base = EnvFilter::new(default_level.as_str().to_lowercase());
    match level_directive(crate_level) {
        Ok(d) => base.add_directive(d),
        Err(_) => base,
    }
}
