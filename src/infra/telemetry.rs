//! Global `tracing` subscriber for the CLI. Log lines go to stderr so stdout
//! carries only the rendered dashboard.

use std::{env, io};

use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// HTTP client internals, capped at `warn` unless `RUST_LOG` is set.
const QUIET_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let from_env = env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(build_filter(logging, from_env.as_deref()))
        .with(ErrorLayer::default())
        .with(fmt_layer(logging.format, io::stderr))
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// `RUST_LOG` directives win when present; otherwise the configured level
/// applies with the HTTP stack held back.
fn build_filter(logging: &LoggingSettings, from_env: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(logging.level.into());
    match from_env.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => builder.parse_lossy(directives),
        None => builder.parse_lossy(format!(
            "{},{}",
            logging.level,
            quiet_directives(logging.level)
        )),
    }
}

fn quiet_directives(level: LevelFilter) -> String {
    let cap = level.min(LevelFilter::WARN);
    QUIET_TARGETS
        .iter()
        .map(|target| format!("{target}={cap}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .without_time()
            .with_ansi(false)
            .with_writer(writer)
            .with_target(true)
            .boxed(),
    }
}
