/*!
 * Structured Tracing
 * Logging setup and per-command spans using the tracing crate
 */

use crate::command::Command;
use crate::core::types::Timestamp;
use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing
///
/// Logs go to stderr so that reports written to stdout stay parseable.
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .init();
        debug!("Structured tracing initialized");
    }
}

/// Span covering the processing of one command
pub struct CommandSpan {
    span: tracing::Span,
    start: Instant,
    command: Command,
}

impl CommandSpan {
    pub fn new(command: Command, timestamp: Timestamp) -> Self {
        let span = span!(
            Level::INFO,
            "command",
            command = %command,
            timestamp = timestamp,
        );

        Self {
            span,
            start: Instant::now(),
            command,
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CommandSpan {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        debug!(
            command = %self.command,
            duration_us = self.start.elapsed().as_micros() as u64,
            "command completed"
        );
    }
}
