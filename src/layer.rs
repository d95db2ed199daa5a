//! [`tracing`] integration: route events into a [`LogFile`].
use std::fmt::Write as _;
use std::sync::Arc;

use crate::manager::LogFile;
use crate::record::{CallSite, Level, LogRecord};

/// Target prefix of this crate's own diagnostics, which the layer skips.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Collects the `message` field and any other fields of a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
    fields: String,
}

impl MessageExtractor {
    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        let _ = write!(self.fields, " {name}={value}");
    }

    fn into_message(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), &format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), &value);
        }
    }
}

/// A [`tracing_subscriber::Layer`] that writes every event to a [`LogFile`].
///
/// The event target becomes the component, and the metadata's module path
/// stands in for the function name. Events emitted by this crate itself are
/// skipped so the sink never logs into its own lock.
#[derive(Debug, Clone)]
pub struct LogFileLayer {
    sink: Arc<LogFile>,
}

impl LogFileLayer {
    /// Create a layer writing to `sink`.
    #[must_use]
    pub const fn new(sink: Arc<LogFile>) -> Self {
        Self { sink }
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogFileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);

        let site = CallSite {
            file: metadata.file(),
            line: metadata.line(),
            function: metadata.module_path(),
        };
        let record = LogRecord::new(
            metadata.target(),
            Level::from(*metadata.level()),
            extractor.into_message(),
        )
        .located(site);
        self.sink.log(&record);
    }
}
