//! Reporting which formatter a resolution ended up with.

use std::sync::Arc;

use serde::Serialize;
use ulid::Ulid;

use crate::candidate::{CandidateList, FormatKind, FormatterCandidate};
use crate::surface::TelemetrySink;

pub const FORMATTER_PICK_EVENT: &str = "formatterpick";
/// Key reported for a candidate without an extension identifier.
pub const UNKNOWN_KEY: &str = "unknown";
/// Key reported when no formatter was chosen.
pub const NONE_KEY: &str = "none";

/// How a resolution reached its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No user input was awaited for the returned value
    Automatic,
    /// The user answered a prompt
    Interactive,
}

/// Result of one resolution call; lives only until it is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub candidate: Option<FormatterCandidate>,
    pub resolution: Resolution,
}

impl SelectionOutcome {
    pub fn automatic(candidate: Option<FormatterCandidate>) -> Self {
        Self {
            candidate,
            resolution: Resolution::Automatic,
        }
    }

    pub fn interactive(candidate: Option<FormatterCandidate>) -> Self {
        Self {
            candidate,
            resolution: Resolution::Interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub name: String,
    pub request_id: String,
    pub mode: String,
    pub extensions: Vec<String>,
    pub pick: String,
    pub interactive: bool,
}

/// Stable telemetry key for an extension identifier.
pub fn extension_key(extension_id: Option<&str>) -> String {
    match extension_id {
        Some(id) if !id.is_empty() => id.to_lowercase(),
        _ => UNKNOWN_KEY.to_string(),
    }
}

#[derive(Debug)]
pub struct TelemetryReporter<T> {
    sink: Arc<T>,
}

impl<T> Clone for TelemetryReporter<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T: TelemetrySink> TelemetryReporter<T> {
    pub fn new(sink: Arc<T>) -> Self {
        Self { sink }
    }

    /// Build the event for one resolution attempt.
    pub fn event_for(
        kind: FormatKind,
        candidates: &CandidateList,
        outcome: &SelectionOutcome,
    ) -> TelemetryEvent {
        TelemetryEvent {
            name: FORMATTER_PICK_EVENT.to_string(),
            request_id: Ulid::new().to_string(),
            mode: kind.as_str().to_string(),
            extensions: candidates
                .iter()
                .map(|c| extension_key(c.extension_id.as_deref()))
                .collect(),
            pick: outcome
                .candidate
                .as_ref()
                .map(|c| extension_key(c.extension_id.as_deref()))
                .unwrap_or_else(|| NONE_KEY.to_string()),
            interactive: outcome.resolution == Resolution::Interactive,
        }
    }

    /// Publish one event. Never fails and never waits on the sink's transport.
    pub fn report(&self, kind: FormatKind, candidates: &CandidateList, outcome: &SelectionOutcome) {
        self.sink.publish(Self::event_for(kind, candidates, outcome));
    }
}
