//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use formatter_arbiter::Document;
use formatter_arbiter::surface::{
    PickItem, PromptRequest, PromptSurface, StatusSurface, TelemetrySink,
};
use formatter_arbiter::telemetry::TelemetryEvent;
use url::Url;

pub fn rust_document() -> Document {
    Document::new(Url::parse("file:///workspace/src/main.rs").unwrap(), "rust")
        .with_language_name("Rust")
}

/// Answers prompts and quick picks from one queue, in call order.
///
/// Running out of answers counts as dismissal.
#[derive(Debug, Default)]
pub struct UserAnswers {
    answers: Mutex<VecDeque<Option<usize>>>,
    calls: Mutex<Vec<String>>,
}

impl UserAnswers {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages and placeholders shown so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, shown: String) -> Option<usize> {
        self.calls.lock().unwrap().push(shown);
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

impl PromptSurface for UserAnswers {
    async fn prompt(&self, request: PromptRequest) -> Option<usize> {
        self.next(request.message)
    }

    async fn quick_pick(&self, _items: Vec<PickItem>, placeholder: String) -> Option<usize> {
        self.next(placeholder)
    }
}

#[derive(Debug, Default)]
pub struct CapturedStatus(Mutex<Vec<String>>);

impl CapturedStatus {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl StatusSurface for CapturedStatus {
    fn show_transient(&self, message: &str, _duration: Duration) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

#[derive(Debug, Default)]
pub struct CapturedTelemetry(Mutex<Vec<TelemetryEvent>>);

impl CapturedTelemetry {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl TelemetrySink for CapturedTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        self.0.lock().unwrap().push(event);
    }
}
