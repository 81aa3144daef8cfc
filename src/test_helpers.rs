//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use url::Url;

use crate::candidate::{Document, FormatterCandidate};
use crate::config::{ConfigurationStore, SettingScope};
use crate::error::{ArbiterError, ArbiterResult};
use crate::surface::{PickItem, PromptRequest, PromptSurface, StatusSurface, TelemetrySink};
use crate::telemetry::TelemetryEvent;

pub(crate) fn document(language_id: &str) -> Document {
    Document::new(
        Url::parse(&format!("file:///workspace/main.{language_id}")).unwrap(),
        language_id,
    )
}

pub(crate) fn alpha() -> FormatterCandidate {
    FormatterCandidate::new("ext.a", "Alpha")
}

pub(crate) fn beta() -> FormatterCandidate {
    FormatterCandidate::new("ext.b", "Beta")
}

/// Prompt surface answering from queues; an empty queue means "dismissed".
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    prompt_answers: Mutex<VecDeque<Option<usize>>>,
    pick_answers: Mutex<VecDeque<Option<usize>>>,
    prompts: Mutex<Vec<PromptRequest>>,
    picks: Mutex<Vec<(Vec<PickItem>, String)>>,
    hang: bool,
}

impl ScriptedPrompt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A surface whose prompts never resolve.
    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub(crate) fn answer_prompt(self, answer: Option<usize>) -> Self {
        self.prompt_answers.lock().unwrap().push_back(answer);
        self
    }

    pub(crate) fn answer_pick(self, answer: Option<usize>) -> Self {
        self.pick_answers.lock().unwrap().push_back(answer);
        self
    }

    pub(crate) fn prompts(&self) -> Vec<PromptRequest> {
        self.prompts.lock().unwrap().clone()
    }

    pub(crate) fn picks(&self) -> Vec<(Vec<PickItem>, String)> {
        self.picks.lock().unwrap().clone()
    }
}

impl PromptSurface for ScriptedPrompt {
    async fn prompt(&self, request: PromptRequest) -> Option<usize> {
        self.prompts.lock().unwrap().push(request);
        if self.hang {
            return std::future::pending().await;
        }
        self.prompt_answers.lock().unwrap().pop_front().flatten()
    }

    async fn quick_pick(&self, items: Vec<PickItem>, placeholder: String) -> Option<usize> {
        self.picks.lock().unwrap().push((items, placeholder));
        if self.hang {
            return std::future::pending().await;
        }
        self.pick_answers.lock().unwrap().pop_front().flatten()
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingStatus {
    messages: Mutex<Vec<(String, Duration)>>,
}

impl RecordingStatus {
    pub(crate) fn messages(&self) -> Vec<(String, Duration)> {
        self.messages.lock().unwrap().clone()
    }
}

impl StatusSurface for RecordingStatus {
    fn show_transient(&self, message: &str, duration: Duration) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), duration));
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub(crate) fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Store whose writes are always rejected.
#[derive(Debug, Default)]
pub(crate) struct ReadOnlyStore;

impl ConfigurationStore for ReadOnlyStore {
    async fn default_formatter(&self, _scope: &SettingScope) -> ArbiterResult<Option<String>> {
        Ok(None)
    }

    async fn set_default_formatter(
        &self,
        _scope: &SettingScope,
        _extension_id: &str,
    ) -> ArbiterResult<()> {
        Err(ArbiterError::config_write("settings are read-only"))
    }
}

/// Store whose reads always fail.
#[derive(Debug, Default)]
pub(crate) struct UnreadableStore;

impl ConfigurationStore for UnreadableStore {
    async fn default_formatter(&self, _scope: &SettingScope) -> ArbiterResult<Option<String>> {
        Err(ArbiterError::internal("settings backend unavailable"))
    }

    async fn set_default_formatter(
        &self,
        _scope: &SettingScope,
        _extension_id: &str,
    ) -> ArbiterResult<()> {
        Err(ArbiterError::internal("settings backend unavailable"))
    }
}
