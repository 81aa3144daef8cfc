//! Collaborator seams owned by the host editor.
//!
//! The arbiter never renders UI or ships telemetry itself. It talks to these
//! traits, which the host implements over its notification, quick-pick,
//! status bar and telemetry services.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::telemetry::TelemetryEvent;

/// Severity of a prompt shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A notification with actions. Dismissing it chooses nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub severity: Severity,
    pub message: String,
    pub actions: Vec<String>,
    /// Show without stealing focus (non-interactive triggers such as format-on-save)
    pub silent: bool,
}

/// One row of a quick selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Prompt and quick-selection surface.
///
/// Both methods resolve to the index of the chosen action/item, or `None`
/// when the user dismissed without choosing.
pub trait PromptSurface: Send + Sync {
    fn prompt(&self, request: PromptRequest) -> impl Future<Output = Option<usize>> + Send;

    fn quick_pick(
        &self,
        items: Vec<PickItem>,
        placeholder: String,
    ) -> impl Future<Output = Option<usize>> + Send;
}

/// Transient, auto-dismissing status notices.
pub trait StatusSurface: Send + Sync {
    fn show_transient(&self, message: &str, duration: Duration);
}

/// What the host knows about an installed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescription {
    pub extension_id: String,
    pub display_name: Option<String>,
}

impl ExtensionDescription {
    /// Display name, falling back to the identifier.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.extension_id)
    }
}

/// Lookup of installed (enabled) extensions, whether or not they format.
pub trait ExtensionQuery: Send + Sync {
    fn find_extension(
        &self,
        extension_id: &str,
    ) -> impl Future<Output = Option<ExtensionDescription>> + Send;
}

/// Fixed set of installed extensions.
#[derive(Debug, Clone, Default)]
pub struct InstalledExtensions {
    entries: HashMap<String, ExtensionDescription>,
}

impl InstalledExtensions {
    pub fn new<I>(extensions: I) -> Self
    where
        I: IntoIterator<Item = ExtensionDescription>,
    {
        Self {
            entries: extensions
                .into_iter()
                .map(|ext| (ext.extension_id.clone(), ext))
                .collect(),
        }
    }

    pub fn with(mut self, extension_id: &str, display_name: Option<&str>) -> Self {
        self.entries.insert(
            extension_id.to_string(),
            ExtensionDescription {
                extension_id: extension_id.to_string(),
                display_name: display_name.map(str::to_string),
            },
        );
        self
    }
}

impl ExtensionQuery for InstalledExtensions {
    async fn find_extension(&self, extension_id: &str) -> Option<ExtensionDescription> {
        self.entries.get(extension_id).cloned()
    }
}

/// Receives structured telemetry events. Must not block.
pub trait TelemetrySink: Send + Sync {
    fn publish(&self, event: TelemetryEvent);
}

/// Status surface that writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSurface;

impl StatusSurface for LogStatusSurface {
    fn show_transient(&self, message: &str, duration: Duration) {
        log::info!(
            target: "formatter_arbiter::status",
            "{} (for {}ms)",
            message,
            duration.as_millis()
        );
    }
}

/// Telemetry sink that writes each event as one JSON log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetrySink;

impl TelemetrySink for LogTelemetrySink {
    fn publish(&self, event: TelemetryEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::info!(target: "formatter_arbiter::telemetry", "{}", json),
            Err(err) => log::warn!(
                target: "formatter_arbiter::telemetry",
                "Dropped telemetry event {}: {}",
                event.name,
                err
            ),
        }
    }
}
