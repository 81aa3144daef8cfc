//! User-facing formatter choice and persistence of the default.
//!
//! Two flows live here:
//! - `pick_and_persist`: the "Configure..." sub-flow. The user picks a
//!   formatter and it becomes the default for the document's language and
//!   resource.
//! - `choose_on_demand`: the "format with..." command. Picking a formatter
//!   formats once without touching the default; the trailing configure entry
//!   only updates the default.

use std::borrow::Cow;
use std::sync::Arc;

use crate::candidate::{CandidateList, Document, FormatterCandidate};
use crate::config::{ConfigurationStore, SettingScope};
use crate::error::ArbiterResult;
use crate::surface::{PickItem, PromptSurface};

/// Label of the prompt action that opens the persistence sub-flow.
pub const CONFIGURE_ACTION: &str = "Configure...";
/// Trailing entry of the on-demand chooser.
pub const CONFIGURE_DEFAULT_ITEM: &str = "Configure Default Formatter...";
/// Label for a candidate with neither display name nor extension id.
pub const UNNAMED_FORMATTER_LABEL: &str = "Unknown formatter";
/// Description marking the configured default in the on-demand chooser.
pub const DEFAULT_MARKER: &str = "(default)";

/// Wrap a language name in single quotes when it contains whitespace.
///
/// "Visual Basic" becomes "'Visual Basic'"; "Rust" is left alone.
pub fn quote_language_name(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_whitespace) {
        Cow::Owned(format!("'{}'", name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Display name, then extension id, then a fixed placeholder.
pub fn candidate_label(candidate: &FormatterCandidate) -> &str {
    candidate
        .display_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            candidate
                .extension_id
                .as_deref()
                .filter(|id| !id.is_empty())
        })
        .unwrap_or(UNNAMED_FORMATTER_LABEL)
}

/// Result of the on-demand chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnDemandChoice {
    /// Format once with this candidate; the default is unchanged
    Format(FormatterCandidate),
    /// The configure entry ran; no formatting for this request
    Configured(Option<FormatterCandidate>),
    Cancelled,
}

#[derive(Debug)]
pub struct InteractivePicker<C, P> {
    config: Arc<C>,
    prompt: Arc<P>,
}

impl<C, P> Clone for InteractivePicker<C, P> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            prompt: Arc::clone(&self.prompt),
        }
    }
}

impl<C: ConfigurationStore, P: PromptSurface> InteractivePicker<C, P> {
    pub fn new(config: Arc<C>, prompt: Arc<P>) -> Self {
        Self { config, prompt }
    }

    /// Let the user pick a default formatter and persist it.
    ///
    /// Returns `Ok(None)` without writing when the user cancels or picks a
    /// candidate that has no extension identifier. Write failures propagate.
    pub async fn pick_and_persist(
        &self,
        candidates: &CandidateList,
        document: &Document,
    ) -> ArbiterResult<Option<FormatterCandidate>> {
        let items = candidates
            .iter()
            .map(|candidate| PickItem::new(candidate_label(candidate)))
            .collect();
        let placeholder = format!(
            "Select a default formatter for {} files",
            quote_language_name(document.language_display_name())
        );

        let Some(index) = self.prompt.quick_pick(items, placeholder).await else {
            log::debug!(target: "formatter_arbiter::picker", "Default formatter pick dismissed");
            return Ok(None);
        };
        let Some(chosen) = candidates.get(index) else {
            log::warn!(
                target: "formatter_arbiter::picker",
                "Quick pick returned out-of-range index {}",
                index
            );
            return Ok(None);
        };
        let Some(extension_id) = chosen.extension_id.as_deref().filter(|id| !id.is_empty())
        else {
            log::debug!(
                target: "formatter_arbiter::picker",
                "Picked formatter '{}' has no extension id; not persisting",
                candidate_label(chosen)
            );
            return Ok(None);
        };

        self.config
            .set_default_formatter(&SettingScope::for_document(document), extension_id)
            .await?;
        Ok(Some(chosen.clone()))
    }

    /// The "format with..." chooser.
    pub async fn choose_on_demand(
        &self,
        candidates: &CandidateList,
        document: &Document,
    ) -> ArbiterResult<OnDemandChoice> {
        let configured = match self
            .config
            .default_formatter(&SettingScope::for_document(document))
            .await
        {
            Ok(value) => value,
            Err(err) => {
                log::warn!(
                    target: "formatter_arbiter::picker",
                    "Could not read default formatter for {}: {}",
                    document.language_id,
                    err
                );
                None
            }
        };

        let mut items: Vec<PickItem> = candidates
            .iter()
            .map(|candidate| {
                let item = PickItem::new(candidate_label(candidate));
                match (&configured, candidate.extension_id.as_deref()) {
                    (Some(default), Some(id)) if default == id => {
                        item.with_description(DEFAULT_MARKER)
                    }
                    _ => item,
                }
            })
            .collect();
        items.push(PickItem::new(CONFIGURE_DEFAULT_ITEM));

        let Some(index) = self
            .prompt
            .quick_pick(items, "Select a formatter".to_string())
            .await
        else {
            return Ok(OnDemandChoice::Cancelled);
        };

        if index == candidates.len() {
            let configured = self.pick_and_persist(candidates, document).await?;
            return Ok(OnDemandChoice::Configured(configured));
        }

        Ok(candidates
            .get(index)
            .cloned()
            .map(OnDemandChoice::Format)
            .unwrap_or(OnDemandChoice::Cancelled))
    }
}
