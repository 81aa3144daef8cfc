//! Selection of the one formatter that handles a request.
//!
//! `ConflictResolver::select_formatter` walks a single state machine:
//!
//! 1. read the persisted default for the document's language and resource
//! 2. default names a candidate: use it, no UI
//! 3. default names no candidate: nothing formats, a transient status
//!    message says why, settings are left untouched
//! 4. no default and one candidate: use it
//! 5. no default and several candidates: ask the user to configure one
//!
//! Only step 5 depends on `ResolutionMode`. Interactive requests await the
//! prompt. Silent requests (format-on-save) return the first candidate at
//! once and leave the prompt running as a tracked background task whose
//! answer only affects later requests.

pub mod reconcile;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;

use crate::candidate::{CandidateList, Document, FormatterCandidate};
use crate::config::settings::DEFAULT_STATUS_TIMEOUT_MS;
use crate::config::{ConfigurationStore, SettingScope};
use crate::error::ArbiterResult;
use crate::picker::{CONFIGURE_ACTION, InteractivePicker, quote_language_name};
use crate::surface::{
    ExtensionQuery, PromptRequest, PromptSurface, Severity, StatusSurface, TelemetrySink,
};
use crate::telemetry::{SelectionOutcome, TelemetryReporter};

pub use reconcile::{Reconciliation, reconcile};

/// Whether a resolution may block on user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Never await the user for the returned value (e.g. format-on-save)
    Silent,
    /// May prompt and await the answer
    Interactive,
}

pub struct ConflictResolver<C, P, S, X, T> {
    config: Arc<C>,
    prompt: Arc<P>,
    status: Arc<S>,
    extensions: Arc<X>,
    picker: InteractivePicker<C, P>,
    telemetry: TelemetryReporter<T>,
    status_timeout: Duration,
    background: TaskTracker,
}

impl<C, P, S, X, T> std::fmt::Debug for ConflictResolver<C, P, S, X, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictResolver")
            .field("status_timeout", &self.status_timeout)
            .field("background_tasks", &self.background.len())
            .finish()
    }
}

impl<C, P, S, X, T> ConflictResolver<C, P, S, X, T>
where
    C: ConfigurationStore + 'static,
    P: PromptSurface + 'static,
    S: StatusSurface + 'static,
    X: ExtensionQuery + 'static,
    T: TelemetrySink + 'static,
{
    pub fn new(
        config: Arc<C>,
        prompt: Arc<P>,
        status: Arc<S>,
        extensions: Arc<X>,
        telemetry: Arc<T>,
    ) -> Self {
        Self {
            picker: InteractivePicker::new(Arc::clone(&config), Arc::clone(&prompt)),
            config,
            prompt,
            status,
            extensions,
            telemetry: TelemetryReporter::new(telemetry),
            status_timeout: Duration::from_millis(DEFAULT_STATUS_TIMEOUT_MS),
            background: TaskTracker::new(),
        }
    }

    /// Duration of the "configured formatter is missing" status message.
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn picker(&self) -> &InteractivePicker<C, P> {
        &self.picker
    }

    pub fn telemetry(&self) -> &TelemetryReporter<T> {
        &self.telemetry
    }

    /// Background prompts spawned by silent resolutions.
    ///
    /// Tasks are spawned with `tokio::spawn`, so a silent resolution that
    /// reaches the ambiguous state must run inside a tokio runtime.
    ///
    /// Hosts that shut down can `close()` and `wait()` on it to let pending
    /// prompts finish persisting.
    pub fn background_tasks(&self) -> &TaskTracker {
        &self.background
    }

    /// Decide which candidate formats `document`.
    ///
    /// `Ok(None)` means nothing formats: the user dismissed the prompt or the
    /// configured default is not among the candidates. Errors come only from
    /// persisting a choice made in an interactive prompt. Exactly one
    /// telemetry event is reported per call.
    ///
    /// # Panics
    ///
    /// In `ResolutionMode::Silent` with several candidates and no default,
    /// the prompt is spawned on the current tokio runtime. Polling outside a
    /// tokio runtime panics in that case.
    pub async fn select_formatter(
        &self,
        candidates: &CandidateList,
        document: &Document,
        mode: ResolutionMode,
    ) -> ArbiterResult<Option<FormatterCandidate>> {
        let result = self.resolve(candidates, document, mode).await;

        let outcome = match &result {
            Ok(outcome) => outcome.clone(),
            Err(_) => SelectionOutcome::interactive(None),
        };
        self.telemetry.report(candidates.kind(), candidates, &outcome);

        result.map(|outcome| outcome.candidate)
    }

    async fn resolve(
        &self,
        candidates: &CandidateList,
        document: &Document,
        mode: ResolutionMode,
    ) -> ArbiterResult<SelectionOutcome> {
        let scope = SettingScope::for_document(document);
        let configured = match self.config.default_formatter(&scope).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!(
                    target: "formatter_arbiter::resolver",
                    "Could not read default formatter for {}, treating as unset: {}",
                    document.language_id,
                    err
                );
                None
            }
        };

        match reconcile(configured.as_deref(), candidates) {
            Reconciliation::Configured(candidate) => {
                log::debug!(
                    target: "formatter_arbiter::resolver",
                    "Using configured default formatter {:?} for {}",
                    candidate.extension_id,
                    document.uri
                );
                Ok(SelectionOutcome::automatic(Some(candidate.clone())))
            }
            Reconciliation::Stale(extension_id) => {
                self.report_unavailable(extension_id, document).await;
                Ok(SelectionOutcome::automatic(None))
            }
            Reconciliation::Single(candidate) => {
                Ok(SelectionOutcome::automatic(Some(candidate.clone())))
            }
            Reconciliation::Ambiguous => self.resolve_ambiguous(candidates, document, mode).await,
        }
    }

    async fn resolve_ambiguous(
        &self,
        candidates: &CandidateList,
        document: &Document,
        mode: ResolutionMode,
    ) -> ArbiterResult<SelectionOutcome> {
        let request = configure_prompt(document, mode);

        match mode {
            ResolutionMode::Interactive => {
                let chosen =
                    ask_to_configure(&*self.prompt, &self.picker, request, candidates, document)
                        .await?;
                Ok(SelectionOutcome::interactive(chosen))
            }
            ResolutionMode::Silent => {
                let prompt = Arc::clone(&self.prompt);
                let picker = self.picker.clone();
                let owned_candidates = candidates.clone();
                let owned_document = document.clone();

                self.background.spawn(async move {
                    let result = ask_to_configure(
                        &*prompt,
                        &picker,
                        request,
                        &owned_candidates,
                        &owned_document,
                    )
                    .await;
                    if let Err(err) = result {
                        log::warn!(
                            target: "formatter_arbiter::resolver",
                            "Failed to persist default formatter for {}: {}",
                            owned_document.language_id,
                            err
                        );
                    }
                });

                log::debug!(
                    target: "formatter_arbiter::resolver",
                    "Several formatters for {} and no default; silently using the first",
                    document.uri
                );
                Ok(SelectionOutcome::automatic(Some(candidates.first().clone())))
            }
        }
    }

    async fn report_unavailable(&self, extension_id: &str, document: &Document) {
        let message = match self.extensions.find_extension(extension_id).await {
            Some(extension) => format!(
                "Extension '{}' is configured as formatter but it cannot format {}-files",
                extension.label(),
                quote_language_name(document.language_display_name())
            ),
            None => format!(
                "Extension '{}' is configured as formatter but not available. Select a different default formatter to continue.",
                extension_id
            ),
        };

        log::info!(target: "formatter_arbiter::resolver", "{}", message);
        self.status.show_transient(&message, self.status_timeout);
    }
}

/// Show the "configure a default" prompt; on "Configure..." run the picker.
async fn ask_to_configure<C, P>(
    prompt: &P,
    picker: &InteractivePicker<C, P>,
    request: PromptRequest,
    candidates: &CandidateList,
    document: &Document,
) -> ArbiterResult<Option<FormatterCandidate>>
where
    C: ConfigurationStore,
    P: PromptSurface,
{
    match prompt.prompt(request).await {
        Some(0) => picker.pick_and_persist(candidates, document).await,
        _ => Ok(None),
    }
}

fn configure_prompt(document: &Document, mode: ResolutionMode) -> PromptRequest {
    PromptRequest {
        severity: Severity::Info,
        message: format!(
            "There are multiple formatters for {} files. One of them should be configured as default formatter.",
            quote_language_name(document.language_display_name())
        ),
        actions: vec![CONFIGURE_ACTION.to_string()],
        silent: mode == ResolutionMode::Silent,
    }
}
