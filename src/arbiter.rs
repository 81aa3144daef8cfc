//! Entry points for format requests.
//!
//! `FormatterArbiter` ties the candidate source to the resolver: it collects
//! the ordered candidates for a request, skips resolution when there are
//! none, and otherwise hands over to `ConflictResolver` or, for the
//! "format with..." command, to the on-demand chooser.

use std::sync::Arc;

use crate::candidate::{CandidateList, Document, FormatKind, FormatterCandidate};
use crate::config::ConfigurationStore;
use crate::error::ArbiterResult;
use crate::picker::OnDemandChoice;
use crate::resolver::{ConflictResolver, ResolutionMode};
use crate::surface::{ExtensionQuery, PromptSurface, StatusSurface, TelemetrySink};
use crate::telemetry::SelectionOutcome;

/// Supplies the providers able to format a document, in priority order.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self, document: &Document, kind: FormatKind) -> Vec<FormatterCandidate>;
}

/// Fixed provider list, filtered by request kind.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    providers: Vec<FormatterCandidate>,
}

impl StaticCandidateSource {
    pub fn new(providers: Vec<FormatterCandidate>) -> Self {
        Self { providers }
    }
}

impl CandidateSource for StaticCandidateSource {
    fn candidates(&self, _document: &Document, kind: FormatKind) -> Vec<FormatterCandidate> {
        self.providers
            .iter()
            .filter(|provider| provider.kind == kind)
            .cloned()
            .collect()
    }
}

pub struct FormatterArbiter<R, C, P, S, X, T> {
    source: Arc<R>,
    resolver: ConflictResolver<C, P, S, X, T>,
}

impl<R, C, P, S, X, T> FormatterArbiter<R, C, P, S, X, T>
where
    R: CandidateSource,
    C: ConfigurationStore + 'static,
    P: PromptSurface + 'static,
    S: StatusSurface + 'static,
    X: ExtensionQuery + 'static,
    T: TelemetrySink + 'static,
{
    pub fn new(source: Arc<R>, resolver: ConflictResolver<C, P, S, X, T>) -> Self {
        Self { source, resolver }
    }

    pub fn resolver(&self) -> &ConflictResolver<C, P, S, X, T> {
        &self.resolver
    }

    /// Formatter for a whole-document request.
    pub async fn document_formatter(
        &self,
        document: &Document,
        mode: ResolutionMode,
    ) -> ArbiterResult<Option<FormatterCandidate>> {
        self.formatter_for(document, FormatKind::Document, mode)
            .await
    }

    /// Formatter for a range request.
    pub async fn range_formatter(
        &self,
        document: &Document,
        mode: ResolutionMode,
    ) -> ArbiterResult<Option<FormatterCandidate>> {
        self.formatter_for(document, FormatKind::Range, mode).await
    }

    async fn formatter_for(
        &self,
        document: &Document,
        kind: FormatKind,
        mode: ResolutionMode,
    ) -> ArbiterResult<Option<FormatterCandidate>> {
        let Some(candidates) = self.collect(document, kind) else {
            return Ok(None);
        };
        self.resolver
            .select_formatter(&candidates, document, mode)
            .await
    }

    /// The "format with..." command.
    ///
    /// Returns `Ok(None)` when no provider can serve the request.
    pub async fn format_with(
        &self,
        document: &Document,
        kind: FormatKind,
    ) -> ArbiterResult<Option<OnDemandChoice>> {
        let Some(candidates) = self.collect(document, kind) else {
            return Ok(None);
        };

        let result = self
            .resolver
            .picker()
            .choose_on_demand(&candidates, document)
            .await;

        let formatted_with = match &result {
            Ok(OnDemandChoice::Format(candidate)) => Some(candidate.clone()),
            _ => None,
        };
        self.resolver.telemetry().report(
            kind,
            &candidates,
            &SelectionOutcome::interactive(formatted_with),
        );

        result.map(Some)
    }

    fn collect(&self, document: &Document, kind: FormatKind) -> Option<CandidateList> {
        let candidates = CandidateList::new(self.source.candidates(document, kind));
        if candidates.is_none() {
            log::debug!(
                target: "formatter_arbiter::resolver",
                "No {} formatter registered for {}",
                kind.as_str(),
                document.uri
            );
        }
        candidates
    }
}
