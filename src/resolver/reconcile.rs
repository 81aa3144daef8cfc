//! Pure reconciliation of the persisted default against the live candidates.
//!
//! The two inputs evolve independently (settings vs. extension registrations)
//! and are only brought together here, at request time.

use crate::candidate::{CandidateList, FormatterCandidate};
use crate::config::normalize_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation<'a> {
    /// The persisted default names one of the candidates
    Configured(&'a FormatterCandidate),
    /// The persisted default names no candidate
    Stale(&'a str),
    /// No default and nothing to choose between
    Single(&'a FormatterCandidate),
    /// No default and several candidates
    Ambiguous,
}

pub fn reconcile<'a>(
    configured: Option<&'a str>,
    candidates: &'a CandidateList,
) -> Reconciliation<'a> {
    match normalize_default(configured) {
        Some(extension_id) => match candidates.find_by_extension(extension_id) {
            Some(candidate) => Reconciliation::Configured(candidate),
            None => Reconciliation::Stale(extension_id),
        },
        None if candidates.len() == 1 => Reconciliation::Single(candidates.first()),
        None => Reconciliation::Ambiguous,
    }
}
