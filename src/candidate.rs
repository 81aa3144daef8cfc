//! Per-request formatter candidates and the document they are offered for.

use url::Url;

/// Which kind of format request a provider can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Whole-document formatting
    Document,
    /// Formatting of a selected range
    Range,
}

impl FormatKind {
    /// Stable name used in telemetry.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Document => "document",
            FormatKind::Range => "range",
        }
    }
}

/// A registered capability that can format a given document or range.
///
/// Both identity fields are optional because providers may be registered
/// without an owning extension (built-in or anonymous providers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterCandidate {
    pub extension_id: Option<String>,
    pub display_name: Option<String>,
    pub kind: FormatKind,
}

impl FormatterCandidate {
    pub fn new(extension_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            extension_id: Some(extension_id.into()),
            display_name: Some(display_name.into()),
            kind: FormatKind::Document,
        }
    }

    /// A candidate known only by its extension identifier.
    pub fn from_id(extension_id: impl Into<String>) -> Self {
        Self {
            extension_id: Some(extension_id.into()),
            display_name: None,
            kind: FormatKind::Document,
        }
    }

    pub fn with_kind(mut self, kind: FormatKind) -> Self {
        self.kind = kind;
        self
    }

    /// True if this candidate is owned by the given extension.
    pub fn is_owned_by(&self, extension_id: &str) -> bool {
        self.extension_id.as_deref() == Some(extension_id)
    }
}

/// Non-empty, order-preserving list of candidates for one request.
///
/// Order encodes provider registration priority and is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList(Vec<FormatterCandidate>);

impl CandidateList {
    /// Returns `None` for an empty vector; resolution is never run without candidates.
    pub fn new(candidates: Vec<FormatterCandidate>) -> Option<Self> {
        if candidates.is_empty() {
            None
        } else {
            Some(Self(candidates))
        }
    }

    pub fn first(&self) -> &FormatterCandidate {
        // Non-empty by construction
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormatterCandidate> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FormatterCandidate> {
        self.0.get(index)
    }

    /// Kind of request these candidates were collected for.
    pub fn kind(&self) -> FormatKind {
        self.first().kind
    }

    /// First candidate owned by `extension_id`, in caller order.
    pub fn find_by_extension(&self, extension_id: &str) -> Option<&FormatterCandidate> {
        self.0.iter().find(|c| c.is_owned_by(extension_id))
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a FormatterCandidate;
    type IntoIter = std::slice::Iter<'a, FormatterCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The document a format request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub uri: Url,
    pub language_id: String,
    /// Human-readable language name, e.g. "Rust" or "Visual Basic".
    pub language_name: Option<String>,
}

impl Document {
    pub fn new(uri: Url, language_id: impl Into<String>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            language_name: None,
        }
    }

    pub fn with_language_name(mut self, name: impl Into<String>) -> Self {
        self.language_name = Some(name.into());
        self
    }

    /// Display name of the language, falling back to its identifier.
    pub fn language_display_name(&self) -> &str {
        self.language_name.as_deref().unwrap_or(&self.language_id)
    }
}
