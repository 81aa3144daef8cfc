//! Catalog of extensions that register formatting capability.
//!
//! The catalog only feeds the configuration schema of the `defaultFormatter`
//! setting (allowed values and their descriptions). It is a best-known list:
//! resolution never consults it, and a persisted identifier missing from it
//! is not an error.
//!
//! # Thread Safety
//!
//! The catalog is shared process-wide. Every refresh builds a new
//! `CatalogSnapshot` and swaps it in with `ArcSwap`, so a reader holding a
//! snapshot always sees one complete extension list, never a partial update.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::{Value, json};

/// Name of the setting whose schema the catalog populates.
pub const DEFAULT_FORMATTER_KEY: &str = "defaultFormatter";

/// An extension known to contribute a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownExtension {
    pub extension_id: String,
    pub description: String,
}

impl KnownExtension {
    pub fn new(extension_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            extension_id: extension_id.into(),
            description: description.into(),
        }
    }
}

/// Immutable view of the known extensions at one point in time.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    version: u64,
    extensions: Vec<KnownExtension>,
}

impl CatalogSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn extensions(&self) -> &[KnownExtension] {
        &self.extensions
    }

    pub fn contains(&self, extension_id: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.extension_id == extension_id)
    }
}

pub struct ProviderCatalog {
    snapshot: ArcSwap<CatalogSnapshot>,
}

impl std::fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("version", &self.version())
            .finish()
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderCatalog {
    /// Create an empty catalog at version 0.
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// Replace the known extension list after the extension set changed.
    ///
    /// Entries keep their registration order; a repeated identifier keeps
    /// its first description. Returns the snapshot that was installed.
    pub fn refresh<I>(&self, extensions: I) -> Arc<CatalogSnapshot>
    where
        I: IntoIterator<Item = KnownExtension>,
    {
        let mut seen = HashSet::new();
        let extensions: Vec<KnownExtension> = extensions
            .into_iter()
            .filter(|ext| seen.insert(ext.extension_id.clone()))
            .collect();

        // rcu retries if another refresh raced us, so versions never repeat
        let mut installed = None;
        self.snapshot.rcu(|current| {
            let next = Arc::new(CatalogSnapshot {
                version: current.version + 1,
                extensions: extensions.clone(),
            });
            installed = Some(Arc::clone(&next));
            next
        });
        let installed = installed.unwrap_or_else(|| self.snapshot.load_full());

        log::debug!(
            target: "formatter_arbiter::catalog",
            "Catalog refreshed to version {} with {} formatter extension(s)",
            installed.version,
            installed.extensions.len()
        );
        installed
    }

    /// Current snapshot of `(extension_id, description)` pairs.
    pub fn list_known_extensions(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    pub fn is_known(&self, extension_id: &str) -> bool {
        self.snapshot.load().contains(extension_id)
    }

    pub fn version(&self) -> u64 {
        self.snapshot.load().version
    }

    /// JSON schema for the `defaultFormatter` setting, built from one snapshot.
    pub fn default_formatter_schema(&self) -> Value {
        let snapshot = self.snapshot.load_full();

        let mut allowed = vec![Value::Null];
        let mut descriptions = vec![Value::String("None".to_string())];
        for ext in snapshot.extensions() {
            allowed.push(Value::String(ext.extension_id.clone()));
            descriptions.push(Value::String(ext.description.clone()));
        }

        json!({
            "type": ["string", "null"],
            "default": null,
            "enum": allowed,
            "enumDescriptions": descriptions,
            "markdownDescription": "Defines a default formatter which takes precedence over all other formatter settings. Must be the identifier of an extension contributing a formatter.",
            "scope": "language-overridable",
        })
    }
}
