//! Persistence seam for the default-formatter setting.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use url::Url;

use super::normalize_default;
use crate::candidate::Document;
use crate::error::ArbiterResult;

/// Where a default formatter setting applies: a language, optionally narrowed to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingScope {
    pub language_id: String,
    pub resource: Option<Url>,
}

impl SettingScope {
    pub fn new(language_id: impl Into<String>, resource: Option<Url>) -> Self {
        Self {
            language_id: language_id.into(),
            resource,
        }
    }

    /// Scope of a format request: the document's language and its resource.
    pub fn for_document(document: &Document) -> Self {
        Self::new(document.language_id.clone(), Some(document.uri.clone()))
    }
}

/// Reads and writes the persisted default formatter.
///
/// Implementations decide how the resource narrows the lookup; an absent or
/// empty value means "no default".
pub trait ConfigurationStore: Send + Sync {
    fn default_formatter(
        &self,
        scope: &SettingScope,
    ) -> impl Future<Output = ArbiterResult<Option<String>>> + Send;

    /// Persist `extension_id` as the default for `scope`.
    fn set_default_formatter(
        &self,
        scope: &SettingScope,
        extension_id: &str,
    ) -> impl Future<Output = ArbiterResult<()>> + Send;
}

/// In-memory store keyed by `(language, resource)`.
///
/// Lookups fall back from the resource-specific entry to the language-wide one.
#[derive(Debug, Default)]
pub struct MemoryConfigurationStore {
    values: DashMap<(String, Option<String>), String>,
    writes: AtomicUsize,
}

impl MemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    pub fn with_default(self, scope: &SettingScope, extension_id: impl Into<String>) -> Self {
        self.values.insert(Self::key(scope), extension_id.into());
        self
    }

    /// Number of `set_default_formatter` calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn key(scope: &SettingScope) -> (String, Option<String>) {
        (
            scope.language_id.clone(),
            scope.resource.as_ref().map(|uri| uri.to_string()),
        )
    }

    fn lookup(&self, key: &(String, Option<String>)) -> Option<String> {
        self.values
            .get(key)
            .and_then(|value| normalize_default(Some(value.as_str())).map(str::to_string))
    }
}

impl ConfigurationStore for MemoryConfigurationStore {
    async fn default_formatter(&self, scope: &SettingScope) -> ArbiterResult<Option<String>> {
        let key = Self::key(scope);
        if key.1.is_some()
            && let Some(value) = self.lookup(&key)
        {
            return Ok(Some(value));
        }
        Ok(self.lookup(&(key.0, None)))
    }

    async fn set_default_formatter(
        &self,
        scope: &SettingScope,
        extension_id: &str,
    ) -> ArbiterResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values
            .insert(Self::key(scope), extension_id.to_string());
        Ok(())
    }
}
