use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::normalize_default;
use crate::error::{ArbiterError, ArbiterResult};

/// Duration of transient status messages when not configured.
pub const DEFAULT_STATUS_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_formatter: Option<String>,
}

/// Contents of one `formatter-arbiter.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbiterSettings {
    /// Default formatter for every language without its own entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_formatter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub languages: HashMap<String, LanguageSettings>,
}

impl ArbiterSettings {
    /// Default formatter for a language: the language entry first, then the top-level key.
    pub fn default_formatter_for(&self, language_id: &str) -> Option<&str> {
        let language_specific = self
            .languages
            .get(language_id)
            .and_then(|lang| normalize_default(lang.default_formatter.as_deref()));

        language_specific.or_else(|| normalize_default(self.default_formatter.as_deref()))
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms.unwrap_or(DEFAULT_STATUS_TIMEOUT_MS))
    }
}

/// Merge two settings layers, preferring values from `primary` over `fallback`
///
/// Language entries merge field by field, so a primary `[languages.<id>]`
/// table without a usable `defaultFormatter` keeps the fallback's value.
pub fn merge_settings(
    fallback: Option<ArbiterSettings>,
    primary: Option<ArbiterSettings>,
) -> Option<ArbiterSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => {
            let mut languages = fallback.languages;
            for (key, value) in primary.languages {
                let merged = match languages.remove(&key) {
                    Some(lower) => merge_language(lower, value),
                    None => value,
                };
                languages.insert(key, merged);
            }
            Some(ArbiterSettings {
                default_formatter: prefer_set(
                    primary.default_formatter,
                    fallback.default_formatter,
                ),
                status_timeout_ms: primary.status_timeout_ms.or(fallback.status_timeout_ms),
                languages,
            })
        }
    }
}

/// Merge one language entry field by field; a blank value falls through.
fn merge_language(fallback: LanguageSettings, primary: LanguageSettings) -> LanguageSettings {
    LanguageSettings {
        default_formatter: prefer_set(primary.default_formatter, fallback.default_formatter),
    }
}

fn prefer_set(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|value| normalize_default(Some(value.as_str())).is_some())
        .or(fallback)
}

/// Load one settings file. A missing file is `Ok(None)`.
pub async fn load_settings_file(path: &Path) -> ArbiterResult<Option<ArbiterSettings>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ArbiterError::config_read(path, err.to_string())),
    };

    toml::from_str::<ArbiterSettings>(&contents)
        .map(Some)
        .map_err(|err| ArbiterError::config_parse(path, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lang(default_formatter: &str) -> LanguageSettings {
        LanguageSettings {
            default_formatter: Some(default_formatter.to_string()),
        }
    }

    #[test]
    fn language_entry_beats_top_level_default() {
        let settings = ArbiterSettings {
            default_formatter: Some("ext.global".to_string()),
            languages: HashMap::from([("rust".to_string(), lang("ext.rust"))]),
            ..Default::default()
        };

        assert_eq!(settings.default_formatter_for("rust"), Some("ext.rust"));
        assert_eq!(settings.default_formatter_for("python"), Some("ext.global"));
    }

    #[test]
    fn empty_language_entry_falls_through_to_top_level() {
        let settings = ArbiterSettings {
            default_formatter: Some("ext.global".to_string()),
            languages: HashMap::from([("rust".to_string(), lang(""))]),
            ..Default::default()
        };

        assert_eq!(settings.default_formatter_for("rust"), Some("ext.global"));
    }

    #[test]
    fn merge_prefers_primary_per_language() {
        let fallback = ArbiterSettings {
            default_formatter: Some("ext.user".to_string()),
            status_timeout_ms: Some(1000),
            languages: HashMap::from([
                ("rust".to_string(), lang("ext.user-rust")),
                ("go".to_string(), lang("ext.user-go")),
            ]),
        };
        let primary = ArbiterSettings {
            default_formatter: None,
            status_timeout_ms: None,
            languages: HashMap::from([("rust".to_string(), lang("ext.project-rust"))]),
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();

        assert_eq!(merged.default_formatter_for("rust"), Some("ext.project-rust"));
        assert_eq!(merged.default_formatter_for("go"), Some("ext.user-go"));
        assert_eq!(merged.default_formatter_for("c"), Some("ext.user"));
        assert_eq!(merged.status_timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn merge_keeps_fallback_default_when_primary_language_entry_is_empty() {
        let fallback = ArbiterSettings {
            languages: HashMap::from([("rust".to_string(), lang("ext.user"))]),
            ..Default::default()
        };
        let primary = ArbiterSettings {
            languages: HashMap::from([
                ("rust".to_string(), LanguageSettings::default()),
                ("go".to_string(), lang("  ")),
            ]),
            ..Default::default()
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();

        assert_eq!(merged.default_formatter_for("rust"), Some("ext.user"));
        assert_eq!(merged.default_formatter_for("go"), None);
    }

    #[test]
    fn merge_ignores_blank_primary_top_level_default() {
        let fallback = ArbiterSettings {
            default_formatter: Some("ext.user".to_string()),
            ..Default::default()
        };
        let primary = ArbiterSettings {
            default_formatter: Some(String::new()),
            ..Default::default()
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();
        assert_eq!(merged.default_formatter_for("rust"), Some("ext.user"));
    }

    #[test]
    fn fallback_language_entry_beats_primary_top_level_default() {
        let fallback = ArbiterSettings {
            languages: HashMap::from([("rust".to_string(), lang("ext.user-rust"))]),
            ..Default::default()
        };
        let primary = ArbiterSettings {
            default_formatter: Some("ext.project".to_string()),
            ..Default::default()
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();

        assert_eq!(merged.default_formatter_for("rust"), Some("ext.user-rust"));
        assert_eq!(merged.default_formatter_for("go"), Some("ext.project"));
    }

    #[test]
    fn merge_with_none() {
        assert!(merge_settings(None, None).is_none());
    }

    #[test]
    fn status_timeout_defaults() {
        assert_eq!(
            ArbiterSettings::default().status_timeout(),
            Duration::from_millis(DEFAULT_STATUS_TIMEOUT_MS)
        );
    }

    #[tokio::test]
    async fn load_settings_file_reads_camel_case_toml() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("formatter-arbiter.toml");
        std::fs::write(
            &path,
            r#"
                defaultFormatter = "ext.global"
                statusTimeoutMs = 500

                [languages.rust]
                defaultFormatter = "ext.rust"
            "#,
        )
        .expect("failed to write settings");

        let settings = load_settings_file(&path).await.unwrap().unwrap();
        assert_eq!(settings.default_formatter_for("rust"), Some("ext.rust"));
        assert_eq!(settings.status_timeout_ms, Some(500));
    }

    #[tokio::test]
    async fn load_settings_file_missing_is_none() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let result = load_settings_file(&dir.path().join("absent.toml")).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn load_settings_file_reports_parse_errors() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("formatter-arbiter.toml");
        std::fs::write(&path, "defaultFormatter = [").expect("failed to write settings");

        let result = load_settings_file(&path).await;
        assert!(matches!(result, Err(ArbiterError::ConfigParse { .. })));
    }
}
