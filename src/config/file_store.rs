//! TOML-backed configuration store.
//!
//! Settings are layered `user < project`: the project file is the
//! `formatter-arbiter.toml` of the longest workspace root containing the
//! resource. Writes land in `[languages.<id>]` of that project file, or of
//! the user file when no root owns the resource.
//!
//! Layers merge key by key, and blank values fall through to the user file.
//! After merging, a `[languages.<id>]` default from either file beats a
//! top-level `defaultFormatter` from either file.

use std::path::{Path, PathBuf};

use url::Url;

use super::settings::{ArbiterSettings, load_settings_file, merge_settings};
use super::store::{ConfigurationStore, SettingScope};
use crate::catalog::DEFAULT_FORMATTER_KEY;
use crate::error::{ArbiterError, ArbiterResult};

/// File name of the per-project settings file.
pub const PROJECT_CONFIG_FILE: &str = "formatter-arbiter.toml";

#[derive(Debug, Clone, Default)]
pub struct FileConfigurationStore {
    user_path: Option<PathBuf>,
    roots: Vec<PathBuf>,
}

impl FileConfigurationStore {
    pub fn new(user_path: Option<PathBuf>, roots: Vec<PathBuf>) -> Self {
        Self { user_path, roots }
    }

    /// Store using the standard user config location.
    pub fn with_user_config(roots: Vec<PathBuf>) -> Self {
        Self::new(super::user_config_path(), roots)
    }

    fn owning_root(&self, resource: Option<&Url>) -> Option<&Path> {
        let path = resource?.to_file_path().ok()?;
        self.roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .map(PathBuf::as_path)
    }

    /// Project settings file owning the resource, if any.
    pub fn project_path_for(&self, resource: Option<&Url>) -> Option<PathBuf> {
        self.owning_root(resource)
            .map(|root| root.join(PROJECT_CONFIG_FILE))
    }

    /// File that a write for `scope` goes to.
    pub fn write_path_for(&self, scope: &SettingScope) -> Option<PathBuf> {
        self.project_path_for(scope.resource.as_ref())
            .or_else(|| self.user_path.clone())
    }

    /// Effective settings for a resource after merging user and project layers.
    pub async fn load_effective(&self, resource: Option<&Url>) -> ArbiterResult<ArbiterSettings> {
        let user = match &self.user_path {
            Some(path) => load_settings_file(path).await?,
            None => None,
        };
        let project = match self.project_path_for(resource) {
            Some(path) => load_settings_file(&path).await?,
            None => None,
        };

        Ok(merge_settings(user, project).unwrap_or_default())
    }
}

impl ConfigurationStore for FileConfigurationStore {
    async fn default_formatter(&self, scope: &SettingScope) -> ArbiterResult<Option<String>> {
        let settings = self.load_effective(scope.resource.as_ref()).await?;
        Ok(settings
            .default_formatter_for(&scope.language_id)
            .map(str::to_string))
    }

    async fn set_default_formatter(
        &self,
        scope: &SettingScope,
        extension_id: &str,
    ) -> ArbiterResult<()> {
        let Some(path) = self.write_path_for(scope) else {
            return Err(ArbiterError::config_write(
                "no user or project settings file is available",
            ));
        };

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(ArbiterError::config_read(&path, err.to_string())),
        };

        // Edit the raw table so keys this crate does not know survive the rewrite
        let mut table = toml::from_str::<toml::Table>(&contents)
            .map_err(|err| ArbiterError::config_parse(&path, err.to_string()))?;
        set_language_default(&mut table, &scope.language_id, extension_id).map_err(|message| {
            ArbiterError::config_write(format!("{}: {}", path.display(), message))
        })?;

        let serialized = toml::to_string(&table)
            .map_err(|err| ArbiterError::config_write(err.to_string()))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, serialized).await?;

        log::info!(
            target: "formatter_arbiter::config",
            "Set default formatter for {} to {} in {}",
            scope.language_id,
            extension_id,
            path.display()
        );
        Ok(())
    }
}

fn set_language_default(
    table: &mut toml::Table,
    language_id: &str,
    extension_id: &str,
) -> Result<(), String> {
    let languages = table
        .entry("languages")
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| "`languages` is not a table".to_string())?;

    let language = languages
        .entry(language_id)
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| format!("`languages.{}` is not a table", language_id))?;

    language.insert(
        DEFAULT_FORMATTER_KEY.to_string(),
        toml::Value::String(extension_id.to_string()),
    );
    Ok(())
}
