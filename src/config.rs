pub mod file_store;
pub mod settings;
pub mod store;
pub mod user;

pub use file_store::{FileConfigurationStore, PROJECT_CONFIG_FILE};
pub use settings::{ArbiterSettings, LanguageSettings, load_settings_file, merge_settings};
pub use store::{ConfigurationStore, MemoryConfigurationStore, SettingScope};
pub use user::user_config_path;

/// Normalize a persisted default: empty or whitespace-only values mean "no default".
pub fn normalize_default(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
