//! User configuration location for formatter-arbiter.
//!
//! User config location: $XDG_CONFIG_HOME/formatter-arbiter/formatter-arbiter.toml
//! Fallback: the platform config directory (e.g. ~/.config on Linux)

use std::path::PathBuf;

const APP_DIR: &str = "formatter-arbiter";
const FILE_NAME: &str = "formatter-arbiter.toml";

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/formatter-arbiter/formatter-arbiter.toml
/// 2. Otherwise: `dirs::config_dir()`/formatter-arbiter/formatter-arbiter.toml
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Some(PathBuf::from(xdg_config).join(APP_DIR).join(FILE_NAME));
    }

    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
}
