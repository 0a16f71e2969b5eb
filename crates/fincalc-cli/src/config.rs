use fincalc_core::settings::Settings;
use tracing::info;

use crate::input::file::{has_yaml_extension, read_text};

/// Load settings once at startup. No path means defaults.
pub fn load_settings(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let (canonical, contents) = read_text(path)?;

    let loaded = if has_yaml_extension(&canonical) {
        Settings::from_yaml_str(&contents)
    } else {
        Settings::from_json_str(&contents)
    }
    .map_err(|e| format!("Failed to parse settings '{}': {}", canonical.display(), e))?;

    if !loaded.migrated_keys.is_empty() {
        info!(
            path = %canonical.display(),
            keys = ?loaded.migrated_keys,
            "settings file uses legacy keys; rewrite it to silence this"
        );
    }

    Ok(loaded.settings)
}
