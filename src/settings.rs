//! Game settings and preferences
//!
//! Persisted separately from high scores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence;
use crate::sim::Keymap;

/// Rejected `name=value` assignments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownName(String),
    #[error("invalid value `{value}` for `{name}` (expected on/off)")]
    InvalidValue { name: String, value: String },
    #[error("expected name=value, got `{0}`")]
    Malformed(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Accept A/D in addition to the arrow keys
    pub alternate_keys: bool,

    // === HUD ===
    /// Show the "use arrow keys" hint under the score
    pub show_hint: bool,
    /// Announce game over with a blocking alert instead of an inline banner
    pub blocking_alert: bool,

    // === Accessibility ===
    /// Reduced motion (no easing on the car)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alternate_keys: false,
            show_hint: true,
            blocking_alert: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "road_dodge_settings";

    /// Key bindings derived from these settings
    pub fn keymap(&self) -> Keymap {
        Keymap {
            alternate_keys: self.alternate_keys,
        }
    }

    /// Hint text shown under the score
    pub fn hint_text(&self) -> &'static str {
        if self.alternate_keys {
            "Use left and right arrow keys (or A/D) to move the car"
        } else {
            "Use left and right arrow keys to move the car"
        }
    }

    /// Apply a `name=value` assignment such as `alternate_keys=on`
    pub fn assign(&mut self, assignment: &str) -> Result<(), SettingsError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| SettingsError::Malformed(assignment.to_string()))?;
        let (name, value) = (name.trim(), value.trim());

        let flag = match value.to_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => true,
            "off" | "false" | "0" | "no" => false,
            _ => {
                return Err(SettingsError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        };

        let slot = match name {
            "alternate_keys" => &mut self.alternate_keys,
            "show_hint" => &mut self.show_hint,
            "blocking_alert" => &mut self.blocking_alert,
            "reduced_motion" => &mut self.reduced_motion,
            _ => return Err(SettingsError::UnknownName(name.to_string())),
        };
        *slot = flag;
        Ok(())
    }

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        match persistence::load_json::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings (failures are logged, not fatal)
    pub fn save(&self) {
        match persistence::save_json(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "alternate_keys": true }"#).unwrap();
        assert!(settings.alternate_keys);
        assert!(settings.show_hint);
        assert!(settings.blocking_alert);
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_keymap_follows_settings() {
        let mut settings = Settings::default();
        assert_eq!(settings.keymap().steer_for("a"), None);
        settings.alternate_keys = true;
        assert!(settings.keymap().steer_for("a").is_some());
        assert!(settings.hint_text().contains("A/D"));
    }

    #[test]
    fn test_assign_flags() {
        let mut settings = Settings::default();
        settings.assign("alternate_keys=on").unwrap();
        settings.assign(" blocking_alert = off ").unwrap();
        settings.assign("reduced_motion=TRUE").unwrap();
        assert!(settings.alternate_keys);
        assert!(!settings.blocking_alert);
        assert!(settings.reduced_motion);
        assert!(settings.show_hint);
    }

    #[test]
    fn test_assign_rejects_bad_input() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.assign("turbo=on"),
            Err(SettingsError::UnknownName("turbo".into()))
        );
        assert!(matches!(
            settings.assign("show_hint=maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert_eq!(
            settings.assign("show_hint"),
            Err(SettingsError::Malformed("show_hint".into()))
        );
        assert_eq!(settings, Settings::default());
    }
}
