use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod effects;
pub mod item;
pub mod logging;
pub mod messages;
pub mod teleport;
pub mod worlds;

pub use effects::EffectsConfig;
pub use item::{ItemConfig, RemovalPolicy};
pub use logging::LoggingConfig;
pub use messages::MessagesConfig;
pub use teleport::TeleportConfig;
pub use worlds::WorldsConfig;

pub const CONFIG_FILE_NAME: &str = "waystone.toml";

#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WaystoneConfig {
    pub teleport: TeleportConfig,
    pub item: ItemConfig,
    pub effects: EffectsConfig,
    pub worlds: WorldsConfig,
    pub messages: MessagesConfig,
    pub logging: LoggingConfig,
}

impl WaystoneConfig {
    /// Loads the configuration from `path`. A missing file is created with
    /// the defaults; an unreadable or malformed file logs a warning and
    /// falls back to the defaults so a config typo never takes the
    /// subsystem down.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            config.write_to(path);
            return config;
        }

        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "Malformed config at {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!(
                    "Could not read config at {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn write_to(&self, path: &Path) {
        let serialized = match toml::to_string_pretty(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Could not serialize default config: {e}");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(path, serialized) {
            log::warn!("Could not write default config to {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = WaystoneConfig::default();
        assert_eq!(config.teleport.warmup(), Duration::from_secs(5));
        assert_eq!(config.teleport.cooldown(), Duration::from_secs(15));
        assert_eq!(
            config.item.remove_from_inventory,
            RemovalPolicy::OnSuccess
        );
        assert!(config.teleport.cancel_on_movement);
        assert!(!config.teleport.cancel_on_interaction);
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = WaystoneConfig::load(&path);
        assert!(path.exists());
        assert_eq!(config.teleport.warmup_seconds, 5);

        // A second load round-trips through the file that was just written.
        let reloaded = WaystoneConfig::load(&path);
        assert_eq!(reloaded.teleport.warmup_seconds, 5);
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[teleport]\nwarmup_seconds = 9\ncancel_on_interaction = true\n",
        )
        .unwrap();

        let config = WaystoneConfig::load(&path);
        assert_eq!(config.teleport.warmup_seconds, 9);
        assert!(config.teleport.cancel_on_interaction);
        assert_eq!(config.teleport.cooldown_seconds, 15);
        assert!(config.effects.sound_effects);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "this is not toml [").unwrap();

        let config = WaystoneConfig::load(&path);
        assert_eq!(config.teleport.warmup_seconds, 5);
    }

    #[test]
    fn removal_policy_parses_kebab_case() {
        let config: WaystoneConfig =
            toml::from_str("[item]\nremove_from_inventory = \"on-use\"\n").unwrap();
        assert_eq!(config.item.remove_from_inventory, RemovalPolicy::OnUse);
    }
}
