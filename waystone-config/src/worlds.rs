use serde::{Deserialize, Serialize};

/// World gating by name. An empty `enabled_worlds` list means every world is
/// enabled unless it appears in `disabled_worlds`; a non-empty list enables
/// only the worlds it names.
#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldsConfig {
    pub enabled_worlds: Vec<String>,
    pub disabled_worlds: Vec<String>,
}

impl WorldsConfig {
    pub fn is_enabled(&self, world_name: &str) -> bool {
        if self.disabled_worlds.iter().any(|w| w == world_name) {
            return false;
        }
        self.enabled_worlds.is_empty() || self.enabled_worlds.iter().any(|w| w == world_name)
    }
}
