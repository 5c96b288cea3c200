use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Minimum delay before the same message is repeated to the same actor,
    /// in seconds. Keeps movement-cancel spam down to one line.
    pub repeat_cooldown_seconds: u64,
    pub spawn_display_name: String,
    pub home_display_name: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            repeat_cooldown_seconds: 2,
            spawn_display_name: "Spawn".to_string(),
            home_display_name: "Home".to_string(),
        }
    }
}

impl MessagesConfig {
    pub fn repeat_cooldown(&self) -> Duration {
        Duration::from_secs(self.repeat_cooldown_seconds)
    }
}
