use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Delay between initiating a teleport and executing it, in seconds.
    /// Zero teleports immediately with no warmup session.
    pub warmup_seconds: u64,
    /// Delay after a completed teleport before a new one may start, in seconds.
    pub cooldown_seconds: u64,
    /// Window after initiation during which block interactions do not cancel
    /// the warmup. Absorbs the duplicate interaction events fired by the very
    /// click that started the teleport.
    pub interaction_grace_millis: u64,
    pub cancel_on_movement: bool,
    pub cancel_on_damage: bool,
    pub cancel_on_interaction: bool,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            warmup_seconds: 5,
            cooldown_seconds: 15,
            interaction_grace_millis: 100,
            cancel_on_movement: true,
            cancel_on_damage: true,
            cancel_on_interaction: false,
        }
    }
}

impl TeleportConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_seconds)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    pub fn interaction_grace(&self) -> Duration {
        Duration::from_millis(self.interaction_grace_millis)
    }
}
