use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub sound_effects: bool,
    /// Looping particle effect at the actor's position during warmup.
    pub particle_effects: bool,
    /// Lightning strike effect at the destination on arrival.
    pub lightning: bool,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            sound_effects: true,
            particle_effects: true,
            lightning: false,
        }
    }
}
