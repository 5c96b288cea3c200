use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waystone_util::math::Vector3;

/// Opaque world identifier. The host assigns these; the subsystem only
/// compares and stores them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A full position: world, coordinates and view orientation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub position: Vector3<f64>,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: WorldId, position: Vector3<f64>, yaw: f32, pitch: f32) -> Self {
        Self {
            world,
            position,
            yaw,
            pitch,
        }
    }
}

/// Host-side world state the subsystem consumes.
#[async_trait]
pub trait WorldProvider: Send + Sync {
    /// Whether teleports are allowed in the given world.
    async fn is_enabled(&self, world: WorldId) -> bool;

    /// The world's current spawn point. Queried again at fire time so a
    /// spawn moved mid-warmup is honored.
    async fn spawn_location(&self, world: WorldId) -> Option<Location>;

    async fn name_of(&self, world: WorldId) -> Option<String>;
}
