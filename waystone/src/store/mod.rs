use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use waystone_util::math::Vector3;
use waystone_util::text::strip_color;

use crate::actor::ActorGateway;
use crate::world::{Location, WorldId, WorldProvider};

pub mod json;

pub use json::JsonFileStore;

/// Derives the storage key for a display name: formatting codes stripped,
/// surrounding whitespace dropped, spaces folded to underscores, case
/// folded. "&aTest Destination" and "test_destination" share one key.
pub fn destination_key(display_name: &str) -> String {
    strip_color(display_name)
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationKind {
    /// Fixed coordinates captured when the destination was set.
    Stored,
    /// The world spawn point, recomputed at teleport time.
    Spawn,
    /// The actor's personal home point, recomputed at teleport time.
    Home,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub key: String,
    pub display_name: String,
    pub kind: DestinationKind,
    pub world: WorldId,
    pub position: Vector3<f64>,
    pub yaw: f32,
    pub pitch: f32,
}

impl Destination {
    pub fn new(display_name: &str, kind: DestinationKind, location: Location) -> Self {
        Self {
            key: destination_key(display_name),
            display_name: display_name.to_string(),
            kind,
            world: location.world,
            position: location.position,
            yaw: location.yaw,
            pitch: location.pitch,
        }
    }

    pub fn stored(display_name: &str, location: Location) -> Self {
        Self::new(display_name, DestinationKind::Stored, location)
    }

    pub fn spawn(display_name: &str, location: Location) -> Self {
        Self::new(display_name, DestinationKind::Spawn, location)
    }

    pub fn home(display_name: &str, location: Location) -> Self {
        Self::new(display_name, DestinationKind::Home, location)
    }

    /// The captured location. For virtual kinds this is a snapshot from
    /// initiation time; `resolve_location` is what a teleport must use.
    pub fn location(&self) -> Location {
        Location::new(self.world, self.position, self.yaw, self.pitch)
    }

    /// The live target location, dispatched on kind. Virtual destinations
    /// are recomputed from current world/actor state so changes made
    /// mid-warmup are honored.
    pub async fn resolve_location(
        &self,
        actor: Uuid,
        worlds: &dyn WorldProvider,
        actors: &dyn ActorGateway,
    ) -> Option<Location> {
        match self.kind {
            DestinationKind::Stored => Some(self.location()),
            DestinationKind::Spawn => worlds.spawn_location(self.world).await,
            DestinationKind::Home => actors.bed_spawn(actor).await,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("destination store i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("destination store serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Keyed destination persistence. Lookups take any spelling of the name;
/// implementations normalize through [`destination_key`].
#[async_trait]
pub trait DestinationStore: Send + Sync {
    async fn exists(&self, name: &str) -> bool;

    async fn get(&self, name: &str) -> Option<Destination>;

    /// Inserts or overwrites; two names with the same key collide and the
    /// last write wins.
    async fn put(&self, destination: Destination) -> Result<(), StoreError>;

    /// Removes by name, returning the record that was present.
    async fn delete(&self, name: &str) -> Result<Option<Destination>, StoreError>;

    /// Every stored key, sorted.
    async fn list_keys(&self) -> Vec<String>;

    /// Drops the in-memory view and re-reads the backing file.
    async fn reload(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{TestActors, TestWorlds, location};

    #[test]
    fn key_strips_color_and_folds_case() {
        assert_eq!(destination_key("&aTest Destination"), "test_destination");
        assert_eq!(destination_key("Test_Destination"), "test_destination");
    }

    #[test]
    fn key_is_pure_function_of_display_name() {
        assert_eq!(destination_key("Home"), destination_key("home"));
        assert_eq!(destination_key("  Home "), "home");
    }

    #[test]
    fn display_name_keeps_its_formatting() {
        let world = WorldId(Uuid::new_v4());
        let destination =
            Destination::stored("&aTest Destination", location(world, 100.0, 100.0, 100.0));
        assert_eq!(destination.display_name, "&aTest Destination");
        assert_eq!(destination.key, "test_destination");
    }

    #[tokio::test]
    async fn stored_destination_resolves_its_captured_location() {
        let worlds = TestWorlds::new();
        let actors = TestActors::new();
        let world = WorldId(Uuid::new_v4());
        let actor = Uuid::new_v4();

        let destination = Destination::stored("Base", location(world, 100.0, 100.0, 100.0));
        let resolved = destination
            .resolve_location(actor, &worlds, &actors)
            .await
            .unwrap();
        assert_eq!(resolved.position, Vector3::new(100.0, 100.0, 100.0));
    }

    #[tokio::test]
    async fn spawn_destination_resolves_the_live_world_spawn() {
        let worlds = TestWorlds::new();
        let actors = TestActors::new();
        let world = WorldId(Uuid::new_v4());
        let actor = Uuid::new_v4();

        // Captured at one point, moved afterwards: resolution follows the
        // world, not the snapshot.
        let destination = Destination::spawn("Spawn", location(world, 0.0, 64.0, 0.0));
        worlds.set_spawn(world, location(world, 8.0, 70.0, -8.0));

        let resolved = destination
            .resolve_location(actor, &worlds, &actors)
            .await
            .unwrap();
        assert_eq!(resolved.position, Vector3::new(8.0, 70.0, -8.0));
    }

    #[tokio::test]
    async fn home_destination_resolves_the_actor_bed_spawn() {
        let worlds = TestWorlds::new();
        let actors = Arc::new(TestActors::new());
        let world = WorldId(Uuid::new_v4());
        let actor = Uuid::new_v4();

        let destination = Destination::home("Home", location(world, 0.0, 64.0, 0.0));
        assert!(
            destination
                .resolve_location(actor, &worlds, actors.as_ref())
                .await
                .is_none()
        );

        actors.set_bed_spawn(actor, location(world, 3.0, 65.0, 3.0));
        let resolved = destination
            .resolve_location(actor, &worlds, actors.as_ref())
            .await
            .unwrap();
        assert_eq!(resolved.position, Vector3::new(3.0, 65.0, 3.0));
    }
}
