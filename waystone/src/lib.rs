use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use waystone_config::{CONFIG_FILE_NAME, WaystoneConfig};
use waystone_util::permission::{PermissionManager, PermissionRegistry};

use crate::actor::{ActorGateway, InventoryProvider};
use crate::command::{CommandContext, CommandDispatcher};
use crate::item::BoundItemFactory;
use crate::listener::PlayerEventListener;
use crate::message::Messenger;
use crate::store::{DestinationStore, JsonFileStore, StoreError};
use crate::teleport::TeleportManager;
use crate::world::WorldProvider;

pub mod actor;
pub mod command;
pub mod item;
pub mod listener;
pub mod logging;
pub mod message;
pub mod permissions;
pub mod store;
pub mod teleport;
pub mod world;

#[cfg(test)]
mod test_support;

pub const DESTINATIONS_FILE_NAME: &str = "destinations.json";

/// The wired-up subsystem: one manager, one listener, one dispatcher,
/// sharing the registry and collaborators. The host hands events to
/// `listener`, command input to `dispatcher`, and calls `shutdown` on stop.
pub struct Waystone {
    pub manager: TeleportManager,
    pub listener: Arc<PlayerEventListener>,
    pub dispatcher: CommandDispatcher,
    pub factory: Arc<BoundItemFactory>,
    pub store: Arc<dyn DestinationStore>,
    pub permissions: Arc<PermissionManager>,
    config_path: PathBuf,
}

impl Waystone {
    /// Loads configuration and destinations from `data_dir` and assembles
    /// the subsystem around the host's providers.
    pub fn bootstrap(
        data_dir: &Path,
        worlds: Arc<dyn WorldProvider>,
        actors: Arc<dyn ActorGateway>,
        inventory: Arc<dyn InventoryProvider>,
        messenger: Arc<dyn Messenger>,
    ) -> Result<Self, StoreError> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let config = WaystoneConfig::load(&config_path);
        logging::init(&config.logging);

        let store: Arc<dyn DestinationStore> =
            Arc::new(JsonFileStore::open(data_dir.join(DESTINATIONS_FILE_NAME))?);

        let mut registry = PermissionRegistry::new();
        if let Err(e) = permissions::register_all(&mut registry) {
            log::warn!("Permission registration problem: {e}");
        }
        let permission_manager = Arc::new(PermissionManager::new(Arc::new(RwLock::new(registry))));

        let factory = Arc::new(BoundItemFactory::new(&config.item.material));
        let manager = TeleportManager::new(
            &config,
            store.clone(),
            worlds.clone(),
            actors.clone(),
            inventory.clone(),
            messenger.clone(),
            permission_manager.clone(),
        );
        let listener = Arc::new(PlayerEventListener::new(
            manager.clone(),
            factory.clone(),
            messenger.clone(),
        ));
        let dispatcher = CommandDispatcher::new(CommandContext {
            manager: manager.clone(),
            store: store.clone(),
            factory: factory.clone(),
            actors,
            inventory,
            messenger,
            permissions: permission_manager.clone(),
            config_path: config_path.clone(),
        });

        log::info!("Waystone subsystem ready (config: {})", config_path.display());

        Ok(Self {
            manager,
            listener,
            dispatcher,
            factory,
            store,
            permissions: permission_manager,
            config_path,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Cancels every in-flight warmup and drains the scheduled tasks.
    pub async fn shutdown(&self) {
        self.manager.shutdown().await;
        log::info!("Waystone subsystem stopped");
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;
    use uuid::Uuid;

    use super::*;
    use crate::command::CommandSender;
    use crate::test_support::{RecordingMessenger, TestActors, TestInventory, TestWorlds, location};
    use crate::world::WorldId;

    #[tokio::test(start_paused = true)]
    async fn bootstrap_wires_a_working_subsystem() {
        let dir = tempfile::tempdir().unwrap();
        let worlds = Arc::new(TestWorlds::new());
        let actors = Arc::new(TestActors::new());
        let inventory = Arc::new(TestInventory::new());
        let messenger = Arc::new(RecordingMessenger::new());

        let waystone = Waystone::bootstrap(
            dir.path(),
            worlds.clone(),
            actors.clone(),
            inventory.clone(),
            messenger.clone(),
        )
        .unwrap();

        let world = WorldId(Uuid::new_v4());
        let actor = Uuid::new_v4();
        worlds.set_spawn(world, location(world, 0.0, 64.0, 0.0));
        actors.place(actor, location(world, 10.0, 64.0, 10.0));
        waystone
            .permissions
            .set_op_level(actor, waystone_util::permission::OpLevel::Four)
            .await;

        let sender = CommandSender::Player(actor);
        waystone.dispatcher.dispatch(&sender, &["set", "Base"]).await;
        assert!(waystone.store.exists("base").await);
        // The default config file was materialized next to the store.
        assert!(waystone.config_path().exists());

        waystone
            .dispatcher
            .dispatch(&sender, &["teleport", "Base"])
            .await;
        assert!(waystone.manager.is_warming_up(&actor));

        sleep(Duration::from_secs(6)).await;
        assert_eq!(actors.teleports().len(), 1);

        waystone.shutdown().await;
    }
}
