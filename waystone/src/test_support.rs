//! Mock collaborators shared by the crate's test modules.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use waystone_util::math::Vector3;
use waystone_util::permission::{PermissionManager, PermissionRegistry};

use crate::actor::{ActorGateway, InventoryProvider};
use crate::item::ItemStack;
use crate::message::{MacroValues, MessageId, Messenger, SoundId};
use crate::permissions;
use crate::store::{Destination, DestinationStore, StoreError, destination_key};
use crate::world::{Location, WorldId, WorldProvider};

pub fn location(world: WorldId, x: f64, y: f64, z: f64) -> Location {
    Location::new(world, Vector3::new(x, y, z), 0.0, 0.0)
}

#[derive(Default)]
pub struct TestWorlds {
    disabled: Mutex<HashSet<WorldId>>,
    spawns: Mutex<HashMap<WorldId, Location>>,
    names: Mutex<HashMap<WorldId, String>>,
}

impl TestWorlds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&self, world: WorldId, enabled: bool) {
        let mut disabled = self.disabled.lock().unwrap();
        if enabled {
            disabled.remove(&world);
        } else {
            disabled.insert(world);
        }
    }

    pub fn set_spawn(&self, world: WorldId, spawn: Location) {
        self.spawns.lock().unwrap().insert(world, spawn);
    }

    pub fn set_name(&self, world: WorldId, name: &str) {
        self.names.lock().unwrap().insert(world, name.to_string());
    }
}

#[async_trait]
impl WorldProvider for TestWorlds {
    async fn is_enabled(&self, world: WorldId) -> bool {
        !self.disabled.lock().unwrap().contains(&world)
    }

    async fn spawn_location(&self, world: WorldId) -> Option<Location> {
        self.spawns.lock().unwrap().get(&world).copied()
    }

    async fn name_of(&self, world: WorldId) -> Option<String> {
        self.names.lock().unwrap().get(&world).cloned()
    }
}

#[derive(Default)]
pub struct TestActors {
    positions: Mutex<HashMap<Uuid, Location>>,
    sneaking: Mutex<HashSet<Uuid>>,
    beds: Mutex<HashMap<Uuid, Location>>,
    names: Mutex<HashMap<Uuid, String>>,
    teleports: Mutex<Vec<(Uuid, Location)>>,
}

impl TestActors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&self, actor: Uuid, at: Location) {
        self.positions.lock().unwrap().insert(actor, at);
    }

    pub fn remove(&self, actor: &Uuid) {
        self.positions.lock().unwrap().remove(actor);
    }

    pub fn set_sneaking(&self, actor: Uuid, sneaking: bool) {
        let mut set = self.sneaking.lock().unwrap();
        if sneaking {
            set.insert(actor);
        } else {
            set.remove(&actor);
        }
    }

    pub fn set_bed_spawn(&self, actor: Uuid, at: Location) {
        self.beds.lock().unwrap().insert(actor, at);
    }

    pub fn set_name(&self, actor: Uuid, name: &str) {
        self.names.lock().unwrap().insert(actor, name.to_string());
    }

    pub fn teleports(&self) -> Vec<(Uuid, Location)> {
        self.teleports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActorGateway for TestActors {
    async fn position(&self, actor: Uuid) -> Option<Location> {
        self.positions.lock().unwrap().get(&actor).copied()
    }

    async fn is_sneaking(&self, actor: Uuid) -> bool {
        self.sneaking.lock().unwrap().contains(&actor)
    }

    async fn bed_spawn(&self, actor: Uuid) -> Option<Location> {
        self.beds.lock().unwrap().get(&actor).copied()
    }

    async fn teleport(&self, actor: Uuid, target: &Location) -> bool {
        let mut positions = self.positions.lock().unwrap();
        if !positions.contains_key(&actor) {
            return false;
        }
        positions.insert(actor, *target);
        self.teleports.lock().unwrap().push((actor, *target));
        true
    }

    async fn name_of(&self, actor: Uuid) -> Option<String> {
        self.names.lock().unwrap().get(&actor).cloned()
    }

    async fn find_by_name(&self, name: &str) -> Option<Uuid> {
        self.names
            .lock()
            .unwrap()
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }
}

#[derive(Default)]
pub struct TestInventory {
    contents: Mutex<HashMap<Uuid, Vec<ItemStack>>>,
    refuse_give: Mutex<HashSet<Uuid>>,
}

impl TestInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, actor: Uuid, stack: ItemStack) {
        self.contents.lock().unwrap().entry(actor).or_default().push(stack);
    }

    pub fn clear(&self, actor: &Uuid) {
        self.contents.lock().unwrap().remove(actor);
    }

    pub fn count_matching(&self, actor: &Uuid, matcher: &ItemStack) -> u32 {
        self.contents
            .lock()
            .unwrap()
            .get(actor)
            .map(|stacks| {
                stacks
                    .iter()
                    .filter(|s| s.is_similar(matcher))
                    .map(|s| s.count)
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn refuse_give(&self, actor: Uuid) {
        self.refuse_give.lock().unwrap().insert(actor);
    }
}

#[async_trait]
impl InventoryProvider for TestInventory {
    async fn held_item(&self, actor: Uuid) -> Option<ItemStack> {
        self.contents
            .lock()
            .unwrap()
            .get(&actor)
            .and_then(|stacks| stacks.first().cloned())
    }

    async fn remove_one_matching(&self, actor: Uuid, matcher: &ItemStack) -> bool {
        let mut contents = self.contents.lock().unwrap();
        let Some(stacks) = contents.get_mut(&actor) else {
            return false;
        };
        for (index, stack) in stacks.iter_mut().enumerate() {
            if stack.is_similar(matcher) {
                if stack.count > 1 {
                    stack.count -= 1;
                } else {
                    stacks.remove(index);
                }
                return true;
            }
        }
        false
    }

    async fn give(&self, actor: Uuid, stack: ItemStack) -> u32 {
        if self.refuse_give.lock().unwrap().contains(&actor) {
            return stack.count;
        }
        self.contents.lock().unwrap().entry(actor).or_default().push(stack);
        0
    }

    async fn set_held_item(&self, actor: Uuid, stack: ItemStack) -> bool {
        let mut contents = self.contents.lock().unwrap();
        let Some(stacks) = contents.get_mut(&actor) else {
            return false;
        };
        if stacks.is_empty() {
            return false;
        }
        stacks[0] = stack;
        true
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    messages: Mutex<Vec<(Uuid, MessageId)>>,
    raw_lines: Mutex<Vec<(Uuid, String)>>,
    sounds: Mutex<Vec<SoundId>>,
    effect_pulses: AtomicUsize,
    lightning: Mutex<Vec<Location>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Uuid, MessageId)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn has_message(&self, actor: Uuid, id: MessageId) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(a, m)| *a == actor && *m == id)
    }

    pub fn count_message(&self, actor: Uuid, id: MessageId) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, m)| *a == actor && *m == id)
            .count()
    }

    pub fn raw_lines(&self) -> Vec<(Uuid, String)> {
        self.raw_lines.lock().unwrap().clone()
    }

    pub fn sounds(&self) -> Vec<SoundId> {
        self.sounds.lock().unwrap().clone()
    }

    pub fn effect_pulses(&self) -> usize {
        self.effect_pulses.load(Ordering::Relaxed)
    }

    pub fn lightning_strikes(&self) -> Vec<Location> {
        self.lightning.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, actor: Uuid, id: MessageId, _macros: MacroValues<'_>) {
        self.messages.lock().unwrap().push((actor, id));
    }

    async fn send_raw(&self, actor: Uuid, line: &str) {
        self.raw_lines.lock().unwrap().push((actor, line.to_string()));
    }

    async fn play_sound(&self, _actor: Uuid, sound: SoundId) {
        self.sounds.lock().unwrap().push(sound);
    }

    async fn play_sound_at(&self, _location: &Location, sound: SoundId) {
        self.sounds.lock().unwrap().push(sound);
    }

    async fn warmup_effects(&self, _actor: Uuid) {
        self.effect_pulses.fetch_add(1, Ordering::Relaxed);
    }

    async fn strike_lightning(&self, location: &Location) {
        self.lightning.lock().unwrap().push(*location);
    }
}

/// Plain in-memory destination store for tests that do not care about the
/// file backing.
#[derive(Default)]
pub struct TestStore {
    records: RwLock<BTreeMap<String, Destination>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DestinationStore for TestStore {
    async fn exists(&self, name: &str) -> bool {
        self.records
            .read()
            .await
            .contains_key(&destination_key(name))
    }

    async fn get(&self, name: &str) -> Option<Destination> {
        self.records.read().await.get(&destination_key(name)).cloned()
    }

    async fn put(&self, destination: Destination) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(destination.key.clone(), destination);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<Option<Destination>, StoreError> {
        Ok(self.records.write().await.remove(&destination_key(name)))
    }

    async fn list_keys(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }

    async fn reload(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub async fn permission_manager() -> Arc<PermissionManager> {
    let mut registry = PermissionRegistry::new();
    permissions::register_all(&mut registry).unwrap();
    Arc::new(PermissionManager::new(Arc::new(tokio::sync::RwLock::new(
        registry,
    ))))
}
