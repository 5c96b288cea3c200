use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio_util::task::TaskTracker;
use uuid::Uuid;
use waystone_config::{RemovalPolicy, WaystoneConfig};
use waystone_util::permission::PermissionManager;

use crate::actor::{ActorGateway, InventoryProvider};
use crate::item::ItemStack;
use crate::message::{Macro, MessageCooldowns, MessageId, Messenger, SoundId};
use crate::permissions;
use crate::store::{Destination, DestinationKind, DestinationStore, destination_key};
use crate::world::WorldProvider;

pub mod outcome;
pub mod registry;

pub use outcome::{DenyReason, TeleportOutcome};
pub use registry::{TeleportRegistry, WarmupSession};

/// Delay before the first warmup-effect pulse, so it does not land on the
/// same tick as the initiating click.
const EFFECT_START_DELAY: Duration = Duration::from_millis(100);
const EFFECT_PERIOD: Duration = Duration::from_millis(500);

/// Configuration-derived values the state machine reads per operation.
/// Snapshotted from [`WaystoneConfig`] and swapped wholesale on reload.
#[derive(Clone)]
pub struct TeleportSettings {
    pub warmup: Duration,
    pub cooldown: Duration,
    pub interaction_grace: Duration,
    pub cancel_on_movement: bool,
    pub cancel_on_damage: bool,
    pub cancel_on_interaction: bool,
    pub removal_policy: RemovalPolicy,
    pub shift_click: bool,
    pub left_click: bool,
    pub allow_in_recipes: bool,
    pub particles: bool,
    pub lightning: bool,
    pub message_repeat_cooldown: Duration,
    pub spawn_display_name: String,
    pub home_display_name: String,
    pub default_destination: String,
}

impl From<&WaystoneConfig> for TeleportSettings {
    fn from(config: &WaystoneConfig) -> Self {
        Self {
            warmup: config.teleport.warmup(),
            cooldown: config.teleport.cooldown(),
            interaction_grace: config.teleport.interaction_grace(),
            cancel_on_movement: config.teleport.cancel_on_movement,
            cancel_on_damage: config.teleport.cancel_on_damage,
            cancel_on_interaction: config.teleport.cancel_on_interaction,
            removal_policy: config.item.remove_from_inventory,
            shift_click: config.item.shift_click,
            left_click: config.item.left_click,
            allow_in_recipes: config.item.allow_in_recipes,
            particles: config.effects.particle_effects,
            lightning: config.effects.lightning,
            message_repeat_cooldown: config.messages.repeat_cooldown(),
            spawn_display_name: config.messages.spawn_display_name.clone(),
            home_display_name: config.messages.home_display_name.clone(),
            default_destination: config.item.default_destination.clone(),
        }
    }
}

/// Owns the warmup/cooldown registry and drives the whole teleport
/// lifecycle: validation, scheduling, firing, cancellation, cleanup.
/// Cheap to clone; the scheduled tasks each carry a clone back into
/// [`fire`](Self::fire).
#[derive(Clone)]
pub struct TeleportManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    registry: TeleportRegistry,
    settings: RwLock<TeleportSettings>,
    store: Arc<dyn DestinationStore>,
    worlds: Arc<dyn WorldProvider>,
    actors: Arc<dyn ActorGateway>,
    inventory: Arc<dyn InventoryProvider>,
    messenger: Arc<dyn Messenger>,
    permissions: Arc<PermissionManager>,
    message_cooldowns: MessageCooldowns,
    tasks: TaskTracker,
}

impl TeleportManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &WaystoneConfig,
        store: Arc<dyn DestinationStore>,
        worlds: Arc<dyn WorldProvider>,
        actors: Arc<dyn ActorGateway>,
        inventory: Arc<dyn InventoryProvider>,
        messenger: Arc<dyn Messenger>,
        permissions: Arc<PermissionManager>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                registry: TeleportRegistry::new(),
                settings: RwLock::new(TeleportSettings::from(config)),
                store,
                worlds,
                actors,
                inventory,
                messenger,
                permissions,
                message_cooldowns: MessageCooldowns::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn settings(&self) -> TeleportSettings {
        self.inner
            .settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Entry point for both the teleport command and bound-item use.
    /// Preconditions are checked in a fixed order, each one short-circuiting
    /// with its own outcome and no state change.
    pub async fn initiate(
        &self,
        actor: Uuid,
        destination_name: Option<&str>,
        trigger_item: Option<ItemStack>,
    ) -> TeleportOutcome {
        let settings = self.settings();
        let inner = &self.inner;

        let Some(origin) = inner.actors.position(actor).await else {
            return TeleportOutcome::Denied(DenyReason::ActorGone);
        };

        if !inner.worlds.is_enabled(origin.world).await {
            inner
                .messenger
                .send_message(actor, MessageId::TeleportFailWorldDisabled, &[])
                .await;
            inner
                .messenger
                .play_sound(actor, SoundId::TeleportDenied)
                .await;
            return TeleportOutcome::Denied(DenyReason::WorldDisabled);
        }

        if !inner
            .permissions
            .has_permission(&actor, permissions::USE)
            .await
        {
            inner
                .messenger
                .send_message(actor, MessageId::PermissionDeniedUse, &[])
                .await;
            inner
                .messenger
                .play_sound(actor, SoundId::TeleportDenied)
                .await;
            return TeleportOutcome::Denied(DenyReason::MissingPermission);
        }

        if trigger_item.is_some() && settings.shift_click && !inner.actors.is_sneaking(actor).await
        {
            inner
                .messenger
                .send_message(actor, MessageId::TeleportFailShiftClick, &[])
                .await;
            return TeleportOutcome::Denied(DenyReason::SneakRequired);
        }

        let destination = match self
            .resolve_destination(actor, destination_name, &settings)
            .await
        {
            Ok(destination) => destination,
            Err(outcome) => return outcome,
        };

        let remaining = inner.registry.cooldown_remaining(&actor);
        if !remaining.is_zero() {
            inner
                .messenger
                .send_message(
                    actor,
                    MessageId::TeleportCooldown,
                    &[
                        (Macro::Destination, destination.display_name.clone()),
                        (Macro::Duration, remaining.as_secs().to_string()),
                    ],
                )
                .await;
            inner
                .messenger
                .play_sound(actor, SoundId::TeleportDenied)
                .await;
            return TeleportOutcome::Denied(DenyReason::OnCooldown(remaining));
        }

        if settings.removal_policy == RemovalPolicy::OnUse {
            if let Some(item) = &trigger_item {
                if !inner.inventory.remove_one_matching(actor, item).await {
                    inner
                        .messenger
                        .send_message(actor, MessageId::TeleportCancelledNoItem, &[])
                        .await;
                    inner
                        .messenger
                        .play_sound(actor, SoundId::TeleportCancelled)
                        .await;
                    return TeleportOutcome::MissingItem;
                }
            }
        }

        if settings.warmup.is_zero() {
            return self
                .execute(actor, &destination, trigger_item.as_ref(), &settings)
                .await;
        }

        self.schedule(actor, destination.clone(), trigger_item, &settings);

        let warmup_message = match destination.kind {
            DestinationKind::Stored => MessageId::TeleportWarmup,
            DestinationKind::Spawn => MessageId::TeleportWarmupSpawn,
            DestinationKind::Home => MessageId::TeleportWarmupHome,
        };
        if inner
            .message_cooldowns
            .try_begin(actor, warmup_message, settings.message_repeat_cooldown)
        {
            inner
                .messenger
                .send_message(
                    actor,
                    warmup_message,
                    &[
                        (Macro::Destination, destination.display_name.clone()),
                        (Macro::Duration, settings.warmup.as_secs().to_string()),
                    ],
                )
                .await;
            inner
                .messenger
                .play_sound(actor, SoundId::TeleportWarmup)
                .await;
        }

        TeleportOutcome::WarmupStarted {
            destination_key: destination.key,
        }
    }

    /// Registers the session and schedules both tasks. The registry holds
    /// its lock across the spawns, so the delayed task cannot observe the
    /// map before its own session is inserted, and any previous session is
    /// cancelled first (never two live warmups for one actor).
    fn schedule(
        &self,
        actor: Uuid,
        destination: Destination,
        trigger_item: Option<ItemStack>,
        settings: &TeleportSettings,
    ) {
        let warmup = settings.warmup;
        let particles = settings.particles;
        self.inner.registry.register_with(actor, |session_id| {
            let task = {
                let manager = self.clone();
                self.inner.tasks.spawn(async move {
                    tokio::time::sleep(warmup).await;
                    manager.fire(actor, session_id).await;
                })
            };
            let effect_task = particles.then(|| {
                let manager = self.clone();
                self.inner.tasks.spawn(async move {
                    let start = tokio::time::Instant::now() + EFFECT_START_DELAY;
                    let mut pulse = tokio::time::interval_at(start, EFFECT_PERIOD);
                    loop {
                        pulse.tick().await;
                        manager.inner.messenger.warmup_effects(actor).await;
                    }
                })
            });
            WarmupSession::new(destination, trigger_item, session_id, task, effect_task)
        });
    }

    /// The delayed task body. The `take_if_current` liveness check is what
    /// makes the cancel/fire race benign: a firing whose session was removed
    /// or superseded after dispatch is a silent no-op.
    async fn fire(&self, actor: Uuid, session_id: u64) {
        let Some(session) = self.inner.registry.take_if_current(actor, session_id) else {
            return;
        };
        session.abort_effect();

        let settings = self.settings();
        let (destination, trigger_item) = session.into_parts();
        self.execute(actor, &destination, trigger_item.as_ref(), &settings)
            .await;
    }

    /// The teleport itself, shared by the zero-warmup path and the fired
    /// task. The caller has already removed any warmup session.
    async fn execute(
        &self,
        actor: Uuid,
        destination: &Destination,
        trigger_item: Option<&ItemStack>,
        settings: &TeleportSettings,
    ) -> TeleportOutcome {
        let Some(target) = destination
            .resolve_location(actor, self.inner.worlds.as_ref(), self.inner.actors.as_ref())
            .await
        else {
            let id = match destination.kind {
                DestinationKind::Home => MessageId::TeleportFailNoBedSpawn,
                _ => MessageId::TeleportFailInvalidDestination,
            };
            self.inner.messenger
                .send_message(
                    actor,
                    id,
                    &[(Macro::Destination, destination.display_name.clone())],
                )
                .await;
            self.inner.messenger
                .play_sound(actor, SoundId::TeleportCancelled)
                .await;
            return TeleportOutcome::Denied(DenyReason::UnknownDestination(
                destination.display_name.clone(),
            ));
        };

        if settings.removal_policy == RemovalPolicy::OnSuccess {
            if let Some(item) = trigger_item {
                if !self.inner.inventory.remove_one_matching(actor, item).await {
                    self.inner.messenger
                        .send_message(actor, MessageId::TeleportCancelledNoItem, &[])
                        .await;
                    self.inner.messenger
                        .play_sound(actor, SoundId::TeleportCancelled)
                        .await;
                    // Cooldown still applies: discarding the item mid-warmup
                    // must not grant free retries.
                    self.inner.registry.set_cooldown(actor, settings.cooldown);
                    return TeleportOutcome::MissingItem;
                }
            }
        }

        self.inner.messenger
            .play_sound(actor, SoundId::TeleportSuccessDeparture)
            .await;

        if !self.inner.actors.teleport(actor, &target).await {
            return TeleportOutcome::Denied(DenyReason::ActorGone);
        }

        match destination.kind {
            DestinationKind::Spawn => {
                let world_name = self
                    .inner
                    .worlds
                    .name_of(target.world)
                    .await
                    .unwrap_or_default();
                self.inner.messenger
                    .send_message(
                        actor,
                        MessageId::TeleportSuccessSpawn,
                        &[
                            (Macro::Destination, destination.display_name.clone()),
                            (Macro::World, world_name),
                        ],
                    )
                    .await;
            }
            _ => {
                self.inner.messenger
                    .send_message(
                        actor,
                        MessageId::TeleportSuccess,
                        &[(Macro::Destination, destination.display_name.clone())],
                    )
                    .await;
            }
        }

        self.inner.messenger
            .play_sound_at(&target, SoundId::TeleportSuccessArrival)
            .await;
        if settings.lightning {
            self.inner.messenger.strike_lightning(&target).await;
        }

        self.inner.registry.set_cooldown(actor, settings.cooldown);
        TeleportOutcome::Teleported {
            destination_key: destination.key.clone(),
        }
    }

    /// Maps a requested name to a destination. No name defaults to spawn;
    /// the spawn/home names are virtual whatever the store holds; anything
    /// else is a store lookup by normalized key.
    async fn resolve_destination(
        &self,
        actor: Uuid,
        name: Option<&str>,
        settings: &TeleportSettings,
    ) -> Result<Destination, TeleportOutcome> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let requested = match name {
            None => VirtualName::Spawn,
            Some(n) => {
                let key = destination_key(n);
                if key == "spawn" || key == destination_key(&settings.spawn_display_name) {
                    VirtualName::Spawn
                } else if key == "home" || key == destination_key(&settings.home_display_name) {
                    VirtualName::Home
                } else {
                    VirtualName::Stored(n)
                }
            }
        };

        match requested {
            VirtualName::Spawn => {
                if let Some(origin) = self.inner.actors.position(actor).await {
                    if let Some(spawn) = self.inner.worlds.spawn_location(origin.world).await {
                        return Ok(Destination::spawn(&settings.spawn_display_name, spawn));
                    }
                }
                Err(self
                    .deny_unknown_destination(actor, &settings.spawn_display_name)
                    .await)
            }
            VirtualName::Home => match self.inner.actors.bed_spawn(actor).await {
                Some(home) => Ok(Destination::home(&settings.home_display_name, home)),
                None => {
                    self.inner.messenger
                        .send_message(actor, MessageId::TeleportFailNoBedSpawn, &[])
                        .await;
                    self.inner.messenger
                        .play_sound(actor, SoundId::TeleportDenied)
                        .await;
                    Err(TeleportOutcome::Denied(DenyReason::UnknownDestination(
                        settings.home_display_name.clone(),
                    )))
                }
            },
            VirtualName::Stored(n) => match self.inner.store.get(n).await {
                Some(destination) => Ok(destination),
                None => Err(self.deny_unknown_destination(actor, n).await),
            },
        }
    }

    async fn deny_unknown_destination(&self, actor: Uuid, name: &str) -> TeleportOutcome {
        self.inner.messenger
            .send_message(
                actor,
                MessageId::TeleportFailInvalidDestination,
                &[(Macro::Destination, name.to_string())],
            )
            .await;
        self.inner.messenger
            .play_sound(actor, SoundId::TeleportDenied)
            .await;
        TeleportOutcome::Denied(DenyReason::UnknownDestination(name.to_string()))
    }

    /// Cancels any live warmup. Returns whether one was present; `false`
    /// means the caller must not send a cancellation message.
    pub fn cancel(&self, actor: &Uuid) -> bool {
        self.inner.registry.cancel(actor)
    }

    pub fn is_warming_up(&self, actor: &Uuid) -> bool {
        self.inner.registry.is_warming_up(actor)
    }

    /// Whether the actor's warmup is past the interaction grace window.
    pub fn past_interaction_grace(&self, actor: &Uuid) -> bool {
        let grace = self.settings().interaction_grace;
        self.inner.registry.warming_longer_than(actor, grace)
    }

    /// Remaining cooldown; zero when the actor may teleport.
    pub fn time_remaining(&self, actor: &Uuid) -> Duration {
        self.inner.registry.cooldown_remaining(actor)
    }

    /// Terminal cleanup for disconnect and death. Unconditional: ignores
    /// every cancel-policy flag and clears the message bookkeeping too.
    pub fn remove_actor(&self, actor: &Uuid) {
        self.inner.registry.cancel(actor);
        self.inner.message_cooldowns.remove_actor(actor);
    }

    /// Swaps in freshly loaded configuration and drops all in-memory state:
    /// every in-flight warmup is cancelled and every cooldown forgotten.
    pub fn reload(&self, config: &WaystoneConfig) {
        *self.inner.settings.write().unwrap_or_else(|e| e.into_inner()) =
            TeleportSettings::from(config);
        self.inner.registry.clear();
        self.inner.message_cooldowns.clear();
    }

    /// Cancels everything and waits for the scheduled tasks to wind down.
    pub async fn shutdown(&self) {
        self.inner.registry.clear();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
    }

    #[cfg(test)]
    pub(crate) fn warmup_count(&self) -> usize {
        self.inner.registry.warmup_count()
    }
}

enum VirtualName<'a> {
    Spawn,
    Home,
    Stored(&'a str),
}
