use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::item::ItemStack;
use crate::store::Destination;

/// A live in-flight delayed teleport for one actor. Owns both scheduled-task
/// handles; whoever removes the session from the registry is responsible for
/// releasing them.
pub struct WarmupSession {
    destination: Destination,
    trigger_item: Option<ItemStack>,
    session_id: u64,
    started_at: Instant,
    task: JoinHandle<()>,
    effect_task: Option<JoinHandle<()>>,
}

impl WarmupSession {
    pub fn new(
        destination: Destination,
        trigger_item: Option<ItemStack>,
        session_id: u64,
        task: JoinHandle<()>,
        effect_task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            destination,
            trigger_item,
            session_id,
            started_at: Instant::now(),
            task,
            effect_task,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Stops both scheduled tasks. Used on every removal path except the
    /// task's own firing, which must not abort itself.
    fn cancel_tasks(&self) {
        self.task.abort();
        self.abort_effect();
    }

    /// Stops only the ancillary effect loop. Idempotent.
    pub fn abort_effect(&self) {
        if let Some(effect) = &self.effect_task {
            effect.abort();
        }
    }

    pub fn into_parts(self) -> (Destination, Option<ItemStack>) {
        (self.destination, self.trigger_item)
    }
}

/// In-memory warmup and cooldown state, keyed per actor. The defining
/// invariant: at most one live [`WarmupSession`] per actor, and removal is
/// atomic with respect to the scheduled task's firing. Both maps are guarded
/// by plain mutexes; no lock is ever held across an await point.
#[derive(Default)]
pub struct TeleportRegistry {
    warmups: Mutex<HashMap<Uuid, WarmupSession>>,
    cooldowns: Mutex<HashMap<Uuid, Instant>>,
    session_counter: AtomicU64,
}

impl TeleportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session built by `build`, which receives the fresh
    /// session id and runs while the map lock is held. That lock hold is
    /// what makes registration atomic: a task spawned inside `build` cannot
    /// observe the registry until the session is inserted, and any previous
    /// session is cancelled before the new one exists. Returns whether a
    /// previous session was replaced.
    pub fn register_with<F>(&self, actor: Uuid, build: F) -> bool
    where
        F: FnOnce(u64) -> WarmupSession,
    {
        let mut warmups = self.lock_warmups();
        let replaced = warmups.remove(&actor);
        if let Some(old) = &replaced {
            old.cancel_tasks();
        }
        let session_id = self.session_counter.fetch_add(1, Ordering::Relaxed);
        warmups.insert(actor, build(session_id));
        replaced.is_some()
    }

    /// The firing task's liveness check: removes and returns the actor's
    /// session only if it is still the one the task was scheduled for.
    /// `None` means the session was cancelled or superseded after this
    /// firing was already dispatched, and the caller must do nothing.
    pub fn take_if_current(&self, actor: Uuid, session_id: u64) -> Option<WarmupSession> {
        let mut warmups = self.lock_warmups();
        if warmups
            .get(&actor)
            .is_some_and(|s| s.session_id == session_id)
        {
            warmups.remove(&actor)
        } else {
            None
        }
    }

    /// Cancels any live session: stops both tasks, removes the entry, and
    /// reports whether one was present. `false` is a no-op and the caller
    /// should stay silent.
    pub fn cancel(&self, actor: &Uuid) -> bool {
        match self.lock_warmups().remove(actor) {
            Some(session) => {
                session.cancel_tasks();
                true
            }
            None => false,
        }
    }

    pub fn is_warming_up(&self, actor: &Uuid) -> bool {
        self.lock_warmups().contains_key(actor)
    }

    /// Whether the actor's session has been live at least `duration`.
    /// Backs the interaction grace window.
    pub fn warming_longer_than(&self, actor: &Uuid, duration: Duration) -> bool {
        self.lock_warmups()
            .get(actor)
            .is_some_and(|s| s.started_at.elapsed() >= duration)
    }

    pub fn set_cooldown(&self, actor: Uuid, duration: Duration) {
        self.lock_cooldowns()
            .insert(actor, Instant::now() + duration);
    }

    /// Time until the actor may teleport again; zero when not cooling down.
    /// Stale entries just answer zero, so they are never swept.
    pub fn cooldown_remaining(&self, actor: &Uuid) -> Duration {
        self.lock_cooldowns()
            .get(actor)
            .map(|expires| expires.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// Drops every session (cancelling its tasks) and every cooldown.
    pub fn clear(&self) {
        let mut warmups = self.lock_warmups();
        for session in warmups.values() {
            session.cancel_tasks();
        }
        warmups.clear();
        drop(warmups);
        self.lock_cooldowns().clear();
    }

    pub fn warmup_count(&self) -> usize {
        self.lock_warmups().len()
    }

    fn lock_warmups(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, WarmupSession>> {
        self.warmups.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_cooldowns(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Instant>> {
        self.cooldowns.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod test {
    use tokio::time::sleep;

    use super::*;
    use crate::store::Destination;
    use crate::test_support::location;
    use crate::world::WorldId;

    fn destination(name: &str) -> Destination {
        Destination::stored(name, location(WorldId(Uuid::new_v4()), 0.0, 64.0, 0.0))
    }

    fn register(registry: &TeleportRegistry, actor: Uuid, name: &str) -> u64 {
        let mut assigned = 0;
        registry.register_with(actor, |session_id| {
            assigned = session_id;
            WarmupSession::new(
                destination(name),
                None,
                session_id,
                tokio::spawn(async {}),
                None,
            )
        });
        assigned
    }

    #[tokio::test]
    async fn take_requires_the_current_session_id() {
        let registry = TeleportRegistry::new();
        let actor = Uuid::new_v4();

        let first = register(&registry, actor, "Base");
        let second = register(&registry, actor, "Outpost");
        assert_ne!(first, second);
        assert_eq!(registry.warmup_count(), 1);

        // The superseded task's firing must observe nothing to act on.
        assert!(registry.take_if_current(actor, first).is_none());
        assert!(registry.is_warming_up(&actor));

        let session = registry.take_if_current(actor, second).unwrap();
        assert_eq!(session.destination().display_name, "Outpost");
        assert!(!registry.is_warming_up(&actor));
    }

    #[tokio::test]
    async fn take_after_cancel_is_none() {
        let registry = TeleportRegistry::new();
        let actor = Uuid::new_v4();

        let id = register(&registry, actor, "Base");
        assert!(registry.cancel(&actor));
        // The cancel/fire race resolves here: a firing dispatched before the
        // cancel finds its entry gone.
        assert!(registry.take_if_current(actor, id).is_none());
    }

    #[tokio::test]
    async fn cancel_reports_presence() {
        let registry = TeleportRegistry::new();
        let actor = Uuid::new_v4();

        assert!(!registry.cancel(&actor));
        register(&registry, actor, "Base");
        assert!(registry.cancel(&actor));
        assert!(!registry.cancel(&actor));
    }

    #[tokio::test(start_paused = true)]
    async fn warming_longer_than_tracks_session_age() {
        let registry = TeleportRegistry::new();
        let actor = Uuid::new_v4();
        register(&registry, actor, "Base");

        assert!(!registry.warming_longer_than(&actor, Duration::from_millis(100)));
        sleep(Duration::from_millis(200)).await;
        assert!(registry.warming_longer_than(&actor, Duration::from_millis(100)));
        assert!(!registry.warming_longer_than(&actor, Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_expires_on_schedule() {
        let registry = TeleportRegistry::new();
        let actor = Uuid::new_v4();

        assert_eq!(registry.cooldown_remaining(&actor), Duration::ZERO);
        registry.set_cooldown(actor, Duration::from_secs(15));
        assert!(registry.cooldown_remaining(&actor) > Duration::ZERO);

        sleep(Duration::from_secs(15)).await;
        assert_eq!(registry.cooldown_remaining(&actor), Duration::ZERO);
    }

    #[tokio::test]
    async fn clear_drops_every_actor() {
        let registry = TeleportRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        register(&registry, a, "Base");
        register(&registry, b, "Outpost");
        registry.set_cooldown(a, Duration::from_secs(15));

        registry.clear();
        assert_eq!(registry.warmup_count(), 0);
        assert_eq!(registry.cooldown_remaining(&a), Duration::ZERO);
    }
}
