use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use uuid::Uuid;

use crate::world::Location;

/// Identifier the presentation layer maps to localized text. The subsystem
/// never formats messages itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageId {
    TeleportWarmup,
    TeleportWarmupSpawn,
    TeleportWarmupHome,
    TeleportSuccess,
    TeleportSuccessSpawn,
    TeleportCancelledDamage,
    TeleportCancelledInteraction,
    TeleportCancelledMovement,
    TeleportCancelledNoItem,
    TeleportCooldown,
    TeleportFailWorldDisabled,
    TeleportFailShiftClick,
    TeleportFailInvalidDestination,
    TeleportFailNoBedSpawn,
    PermissionDeniedUse,
    PermissionDeniedCommand,
    CommandFailConsole,
    CommandFailArgsCountUnder,
    CommandFailArgsCountOver,
    CommandFailInvalidDestination,
    CommandFailReservedName,
    CommandFailInvalidCommand,
    CommandFailUnknownPlayer,
    CommandFailNoHeldItem,
    CommandFailInventoryFull,
    CommandListHeader,
    CommandListItem,
    CommandSuccessSet,
    CommandSuccessDelete,
    CommandSuccessBind,
    CommandSuccessGive,
    CommandSuccessGiveReceived,
    CommandSuccessReload,
}

/// Substitution slots a message template may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Macro {
    Destination,
    World,
    Player,
    Duration,
    ItemName,
    Quantity,
    Usage,
}

pub type MacroValues<'a> = &'a [(Macro, String)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundId {
    CommandFail,
    CommandSuccess,
    TeleportDenied,
    TeleportCancelled,
    TeleportWarmup,
    TeleportSuccessDeparture,
    TeleportSuccessArrival,
}

/// Fire-and-forget presentation sink. Implementations render text/sounds
/// however the host does; failures are theirs to swallow.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, actor: Uuid, id: MessageId, macros: MacroValues<'_>);

    /// Preformatted line for displays with no message id (status, help).
    async fn send_raw(&self, actor: Uuid, line: &str) {
        let _ = (actor, line);
    }

    async fn play_sound(&self, actor: Uuid, sound: SoundId);

    async fn play_sound_at(&self, location: &Location, sound: SoundId);

    /// One pulse of the looping warmup effect at the actor's position.
    async fn warmup_effects(&self, actor: Uuid) {
        let _ = actor;
    }

    /// Environmental arrival effect, when configured.
    async fn strike_lightning(&self, location: &Location) {
        let _ = location;
    }
}

/// Per-actor, per-message send timestamps used to suppress repeats inside a
/// configured window. Transient bookkeeping only; cleared when the actor
/// leaves.
#[derive(Default)]
pub struct MessageCooldowns {
    sent: Mutex<HashMap<(Uuid, MessageId), Instant>>,
}

impl MessageCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a send attempt. Returns `false` when the same message went to
    /// the same actor within `window`, in which case the caller skips it.
    pub fn try_begin(&self, actor: Uuid, id: MessageId, window: Duration) -> bool {
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if let Some(last) = sent.get(&(actor, id)) {
            if now.duration_since(*last) < window {
                return false;
            }
        }
        sent.insert((actor, id), now);
        true
    }

    pub fn remove_actor(&self, actor: &Uuid) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(id, _), _| id != actor);
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
