use std::time::Duration;

/// Result of asking for a teleport. Denials are expected, per-actor and
/// retryable; none of them mutate registry state.
#[derive(Clone, Debug, PartialEq)]
pub enum TeleportOutcome {
    /// A warmup session was registered; the teleport fires after the delay.
    WarmupStarted { destination_key: String },
    /// The actor was moved (zero-warmup path or a fired task).
    Teleported { destination_key: String },
    /// The triggering item was gone when it was due to be consumed. On the
    /// fire path this still applies the cooldown.
    MissingItem,
    Denied(DenyReason),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DenyReason {
    /// The actor's current world is not enabled for teleports.
    WorldDisabled,
    MissingPermission,
    /// The sneak-to-activate policy was not satisfied.
    SneakRequired,
    UnknownDestination(String),
    /// Still cooling down from the previous teleport.
    OnCooldown(Duration),
    /// The actor vanished (logged out) while the operation ran.
    ActorGone,
}
