use std::sync::Arc;

use uuid::Uuid;

use crate::item::{BoundItemFactory, ItemStack};
use crate::message::{MessageId, Messenger, SoundId};
use crate::teleport::TeleportManager;
use crate::world::Location;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractAction {
    LeftClickBlock,
    RightClickBlock,
    LeftClickAir,
    RightClickAir,
    /// Pressure plates, tripwires; never a deliberate use.
    Physical,
}

impl InteractAction {
    fn is_block_click(self) -> bool {
        matches!(self, Self::LeftClickBlock | Self::RightClickBlock)
    }

    fn is_left_click(self) -> bool {
        matches!(self, Self::LeftClickBlock | Self::LeftClickAir)
    }
}

/// What the host knows about a clicked block, narrowed to the one property
/// the listener cares about: whether the block has its own use action
/// (doors, switches, containers, craft stations).
#[derive(Clone, Copy, Debug, Default)]
pub struct ClickedBlock {
    pub interactive: bool,
}

pub struct InteractEvent {
    pub actor: Uuid,
    pub action: InteractAction,
    pub clicked_block: Option<ClickedBlock>,
    pub held_item: Option<ItemStack>,
    pub sneaking: bool,
}

pub struct MoveEvent {
    pub actor: Uuid,
    pub from: Location,
    pub to: Location,
}

pub struct DamageEvent {
    pub actor: Uuid,
}

/// Routes host events into the teleport state machine: bound-item use starts
/// teleports, and movement/damage/interaction/disconnect/death race the
/// scheduler to cancel them.
pub struct PlayerEventListener {
    manager: TeleportManager,
    factory: Arc<BoundItemFactory>,
    messenger: Arc<dyn Messenger>,
}

impl PlayerEventListener {
    pub fn new(
        manager: TeleportManager,
        factory: Arc<BoundItemFactory>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            manager,
            factory,
            messenger,
        }
    }

    /// Movement cancels a warmup when the position itself changes; turning
    /// the view does not count.
    pub async fn on_player_move(&self, event: &MoveEvent) {
        if !self.manager.settings().cancel_on_movement {
            return;
        }
        if !self.manager.is_warming_up(&event.actor) {
            return;
        }
        let moved = event.from.world != event.to.world
            || event.from.position.distance_squared(&event.to.position) > 0.0;
        if moved && self.manager.cancel(&event.actor) {
            self.messenger
                .send_message(event.actor, MessageId::TeleportCancelledMovement, &[])
                .await;
            self.messenger
                .play_sound(event.actor, SoundId::TeleportCancelled)
                .await;
        }
    }

    pub async fn on_entity_damage(&self, event: &DamageEvent) {
        if !self.manager.settings().cancel_on_damage {
            return;
        }
        if self.manager.is_warming_up(&event.actor) && self.manager.cancel(&event.actor) {
            self.messenger
                .send_message(event.actor, MessageId::TeleportCancelledDamage, &[])
                .await;
            self.messenger
                .play_sound(event.actor, SoundId::TeleportCancelled)
                .await;
        }
    }

    /// Interaction handling, double-duty: cancels a running warmup on block
    /// interaction (after the grace window), and is the entry point for
    /// bound-item use. Returns whether the host event should be consumed.
    pub async fn on_player_interact(&self, event: &InteractEvent) -> bool {
        let settings = self.manager.settings();

        if settings.cancel_on_interaction
            && self.manager.is_warming_up(&event.actor)
            && event.action.is_block_click()
        {
            // The click that started the warmup fires one interact event per
            // hand; inside the grace window those duplicates are ignored.
            if !self.manager.past_interaction_grace(&event.actor) {
                return false;
            }
            if self.manager.cancel(&event.actor) {
                self.messenger
                    .send_message(event.actor, MessageId::TeleportCancelledInteraction, &[])
                    .await;
                self.messenger
                    .play_sound(event.actor, SoundId::TeleportCancelled)
                    .await;
            }
            return false;
        }

        let Some(held_item) = &event.held_item else {
            return false;
        };
        if !self.factory.is_bound(held_item) {
            return false;
        }

        if event.action == InteractAction::Physical {
            return false;
        }
        if event.action.is_left_click() && !settings.left_click {
            return false;
        }
        if self.manager.is_warming_up(&event.actor) {
            return false;
        }

        // Holding a bound item must not break doors, switches, containers or
        // craft stations; sneaking overrides and uses the item anyway.
        if let Some(block) = &event.clicked_block {
            if block.interactive && !event.sneaking {
                return false;
            }
        }

        let destination_name = self.factory.bound_key(held_item).map(str::to_string);
        self.manager
            .initiate(
                event.actor,
                destination_name.as_deref(),
                Some(held_item.clone()),
            )
            .await;
        true
    }

    /// Death is terminal for the warmup whatever the cancel flags say.
    pub async fn on_player_death(&self, actor: Uuid) {
        self.manager.remove_actor(&actor);
    }

    /// Disconnect cleanup; same unconditional semantics as death.
    pub async fn on_player_quit(&self, actor: Uuid) {
        self.manager.remove_actor(&actor);
    }

    /// Whether a craft result using these ingredients must be voided because
    /// a bound item is among them.
    pub fn on_prepare_craft(&self, ingredients: &[ItemStack]) -> bool {
        if self.manager.settings().allow_in_recipes {
            return false;
        }
        ingredients.iter().any(|stack| self.factory.is_bound(stack))
    }
}
