use async_trait::async_trait;
use uuid::Uuid;

use crate::item::ItemStack;
use crate::world::Location;

/// Host-side view of a live actor. Every call is best-effort: an actor who
/// logged out mid-operation simply answers `None`/`false`.
#[async_trait]
pub trait ActorGateway: Send + Sync {
    async fn position(&self, actor: Uuid) -> Option<Location>;

    async fn is_sneaking(&self, actor: Uuid) -> bool;

    /// The actor's personal home point (bed spawn), if one is set.
    async fn bed_spawn(&self, actor: Uuid) -> Option<Location>;

    /// Moves the actor. Returns whether the actor was still present to move.
    async fn teleport(&self, actor: Uuid, target: &Location) -> bool;

    async fn name_of(&self, actor: Uuid) -> Option<String>;

    async fn find_by_name(&self, name: &str) -> Option<Uuid>;
}

/// Host-side inventory access, narrowed to what bound items need.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn held_item(&self, actor: Uuid) -> Option<ItemStack>;

    /// Removes exactly one unit of the first stack similar to `matcher`
    /// (same id and binding, count ignored). Returns whether a unit was
    /// found and removed.
    async fn remove_one_matching(&self, actor: Uuid, matcher: &ItemStack) -> bool;

    /// Adds the stack to the actor's inventory, returning the count that
    /// did not fit.
    async fn give(&self, actor: Uuid, stack: ItemStack) -> u32;

    /// Replaces the actor's held item. Returns whether the actor was present
    /// and holding something to replace.
    async fn set_held_item(&self, actor: Uuid, stack: ItemStack) -> bool;
}
