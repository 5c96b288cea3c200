use serde::{Deserialize, Serialize};

/// When the triggering item is taken from the actor's inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Consumed at initiation, before the warmup starts.
    OnUse,
    /// Consumed when the delayed teleport fires; discarding the item
    /// mid-warmup aborts the teleport but still applies the cooldown.
    OnSuccess,
    Never,
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Item id new bound items are created from.
    pub material: String,
    /// Whether left-clicking with a bound item triggers a teleport.
    pub left_click: bool,
    /// Require sneaking to activate a bound item.
    pub shift_click: bool,
    pub remove_from_inventory: RemovalPolicy,
    /// Whether bound items may be used as crafting ingredients.
    pub allow_in_recipes: bool,
    /// Destination used when a bound item carries no key of its own.
    pub default_destination: String,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            material: "minecraft:nether_star".to_string(),
            left_click: false,
            shift_click: false,
            remove_from_inventory: RemovalPolicy::OnSuccess,
            allow_in_recipes: false,
            default_destination: "spawn".to_string(),
        }
    }
}
