use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waystone_util::text::{strip_color, translate_alt_codes};

use crate::store::Destination;

/// Metadata tag carrying the bound destination key.
pub const BOUND_KEY_TAG: &str = "waystone:key";

/// A simplified item stack: id, count and string metadata. The host maps
/// this onto its real item representation at the seam.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: String,
    pub count: u32,
    pub name: Option<String>,
    pub lore: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

impl ItemStack {
    pub fn new(id: &str, count: u32) -> Self {
        Self {
            id: id.to_string(),
            count,
            name: None,
            lore: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Stack-matching for inventory removal: same item id and same binding.
    /// Count, display name and lore do not participate, so a renamed copy of
    /// a bound item still matches its sibling stacks.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.id == other.id && self.tags.get(BOUND_KEY_TAG) == other.tags.get(BOUND_KEY_TAG)
    }
}

/// Creates and recognizes destination-bound item stacks.
pub struct BoundItemFactory {
    material: String,
}

impl BoundItemFactory {
    pub fn new(material: &str) -> Self {
        Self {
            material: material.to_string(),
        }
    }

    /// A fresh stack of `count` items bound to `destination`.
    pub fn create(&self, destination: &Destination, count: u32) -> ItemStack {
        self.create_for_key(&destination.key, &destination.display_name, count)
    }

    /// A fresh bound stack from a bare key and display name. Used where no
    /// full record exists, e.g. binding to a virtual destination.
    pub fn create_for_key(&self, key: &str, display_name: &str, count: u32) -> ItemStack {
        let mut stack = ItemStack::new(&self.material, count);
        self.bind_as(&mut stack, key, display_name);
        stack
    }

    /// Writes the binding onto an existing stack, replacing any previous one.
    pub fn bind(&self, stack: &mut ItemStack, destination: &Destination) {
        self.bind_as(stack, &destination.key, &destination.display_name);
    }

    /// Key-level form of [`bind`](Self::bind); keeps the stack's material,
    /// so an already-held item can be rebound in place.
    pub fn bind_as(&self, stack: &mut ItemStack, key: &str, display_name: &str) {
        stack.tags.insert(BOUND_KEY_TAG.to_string(), key.to_string());
        stack.name = Some(translate_alt_codes(display_name));
        stack.lore = vec![format!("Bound to {}", strip_color(display_name))];
    }

    /// Whether the stack carries a binding, whatever its material. Items
    /// keep working after the configured material changes.
    pub fn is_bound(&self, stack: &ItemStack) -> bool {
        stack.tags.contains_key(BOUND_KEY_TAG)
    }

    pub fn bound_key<'a>(&self, stack: &'a ItemStack) -> Option<&'a str> {
        stack.tags.get(BOUND_KEY_TAG).map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;
    use waystone_util::math::Vector3;

    use super::*;
    use crate::store::Destination;
    use crate::world::{Location, WorldId};

    fn destination(name: &str) -> Destination {
        Destination::stored(
            name,
            Location::new(
                WorldId(Uuid::new_v4()),
                Vector3::new(0.0, 64.0, 0.0),
                0.0,
                0.0,
            ),
        )
    }

    fn factory() -> BoundItemFactory {
        BoundItemFactory::new("minecraft:nether_star")
    }

    #[test]
    fn created_stack_is_recognized_and_keyed() {
        let factory = factory();
        let stack = factory.create(&destination("&aBase Camp"), 3);

        assert!(factory.is_bound(&stack));
        assert_eq!(factory.bound_key(&stack), Some("base_camp"));
        assert_eq!(stack.count, 3);
    }

    #[test]
    fn unbound_stack_is_not_recognized() {
        let factory = factory();
        let stack = ItemStack::new("minecraft:nether_star", 1);
        assert!(!factory.is_bound(&stack));
        assert_eq!(factory.bound_key(&stack), None);
    }

    #[test]
    fn similar_ignores_count_and_name() {
        let factory = factory();
        let a = factory.create(&destination("Base"), 1);
        let mut b = factory.create(&destination("Base"), 16);
        b.name = Some("renamed".to_string());
        assert!(a.is_similar(&b));
    }

    #[test]
    fn different_binding_is_not_similar() {
        let factory = factory();
        let a = factory.create(&destination("Base"), 1);
        let b = factory.create(&destination("Outpost"), 1);
        assert!(!a.is_similar(&b));
    }

    #[test]
    fn rebinding_replaces_key() {
        let factory = factory();
        let mut stack = factory.create(&destination("Base"), 1);
        factory.bind(&mut stack, &destination("Outpost"));
        assert_eq!(factory.bound_key(&stack), Some("outpost"));
    }
}
