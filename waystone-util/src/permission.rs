use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Describes the default behavior for a permission node when an actor has no
/// explicit value set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionDefault {
    /// Not granted by default.
    Deny,
    /// Granted by default.
    Allow,
    /// Granted by default to operators at or above the given level.
    Op(OpLevel),
}

/// A registered permission node (e.g. `waystone.teleport`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Permission {
    pub node: String,
    pub description: String,
    pub default: PermissionDefault,
}

impl Permission {
    pub fn new(node: &str, description: &str, default: PermissionDefault) -> Self {
        Self {
            node: node.to_string(),
            description: description.to_string(),
            default,
        }
    }
}

/// Repository of every permission node the subsystem registers at startup.
#[derive(Default)]
pub struct PermissionRegistry {
    permissions: HashMap<String, Permission>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node. Re-registering the same node is an error so a typo
    /// in a command's node string shows up at startup instead of silently
    /// shadowing an existing entry.
    pub fn register(&mut self, permission: Permission) -> Result<(), String> {
        if self.permissions.contains_key(&permission.node) {
            return Err(format!(
                "permission {} is already registered",
                permission.node
            ));
        }
        self.permissions.insert(permission.node.clone(), permission);
        Ok(())
    }

    pub fn get(&self, node: &str) -> Option<&Permission> {
        self.permissions.get(node)
    }

    pub fn is_registered(&self, node: &str) -> bool {
        self.permissions.contains_key(node)
    }
}

/// Per-actor permission overrides.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct PermissionAttachment {
    permissions: HashMap<String, bool>,
}

impl PermissionAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, node: &str, value: bool) {
        self.permissions.insert(node.to_string(), value);
    }

    pub fn unset(&mut self, node: &str) {
        self.permissions.remove(node);
    }

    pub fn value_of(&self, node: &str) -> Option<bool> {
        self.permissions.get(node).copied()
    }
}

/// Resolves permission checks against explicit attachments, wildcard
/// entries, and registered defaults, in that order.
#[derive(Default)]
pub struct PermissionManager {
    registry: Arc<RwLock<PermissionRegistry>>,
    attachments: RwLock<HashMap<Uuid, PermissionAttachment>>,
    op_levels: RwLock<HashMap<Uuid, OpLevel>>,
}

impl PermissionManager {
    pub fn new(registry: Arc<RwLock<PermissionRegistry>>) -> Self {
        Self {
            registry,
            attachments: RwLock::new(HashMap::new()),
            op_levels: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set_permission(&self, actor_id: Uuid, node: &str, value: bool) {
        self.attachments
            .write()
            .await
            .entry(actor_id)
            .or_default()
            .set(node, value);
    }

    pub async fn set_op_level(&self, actor_id: Uuid, level: OpLevel) {
        self.op_levels.write().await.insert(actor_id, level);
    }

    /// Drops every per-actor record. Called when the actor leaves.
    pub async fn remove_actor(&self, actor_id: &Uuid) {
        self.attachments.write().await.remove(actor_id);
        self.op_levels.write().await.remove(actor_id);
    }

    pub async fn has_permission(&self, actor_id: &Uuid, node: &str) -> bool {
        if let Some(attachment) = self.attachments.read().await.get(actor_id) {
            if let Some(value) = attachment.value_of(node) {
                return value;
            }
            // Wildcard entries cover whole subtrees: "waystone.*" answers for
            // "waystone.teleport" when no exact entry exists.
            let mut prefix = node;
            while let Some(split) = prefix.rfind('.') {
                prefix = &prefix[..split];
                if let Some(value) = attachment.value_of(&format!("{prefix}.*")) {
                    return value;
                }
            }
        }

        let op_level = self
            .op_levels
            .read()
            .await
            .get(actor_id)
            .copied()
            .unwrap_or_default();

        match self.registry.read().await.get(node).map(|p| p.default) {
            Some(PermissionDefault::Allow) => true,
            Some(PermissionDefault::Deny) => false,
            Some(PermissionDefault::Op(required)) => op_level >= required,
            // Unregistered nodes deny; a missing registration is a bug, not a grant.
            None => false,
        }
    }
}

/// Operator level, mirroring the usual four-tier server hierarchy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpLevel {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}
