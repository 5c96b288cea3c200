use waystone_util::permission::{OpLevel, Permission, PermissionDefault, PermissionRegistry};

pub const USE: &str = "waystone.use";
pub const TELEPORT: &str = "waystone.teleport";
pub const SET: &str = "waystone.set";
pub const DELETE: &str = "waystone.delete";
pub const LIST: &str = "waystone.list";
pub const BIND: &str = "waystone.bind";
pub const GIVE: &str = "waystone.give";
pub const STATUS: &str = "waystone.status";
pub const RELOAD: &str = "waystone.reload";
pub const HELP: &str = "waystone.help";

/// Registers every node the subsystem checks. Called once at startup;
/// double registration surfaces as an error from the registry.
pub fn register_all(registry: &mut PermissionRegistry) -> Result<(), String> {
    registry.register(Permission::new(
        USE,
        "Teleport with a bound item",
        PermissionDefault::Allow,
    ))?;
    registry.register(Permission::new(
        TELEPORT,
        "Teleport to a named destination by command",
        PermissionDefault::Allow,
    ))?;
    registry.register(Permission::new(
        SET,
        "Create a destination at the current position",
        PermissionDefault::Op(OpLevel::Two),
    ))?;
    registry.register(Permission::new(
        DELETE,
        "Delete a stored destination",
        PermissionDefault::Op(OpLevel::Two),
    ))?;
    registry.register(Permission::new(
        LIST,
        "List stored destinations",
        PermissionDefault::Allow,
    ))?;
    registry.register(Permission::new(
        BIND,
        "Bind the held item to a destination",
        PermissionDefault::Op(OpLevel::Two),
    ))?;
    registry.register(Permission::new(
        GIVE,
        "Give bound items to a player",
        PermissionDefault::Op(OpLevel::Two),
    ))?;
    registry.register(Permission::new(
        STATUS,
        "Show the current configuration",
        PermissionDefault::Op(OpLevel::Two),
    ))?;
    registry.register(Permission::new(
        RELOAD,
        "Reload configuration and stored destinations",
        PermissionDefault::Op(OpLevel::Three),
    ))?;
    registry.register(Permission::new(
        HELP,
        "Show command help",
        PermissionDefault::Allow,
    ))?;
    Ok(())
}
