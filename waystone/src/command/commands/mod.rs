use std::sync::Arc;

use super::Subcommand;

pub mod bind;
pub mod delete;
pub mod give;
pub mod help;
pub mod list;
pub mod reload;
pub mod set;
pub mod status;
pub mod teleport;

/// Every registered subcommand. Help is built last so it can list the rest.
pub fn all() -> Vec<Arc<dyn Subcommand>> {
    let mut commands: Vec<Arc<dyn Subcommand>> = vec![
        Arc::new(teleport::TeleportCommand),
        Arc::new(set::SetCommand),
        Arc::new(delete::DeleteCommand),
        Arc::new(list::ListCommand),
        Arc::new(bind::BindCommand),
        Arc::new(give::GiveCommand),
        Arc::new(status::StatusCommand),
        Arc::new(reload::ReloadCommand),
    ];
    let help = help::HelpCommand::new(commands.clone());
    commands.push(Arc::new(help));
    commands
}

/// Shared by bind and give: maps a requested name to the (key, display name)
/// pair a binding carries. The spawn and home names always resolve to their
/// virtual keys; everything else must exist in the store.
pub(crate) async fn resolve_binding(
    context: &super::CommandContext,
    name: &str,
) -> Option<(String, String)> {
    use crate::store::destination_key;

    let settings = context.manager.settings();
    let key = destination_key(name);
    if key == "spawn" || key == destination_key(&settings.spawn_display_name) {
        return Some(("spawn".to_string(), settings.spawn_display_name));
    }
    if key == "home" || key == destination_key(&settings.home_display_name) {
        return Some(("home".to_string(), settings.home_display_name));
    }
    context
        .store
        .get(name)
        .await
        .map(|d| (d.key, d.display_name))
}
