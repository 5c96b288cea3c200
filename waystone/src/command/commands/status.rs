use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::permissions;

pub struct StatusCommand;

#[async_trait]
impl Subcommand for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn permission_node(&self) -> &'static str {
        permissions::STATUS
    }

    fn usage(&self) -> &'static str {
        "/waystone status"
    }

    fn description(&self) -> &'static str {
        "Show the active configuration"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }

    async fn execute(
        &self,
        context: &CommandContext,
        sender: &CommandSender,
        _args: &[&str],
    ) -> Result<(), CommandError> {
        let settings = context.manager.settings();

        context.reply_raw(sender, "Waystone settings:").await;
        context
            .reply_raw(
                sender,
                &format!(
                    "  warmup: {}s, cooldown: {}s",
                    settings.warmup.as_secs(),
                    settings.cooldown.as_secs()
                ),
            )
            .await;
        context
            .reply_raw(
                sender,
                &format!(
                    "  cancel on: movement={}, damage={}, interaction={}",
                    settings.cancel_on_movement,
                    settings.cancel_on_damage,
                    settings.cancel_on_interaction
                ),
            )
            .await;
        context
            .reply_raw(
                sender,
                &format!(
                    "  item: removal={:?}, shift-click={}, left-click={}",
                    settings.removal_policy, settings.shift_click, settings.left_click
                ),
            )
            .await;
        context
            .reply_raw(
                sender,
                &format!(
                    "  effects: particles={}, lightning={}",
                    settings.particles, settings.lightning
                ),
            )
            .await;
        Ok(())
    }
}
