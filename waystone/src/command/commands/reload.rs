use async_trait::async_trait;
use waystone_config::WaystoneConfig;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{MessageId, SoundId};
use crate::permissions;

pub struct ReloadCommand;

#[async_trait]
impl Subcommand for ReloadCommand {
    fn name(&self) -> &'static str {
        "reload"
    }

    fn permission_node(&self) -> &'static str {
        permissions::RELOAD
    }

    fn usage(&self) -> &'static str {
        "/waystone reload"
    }

    fn description(&self) -> &'static str {
        "Reload configuration and stored destinations"
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
        let config = WaystoneConfig::load(&context.config_path);
        context.manager.reload(&config);
        context.store.reload().await?;

        log::info!("Configuration and destinations reloaded");
        context
            .reply(sender, MessageId::CommandSuccessReload, &[])
            .await;
        context.play_sound(sender, SoundId::CommandSuccess).await;
        Ok(())
    }
}
