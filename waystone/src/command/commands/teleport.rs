use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::permissions;

pub struct TeleportCommand;

#[async_trait]
impl Subcommand for TeleportCommand {
    fn name(&self) -> &'static str {
        "teleport"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["tp"]
    }

    fn permission_node(&self) -> &'static str {
        permissions::TELEPORT
    }

    fn usage(&self) -> &'static str {
        "/waystone teleport <destination>"
    }

    fn description(&self) -> &'static str {
        "Teleport to a stored destination after the warmup delay"
    }

    fn min_args(&self) -> usize {
        1
    }

    async fn execute(
        &self,
        context: &CommandContext,
        sender: &CommandSender,
        args: &[&str],
    ) -> Result<(), CommandError> {
        let actor = sender.player().ok_or(CommandError::NotAPlayer)?;

        // Remaining arguments joined: destination names may contain spaces.
        let name = args.join(" ");
        context.manager.initiate(actor, Some(&name), None).await;
        Ok(())
    }
}
