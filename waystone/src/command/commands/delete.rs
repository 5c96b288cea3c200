use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId, SoundId};
use crate::permissions;
use crate::store::destination_key;

pub struct DeleteCommand;

#[async_trait]
impl Subcommand for DeleteCommand {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["unset"]
    }

    fn permission_node(&self) -> &'static str {
        permissions::DELETE
    }

    fn usage(&self) -> &'static str {
        "/waystone delete <destination>"
    }

    fn description(&self) -> &'static str {
        "Remove a stored destination"
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
        let name = args.join(" ");

        let key = destination_key(&name);
        if key == "spawn" || key == "home" {
            context
                .reply(
                    sender,
                    MessageId::CommandFailReservedName,
                    &[(Macro::Destination, name)],
                )
                .await;
            context.play_sound(sender, SoundId::CommandFail).await;
            return Ok(());
        }

        match context.store.delete(&name).await? {
            Some(removed) => {
                context
                    .reply(
                        sender,
                        MessageId::CommandSuccessDelete,
                        &[(Macro::Destination, removed.display_name)],
                    )
                    .await;
                context.play_sound(sender, SoundId::CommandSuccess).await;
            }
            None => {
                context
                    .reply(
                        sender,
                        MessageId::CommandFailInvalidDestination,
                        &[(Macro::Destination, name)],
                    )
                    .await;
                context.play_sound(sender, SoundId::CommandFail).await;
            }
        }
        Ok(())
    }
}
