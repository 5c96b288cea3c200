use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId, SoundId};
use crate::permissions;
use crate::store::{Destination, destination_key};

pub struct SetCommand;

impl SetCommand {
    fn is_reserved(context: &CommandContext, name: &str) -> bool {
        let settings = context.manager.settings();
        let key = destination_key(name);
        key == "spawn"
            || key == "home"
            || key == destination_key(&settings.spawn_display_name)
            || key == destination_key(&settings.home_display_name)
    }
}

#[async_trait]
impl Subcommand for SetCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn permission_node(&self) -> &'static str {
        permissions::SET
    }

    fn usage(&self) -> &'static str {
        "/waystone set <destination>"
    }

    fn description(&self) -> &'static str {
        "Store the current position as a named destination"
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
        let name = args.join(" ");

        // The virtual names stay virtual; a stored record under them would
        // be unreachable anyway.
        if Self::is_reserved(context, &name) {
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

        let Some(position) = context.actors.position(actor).await else {
            return Ok(());
        };

        let destination = Destination::stored(&name, position);
        context.store.put(destination).await?;

        context
            .reply(
                sender,
                MessageId::CommandSuccessSet,
                &[(Macro::Destination, name)],
            )
            .await;
        context.play_sound(sender, SoundId::CommandSuccess).await;
        Ok(())
    }
}
