use async_trait::async_trait;

use crate::command::commands::resolve_binding;
use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId, SoundId};
use crate::permissions;

pub struct BindCommand;

#[async_trait]
impl Subcommand for BindCommand {
    fn name(&self) -> &'static str {
        "bind"
    }

    fn permission_node(&self) -> &'static str {
        permissions::BIND
    }

    fn usage(&self) -> &'static str {
        "/waystone bind <destination>"
    }

    fn description(&self) -> &'static str {
        "Bind the held item to a destination"
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

        let Some((key, display_name)) = resolve_binding(context, &name).await else {
            context
                .reply(
                    sender,
                    MessageId::CommandFailInvalidDestination,
                    &[(Macro::Destination, name)],
                )
                .await;
            context.play_sound(sender, SoundId::CommandFail).await;
            return Ok(());
        };

        let Some(mut held) = context.inventory.held_item(actor).await else {
            context
                .reply(sender, MessageId::CommandFailNoHeldItem, &[])
                .await;
            context.play_sound(sender, SoundId::CommandFail).await;
            return Ok(());
        };

        // Rebinds in place: the held material is kept, only the binding and
        // display metadata change.
        let item_name = held.id.clone();
        context.factory.bind_as(&mut held, &key, &display_name);
        context.inventory.set_held_item(actor, held).await;

        context
            .reply(
                sender,
                MessageId::CommandSuccessBind,
                &[
                    (Macro::Destination, display_name),
                    (Macro::ItemName, item_name),
                ],
            )
            .await;
        context.play_sound(sender, SoundId::CommandSuccess).await;
        Ok(())
    }
}
