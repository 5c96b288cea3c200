use async_trait::async_trait;

use crate::command::commands::resolve_binding;
use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId, SoundId};
use crate::permissions;

pub struct GiveCommand;

#[async_trait]
impl Subcommand for GiveCommand {
    fn name(&self) -> &'static str {
        "give"
    }

    fn permission_node(&self) -> &'static str {
        permissions::GIVE
    }

    fn usage(&self) -> &'static str {
        "/waystone give <player> [quantity] [destination]"
    }

    fn description(&self) -> &'static str {
        "Give a player items bound to a destination"
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
        let Some(target) = context.actors.find_by_name(args[0]).await else {
            context
                .reply(
                    sender,
                    MessageId::CommandFailUnknownPlayer,
                    &[(Macro::Player, args[0].to_string())],
                )
                .await;
            context.play_sound(sender, SoundId::CommandFail).await;
            return Ok(());
        };

        // Optional quantity; a non-numeric second argument starts the
        // destination name instead.
        let mut rest = &args[1..];
        let quantity = match rest.first().and_then(|a| a.parse::<u32>().ok()) {
            Some(parsed) => {
                rest = &rest[1..];
                parsed.max(1)
            }
            None => 1,
        };

        let name = if rest.is_empty() {
            context.manager.settings().default_destination
        } else {
            rest.join(" ")
        };

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

        let stack = context.factory.create_for_key(&key, &display_name, quantity);
        let leftover = context.inventory.give(target, stack).await;
        if leftover >= quantity {
            context
                .reply(sender, MessageId::CommandFailInventoryFull, &[])
                .await;
            context.play_sound(sender, SoundId::CommandFail).await;
            return Ok(());
        }

        let given = quantity - leftover;
        context
            .reply(
                sender,
                MessageId::CommandSuccessGive,
                &[
                    (Macro::Player, args[0].to_string()),
                    (Macro::Quantity, given.to_string()),
                    (Macro::Destination, display_name.clone()),
                ],
            )
            .await;
        context
            .messenger
            .send_message(
                target,
                MessageId::CommandSuccessGiveReceived,
                &[
                    (Macro::Quantity, given.to_string()),
                    (Macro::Destination, display_name),
                ],
            )
            .await;
        context.play_sound(sender, SoundId::CommandSuccess).await;
        Ok(())
    }
}
