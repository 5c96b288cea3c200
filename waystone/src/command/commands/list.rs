use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId};
use crate::permissions;

pub struct ListCommand;

#[async_trait]
impl Subcommand for ListCommand {
    fn name(&self) -> &'static str {
        "list"
    }

    fn permission_node(&self) -> &'static str {
        permissions::LIST
    }

    fn usage(&self) -> &'static str {
        "/waystone list"
    }

    fn description(&self) -> &'static str {
        "List every stored destination"
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
        let keys = context.store.list_keys().await;
        context
            .reply(
                sender,
                MessageId::CommandListHeader,
                &[(Macro::Quantity, keys.len().to_string())],
            )
            .await;
        for key in keys {
            context
                .reply(sender, MessageId::CommandListItem, &[(Macro::Destination, key)])
                .await;
        }
        Ok(())
    }
}
