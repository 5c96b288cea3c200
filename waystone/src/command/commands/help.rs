use std::sync::Arc;

use async_trait::async_trait;

use crate::command::{CommandContext, CommandError, CommandSender, Subcommand};
use crate::message::{Macro, MessageId, SoundId};
use crate::permissions;

pub struct HelpCommand {
    commands: Vec<Arc<dyn Subcommand>>,
}

impl HelpCommand {
    pub fn new(commands: Vec<Arc<dyn Subcommand>>) -> Self {
        Self { commands }
    }
}

#[async_trait]
impl Subcommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn permission_node(&self) -> &'static str {
        permissions::HELP
    }

    fn usage(&self) -> &'static str {
        "/waystone help [command]"
    }

    fn description(&self) -> &'static str {
        "Show command help"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }

    async fn execute(
        &self,
        context: &CommandContext,
        sender: &CommandSender,
        args: &[&str],
    ) -> Result<(), CommandError> {
        match args.first() {
            Some(name) => {
                let lowered = name.to_lowercase();
                let found = self
                    .commands
                    .iter()
                    .find(|c| c.name() == lowered || c.aliases().contains(&lowered.as_str()));
                match found {
                    Some(command) => {
                        context
                            .reply_raw(
                                sender,
                                &format!("{} - {}", command.usage(), command.description()),
                            )
                            .await;
                    }
                    None => {
                        context
                            .reply(
                                sender,
                                MessageId::CommandFailInvalidCommand,
                                &[(Macro::Usage, name.to_string())],
                            )
                            .await;
                        context.play_sound(sender, SoundId::CommandFail).await;
                    }
                }
            }
            None => {
                for command in &self.commands {
                    context
                        .reply_raw(
                            sender,
                            &format!("{} - {}", command.usage(), command.description()),
                        )
                        .await;
                }
                context
                    .reply_raw(sender, &format!("{} - {}", self.usage(), self.description()))
                    .await;
            }
        }
        Ok(())
    }
}
