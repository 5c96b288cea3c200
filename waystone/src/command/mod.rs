use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use waystone_util::permission::PermissionManager;

use crate::actor::{ActorGateway, InventoryProvider};
use crate::item::BoundItemFactory;
use crate::message::{Macro, MacroValues, MessageId, Messenger, SoundId};
use crate::store::{DestinationStore, StoreError};
use crate::teleport::TeleportManager;

pub mod commands;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(Uuid),
}

impl CommandSender {
    pub fn player(&self) -> Option<Uuid> {
        match self {
            Self::Player(id) => Some(*id),
            Self::Console => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("this command can only be run by a player")]
    NotAPlayer,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a subcommand may touch, bundled so each command file stays a
/// single executor.
pub struct CommandContext {
    pub manager: TeleportManager,
    pub store: Arc<dyn DestinationStore>,
    pub factory: Arc<BoundItemFactory>,
    pub actors: Arc<dyn ActorGateway>,
    pub inventory: Arc<dyn InventoryProvider>,
    pub messenger: Arc<dyn Messenger>,
    pub permissions: Arc<PermissionManager>,
    pub config_path: PathBuf,
}

impl CommandContext {
    /// Sends a message to the sender: players through the messenger,
    /// console to the log.
    pub async fn reply(&self, sender: &CommandSender, id: MessageId, macros: MacroValues<'_>) {
        match sender {
            CommandSender::Player(actor) => {
                self.messenger.send_message(*actor, id, macros).await;
            }
            CommandSender::Console => {
                log::info!("{id:?} {macros:?}");
            }
        }
    }

    pub async fn reply_raw(&self, sender: &CommandSender, line: &str) {
        match sender {
            CommandSender::Player(actor) => self.messenger.send_raw(*actor, line).await,
            CommandSender::Console => log::info!("{line}"),
        }
    }

    pub async fn play_sound(&self, sender: &CommandSender, sound: SoundId) {
        if let CommandSender::Player(actor) = sender {
            self.messenger.play_sound(*actor, sound).await;
        }
    }
}

#[async_trait]
pub trait Subcommand: Send + Sync {
    fn name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn permission_node(&self) -> &'static str;

    fn usage(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn min_args(&self) -> usize {
        0
    }

    fn max_args(&self) -> Option<usize> {
        None
    }

    async fn execute(
        &self,
        context: &CommandContext,
        sender: &CommandSender,
        args: &[&str],
    ) -> Result<(), CommandError>;
}

/// Resolves the first argument to a subcommand, applies the shared
/// permission and argument-count gates, then hands off. Every failure is
/// reported to the sender; nothing here is fatal.
pub struct CommandDispatcher {
    context: CommandContext,
    commands: Vec<Arc<dyn Subcommand>>,
}

impl CommandDispatcher {
    pub fn new(context: CommandContext) -> Self {
        Self {
            context,
            commands: commands::all(),
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn commands(&self) -> &[Arc<dyn Subcommand>] {
        &self.commands
    }

    fn find(&self, name: &str) -> Option<Arc<dyn Subcommand>> {
        let lowered = name.to_lowercase();
        self.commands
            .iter()
            .find(|c| c.name() == lowered || c.aliases().contains(&lowered.as_str()))
            .cloned()
    }

    async fn sender_may(&self, sender: &CommandSender, node: &str) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Player(actor) => {
                self.context.permissions.has_permission(actor, node).await
            }
        }
    }

    /// Splits a raw line on whitespace and dispatches it.
    pub async fn dispatch_line(&self, sender: &CommandSender, line: &str) {
        let args: Vec<&str> = line.split_whitespace().collect();
        self.dispatch(sender, &args).await;
    }

    pub async fn dispatch(&self, sender: &CommandSender, args: &[&str]) {
        let (head, rest) = match args.split_first() {
            Some((head, rest)) => (*head, rest),
            // Bare invocation shows help.
            None => ("help", &[][..]),
        };

        let Some(command) = self.find(head) else {
            self.context
                .reply(
                    sender,
                    MessageId::CommandFailInvalidCommand,
                    &[(Macro::Usage, head.to_string())],
                )
                .await;
            self.context.play_sound(sender, SoundId::CommandFail).await;
            return;
        };

        if !self.sender_may(sender, command.permission_node()).await {
            self.context
                .reply(sender, MessageId::PermissionDeniedCommand, &[])
                .await;
            self.context.play_sound(sender, SoundId::CommandFail).await;
            return;
        }

        if rest.len() < command.min_args() {
            self.context
                .reply(
                    sender,
                    MessageId::CommandFailArgsCountUnder,
                    &[(Macro::Usage, command.usage().to_string())],
                )
                .await;
            self.context.play_sound(sender, SoundId::CommandFail).await;
            return;
        }
        if command.max_args().is_some_and(|max| rest.len() > max) {
            self.context
                .reply(
                    sender,
                    MessageId::CommandFailArgsCountOver,
                    &[(Macro::Usage, command.usage().to_string())],
                )
                .await;
            self.context.play_sound(sender, SoundId::CommandFail).await;
            return;
        }

        match command.execute(&self.context, sender, rest).await {
            Ok(()) => {}
            Err(CommandError::NotAPlayer) => {
                self.context
                    .reply(sender, MessageId::CommandFailConsole, &[])
                    .await;
            }
            Err(CommandError::Store(e)) => {
                log::error!("Command '{}' failed against the store: {e}", command.name());
                self.context.play_sound(sender, SoundId::CommandFail).await;
            }
        }
    }
}
