//! Registry of loaded top-level commands.

use std::collections::HashMap;

use tracing::warn;

use crate::command::CommandContext;
use crate::dispatch::DispatchOutcome;
use crate::loader::{CommandLoader, CommandTree, LoadError, LoadReport, LoadedCommand};
use crate::namespace::Namespace;
use crate::reply::Reply;
use crate::schema::CommandSchema;

/// Registry of top-level commands.
///
/// Built once from a [`CommandTree`] and never mutated afterwards, so it
/// can be shared behind an `Arc` by concurrent requests.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Commands in discovery order.
    commands: Vec<LoadedCommand>,
    /// Map of command names to positions in `commands`.
    index: HashMap<String, usize>,
    report: LoadReport,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a namespace and build a registry from it.
    pub fn load(namespace: &Namespace, loader: &CommandLoader) -> Result<Self, LoadError> {
        Ok(Self::from_tree(loader.load(namespace)?))
    }

    /// Build a registry from an already loaded tree.
    pub fn from_tree(tree: CommandTree) -> Self {
        let report = tree.report().clone();
        let commands = tree.into_commands();
        let index = commands
            .iter()
            .enumerate()
            .map(|(i, cmd)| (cmd.name().to_string(), i))
            .collect();

        Self {
            commands,
            index,
            report,
        }
    }

    /// Get a command by name.
    pub fn get(&self, name: &str) -> Option<&LoadedCommand> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Command names in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(LoadedCommand::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// What the loader skipped while building this registry.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Schemas of every command, in the bulk registration order.
    pub fn schemas(&self) -> Vec<CommandSchema> {
        self.commands.iter().map(|c| c.schema().clone()).collect()
    }

    /// Route a request to the command it names.
    pub async fn dispatch(&self, ctx: &CommandContext) -> DispatchOutcome {
        let name = ctx.interaction().command.as_str();
        match self.get(name) {
            Some(command) => command.dispatch(ctx).await,
            None => {
                warn!("Unknown command: {}", name);
                if let Err(e) = ctx.reply(Reply::not_found()).await {
                    warn!("Failed to send fallback reply: {}", e);
                }
                DispatchOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::command::{Command, HandlerError};
    use crate::interaction::ResolvedInteraction;
    use crate::reply::CollectingResponder;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl Command for Echo {
        fn describe(&self) -> CommandSchema {
            CommandSchema::new(self.0, "Echoes its name")
        }

        async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
            if self.0 == "broken" {
                return Err(HandlerError::Failed("nope".to_string()));
            }
            ctx.reply(Reply::text(self.0)).await
        }
    }

    fn registry() -> CommandRegistry {
        let namespace = Namespace::root()
            .command("help", || Ok(Echo("help")))
            .command("broken", || Ok(Echo("broken")))
            .namespace(
                Namespace::new("integral")
                    .command("calculate", || Ok(Echo("calculate")))
                    .namespace(Namespace::new("combinations").command("get", || Ok(Echo("get")))),
            );
        CommandRegistry::load(&namespace, &CommandLoader::new()).unwrap()
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["help", "broken", "integral"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("integral"));
        assert!(!registry.contains("calculate"));
        assert!(matches!(registry.get("integral"), Some(LoadedCommand::Group(_))));
        assert_eq!(registry.schemas()[2].options.len(), 2);
        assert_eq!(registry.report().loaded, 4);
    }

    #[tokio::test]
    async fn test_dispatch_paths() {
        let registry = registry();
        let responder = Arc::new(CollectingResponder::new());
        let run = |interaction: ResolvedInteraction| CommandContext::new(interaction, responder.clone());

        let outcomes = [
            registry.dispatch(&run(ResolvedInteraction::new("help"))).await,
            registry
                .dispatch(&run(
                    ResolvedInteraction::new("integral")
                        .with_group("combinations")
                        .with_subcommand("get"),
                ))
                .await,
            registry.dispatch(&run(ResolvedInteraction::new("unknown"))).await,
            registry.dispatch(&run(ResolvedInteraction::new("broken"))).await,
            registry
                .dispatch(&run(ResolvedInteraction::new("integral").with_subcommand("get")))
                .await,
        ];

        assert_eq!(
            outcomes,
            [
                DispatchOutcome::Handled,
                DispatchOutcome::Handled,
                DispatchOutcome::NotFound,
                DispatchOutcome::Failed,
                DispatchOutcome::NotFound,
            ]
        );
        assert_eq!(
            responder.take().await,
            vec![
                Reply::text("help"),
                Reply::text("get"),
                Reply::not_found(),
                Reply::execution_failed(),
                Reply::not_found(),
            ]
        );
    }
}
