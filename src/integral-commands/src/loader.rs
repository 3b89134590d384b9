//! Command tree loader.
//!
//! Walks a [`Namespace`] and produces the registrable schema tree together
//! with one dispatch table per group:
//!
//! - depth 0: definitions become top-level commands, namespaces become groups
//! - depth 1: definitions become subcommands keyed by their own name,
//!   namespaces become subgroups
//! - depth 2: definitions become subgroup commands keyed `subgroup/name`;
//!   deeper namespaces are skipped
//!
//! Failures of a single definition are logged and the entry is dropped, so
//! siblings still load. [`LoaderOptions::strict`] turns those failures into
//! a hard error instead.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::command::{Command, CommandContext, HandlerError};
use crate::dispatch::{DispatchKey, DispatchOutcome, DispatchTable, dispatch, run_contained};
use crate::namespace::{Definition, Entry, Namespace};
use crate::reply::Reply;
use crate::schema::{CommandOption, CommandSchema, SchemaError};

/// Failure to load a single definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The definition's schema lacks a name or description.
    #[error("Definition '{id}' is missing required field '{field}'")]
    MissingFields { id: String, field: &'static str },

    /// Constructing the definition failed.
    #[error("Failed to load definition '{id}': {reason}")]
    LoadFailure { id: String, reason: String },

    /// The schema breaks platform constraints.
    #[error("Definition '{id}' has an invalid schema: {source}")]
    InvalidSchema {
        id: String,
        #[source]
        source: SchemaError,
    },
}

impl DefinitionError {
    pub fn id(&self) -> &str {
        match self {
            DefinitionError::MissingFields { id, .. }
            | DefinitionError::LoadFailure { id, .. }
            | DefinitionError::InvalidSchema { id, .. } => id,
        }
    }

    fn from_schema(id: &str, source: SchemaError) -> Self {
        match source {
            SchemaError::MissingName => DefinitionError::MissingFields {
                id: id.to_string(),
                field: "name",
            },
            SchemaError::MissingDescription(_) => DefinitionError::MissingFields {
                id: id.to_string(),
                field: "description",
            },
            source => DefinitionError::InvalidSchema {
                id: id.to_string(),
                source,
            },
        }
    }
}

/// Structural errors that abort loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Two top-level entries resolved to the same command name.
    #[error("Duplicate command name '{0}'")]
    DuplicateCommand(String),

    /// Two entries in one group resolved to the same dispatch key.
    #[error("Duplicate subcommand '{key}' in group '{group}'")]
    DuplicateKey { group: String, key: String },

    /// A synthesized group schema is invalid.
    #[error("Invalid group '{name}': {source}")]
    InvalidGroup {
        name: String,
        #[source]
        source: SchemaError,
    },

    /// A definition failed while strict loading was enabled.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Loader behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOptions {
    /// Abort on the first definition failure instead of skipping it.
    pub strict: bool,
}

/// Summary of a load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of definitions loaded.
    pub loaded: usize,
    /// Definitions that were skipped, in discovery order.
    pub skipped: Vec<DefinitionError>,
}

/// A loaded top-level command, addressed by its own name.
#[derive(Clone)]
pub struct CommandUnit {
    id: String,
    schema: CommandSchema,
    handler: Arc<dyn Command>,
}

impl std::fmt::Debug for CommandUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandUnit")
            .field("id", &self.id)
            .field("name", &self.schema.name)
            .finish_non_exhaustive()
    }
}

impl CommandUnit {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn Command> {
        &self.handler
    }
}

/// A synthesized group with its dispatch table.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    schema: CommandSchema,
    table: DispatchTable,
}

impl CommandGroup {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Route an interaction to the selected subcommand.
    pub async fn dispatch(&self, ctx: &CommandContext) -> DispatchOutcome {
        let interaction = ctx.interaction();
        match interaction.subcommand.as_deref() {
            Some(sub) => dispatch(&self.table, interaction.group.as_deref(), sub, ctx).await,
            None => {
                warn!("No subcommand selected for group '{}'", self.name());
                if let Err(e) = ctx.reply(Reply::not_found()).await {
                    warn!("Failed to send fallback reply: {}", e);
                }
                DispatchOutcome::NotFound
            }
        }
    }
}

#[async_trait]
impl Command for CommandGroup {
    fn describe(&self) -> CommandSchema {
        self.schema.clone()
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        self.dispatch(ctx).await;
        Ok(())
    }
}

/// A top-level entry of the loaded tree.
#[derive(Debug, Clone)]
pub enum LoadedCommand {
    Unit(CommandUnit),
    Group(CommandGroup),
}

impl LoadedCommand {
    pub fn name(&self) -> &str {
        match self {
            LoadedCommand::Unit(unit) => unit.name(),
            LoadedCommand::Group(group) => group.name(),
        }
    }

    pub fn schema(&self) -> &CommandSchema {
        match self {
            LoadedCommand::Unit(unit) => unit.schema(),
            LoadedCommand::Group(group) => group.schema(),
        }
    }

    /// Route an interaction addressed to this command.
    pub async fn dispatch(&self, ctx: &CommandContext) -> DispatchOutcome {
        match self {
            LoadedCommand::Unit(unit) => {
                let key = DispatchKey::new(None, unit.name());
                run_contained(&key, unit.handler.as_ref(), ctx).await
            }
            LoadedCommand::Group(group) => group.dispatch(ctx).await,
        }
    }
}

/// The result of loading a namespace.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    commands: Vec<LoadedCommand>,
    report: LoadReport,
}

impl CommandTree {
    /// Top-level commands in discovery order.
    pub fn commands(&self) -> &[LoadedCommand] {
        &self.commands
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Schemas of all top-level commands, ready for bulk registration.
    pub fn schemas(&self) -> Vec<CommandSchema> {
        self.commands.iter().map(|c| c.schema().clone()).collect()
    }

    pub fn into_commands(self) -> Vec<LoadedCommand> {
        self.commands
    }
}

/// Loader turning a namespace into a [`CommandTree`].
#[derive(Debug, Clone, Default)]
pub struct CommandLoader {
    options: LoaderOptions,
}

impl CommandLoader {
    /// Create a lenient loader.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Load the whole tree.
    pub fn load(&self, root: &Namespace) -> Result<CommandTree, LoadError> {
        let mut report = LoadReport::default();
        let mut commands = Vec::new();
        let mut names = HashSet::new();

        for entry in root.entries() {
            let loaded = match entry {
                Entry::Definition(def) => match self.load_definition(def, &mut report)? {
                    Some(unit) => {
                        if let Err(source) = unit.schema.validate() {
                            self.skip(DefinitionError::from_schema(&unit.id, source), &mut report)?;
                            continue;
                        }
                        report.loaded += 1;
                        LoadedCommand::Unit(unit)
                    }
                    None => continue,
                },
                Entry::Namespace(ns) => match self.load_group(ns, &mut report)? {
                    Some(group) => LoadedCommand::Group(group),
                    None => continue,
                },
            };

            if !names.insert(loaded.name().to_string()) {
                return Err(LoadError::DuplicateCommand(loaded.name().to_string()));
            }
            commands.push(loaded);
        }

        info!(
            "Loaded {} commands ({} definitions, {} skipped)",
            commands.len(),
            report.loaded,
            report.skipped.len()
        );

        Ok(CommandTree { commands, report })
    }

    /// Depth 1: a group and its dispatch table.
    fn load_group(
        &self,
        ns: &Namespace,
        report: &mut LoadReport,
    ) -> Result<Option<CommandGroup>, LoadError> {
        let name = ns.name();
        let mut schema = CommandSchema::new(name, format!("Commands for {name}"));
        let mut table = DispatchTable::new();

        for entry in ns.entries() {
            match entry {
                Entry::Definition(def) => {
                    let Some(unit) = self.load_definition(def, report)? else {
                        continue;
                    };
                    let Some(option) = self.as_subcommand(&unit, report)? else {
                        continue;
                    };
                    let key = DispatchKey::new(None, unit.name());
                    insert(&mut table, name, key, unit.handler)?;
                    schema.options.push(option);
                    report.loaded += 1;
                }
                Entry::Namespace(sub) => {
                    if let Some(group) = self.load_subgroup(name, sub, &mut table, report)? {
                        schema.add_subcommand_group(group);
                    }
                }
            }
        }

        if table.is_empty() {
            warn!("Group '{}' has no loadable commands, skipping", name);
            return Ok(None);
        }

        schema
            .validate()
            .map_err(|source| LoadError::InvalidGroup {
                name: name.to_string(),
                source,
            })?;

        debug!("Loaded group '{}' with {} subcommands", name, table.len());
        Ok(Some(CommandGroup { schema, table }))
    }

    /// Depth 2: a subgroup; its handlers go into the parent's table.
    fn load_subgroup(
        &self,
        group: &str,
        ns: &Namespace,
        table: &mut DispatchTable,
        report: &mut LoadReport,
    ) -> Result<Option<CommandOption>, LoadError> {
        let name = ns.name();
        let mut option = CommandOption::subcommand_group(name, format!("{name} group"));

        for entry in ns.entries() {
            match entry {
                Entry::Definition(def) => {
                    let Some(unit) = self.load_definition(def, report)? else {
                        continue;
                    };
                    let Some(sub) = self.as_subcommand(&unit, report)? else {
                        continue;
                    };
                    let key = DispatchKey::new(Some(name), unit.name());
                    insert(table, group, key, unit.handler)?;
                    option.options.push(sub);
                    report.loaded += 1;
                }
                Entry::Namespace(nested) => {
                    warn!(
                        "Namespace '{}/{}/{}' exceeds the maximum command depth, skipping",
                        group,
                        name,
                        nested.name()
                    );
                }
            }
        }

        if option.options.is_empty() {
            warn!("Subgroup '{}/{}' has no loadable commands, skipping", group, name);
            return Ok(None);
        }
        Ok(Some(option))
    }

    /// Construct one definition, isolating its failure.
    fn load_definition(
        &self,
        def: &Definition,
        report: &mut LoadReport,
    ) -> Result<Option<CommandUnit>, LoadError> {
        match construct(def) {
            Ok(unit) => {
                debug!("Loaded: {}", def.id());
                Ok(Some(unit))
            }
            Err(e) => {
                self.skip(e, report)?;
                Ok(None)
            }
        }
    }

    /// Convert a unit into a subcommand option, isolating schema failures.
    fn as_subcommand(
        &self,
        unit: &CommandUnit,
        report: &mut LoadReport,
    ) -> Result<Option<CommandOption>, LoadError> {
        let converted = unit.schema.validate().and_then(|()| unit.schema.clone().into_subcommand());
        match converted {
            Ok(option) => Ok(Some(option)),
            Err(source) => {
                self.skip(DefinitionError::from_schema(&unit.id, source), report)?;
                Ok(None)
            }
        }
    }

    fn skip(&self, err: DefinitionError, report: &mut LoadReport) -> Result<(), LoadError> {
        if self.options.strict {
            error!("{}", err);
            return Err(err.into());
        }
        match &err {
            DefinitionError::LoadFailure { .. } => error!("{}", err),
            _ => warn!("{}", err),
        }
        report.skipped.push(err);
        Ok(())
    }
}

fn construct(def: &Definition) -> Result<CommandUnit, DefinitionError> {
    let built = std::panic::catch_unwind(AssertUnwindSafe(|| {
        def.construct().map(|handler| (handler.describe(), handler))
    }));

    let (schema, handler) = match built {
        Ok(Ok(built)) => built,
        Ok(Err(e)) => {
            return Err(DefinitionError::LoadFailure {
                id: def.id().to_string(),
                reason: e.to_string(),
            });
        }
        Err(_) => {
            return Err(DefinitionError::LoadFailure {
                id: def.id().to_string(),
                reason: "constructor panicked".to_string(),
            });
        }
    };

    if schema.name.is_empty() {
        return Err(DefinitionError::MissingFields {
            id: def.id().to_string(),
            field: "name",
        });
    }
    if schema.description.trim().is_empty() {
        return Err(DefinitionError::MissingFields {
            id: def.id().to_string(),
            field: "description",
        });
    }

    Ok(CommandUnit {
        id: def.id().to_string(),
        schema,
        handler,
    })
}

fn insert(
    table: &mut DispatchTable,
    group: &str,
    key: DispatchKey,
    handler: Arc<dyn Command>,
) -> Result<(), LoadError> {
    let rendered = key.to_string();
    if !table.insert(key, handler) {
        return Err(LoadError::DuplicateKey {
            group: group.to_string(),
            key: rendered,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ResolvedInteraction;
    use crate::reply::CollectingResponder;

    struct Named {
        name: &'static str,
        description: &'static str,
    }

    impl Named {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                description: "A command",
            }
        }
    }

    #[async_trait]
    impl Command for Named {
        fn describe(&self) -> CommandSchema {
            CommandSchema::new(self.name, self.description)
        }

        async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
            ctx.reply(Reply::text(self.name)).await
        }
    }

    struct Nested;

    #[async_trait]
    impl Command for Nested {
        fn describe(&self) -> CommandSchema {
            let mut schema = CommandSchema::new("profiles", "Profiles");
            schema
                .add_subcommand(CommandSchema::new("shs", "SHS").with_option(CommandOption::string("type", "Type")))
                .unwrap();
            schema
        }

        async fn invoke(&self, _ctx: &CommandContext) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn sample() -> Namespace {
        Namespace::root()
            .command("root", || Ok(Named::new("root")))
            .namespace(
                Namespace::new("alpha")
                    .command("a", || Ok(Named::new("a")))
                    .command("b", || Ok(Named::new("b"))),
            )
            .namespace(
                Namespace::new("beta").namespace(Namespace::new("sub").command("c", || Ok(Named::new("c")))),
            )
    }

    fn group<'a>(tree: &'a CommandTree, name: &str) -> &'a CommandGroup {
        tree.commands()
            .iter()
            .find_map(|c| match c {
                LoadedCommand::Group(g) if g.name() == name => Some(g),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_three_level_tables() {
        let tree = CommandLoader::new().load(&sample()).unwrap();

        let names: Vec<_> = tree.commands().iter().map(LoadedCommand::name).collect();
        assert_eq!(names, vec!["root", "alpha", "beta"]);
        assert!(matches!(tree.commands()[0], LoadedCommand::Unit(_)));

        let alpha = group(&tree, "alpha");
        let keys: Vec<_> = alpha.table().keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        let beta = group(&tree, "beta");
        let keys: Vec<_> = beta.table().keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["sub/c"]);

        assert_eq!(tree.report().loaded, 4);
        assert!(tree.report().skipped.is_empty());
    }

    #[test]
    fn test_synthesized_schema() {
        let tree = CommandLoader::new().load(&sample()).unwrap();
        let schemas = tree.schemas();

        assert_eq!(schemas[1].description, "Commands for alpha");
        let subs: Vec<_> = schemas[1].options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(subs, vec!["a", "b"]);

        let sub = &schemas[2].options[0];
        assert_eq!(sub.kind, crate::schema::OptionKind::SubcommandGroup);
        assert_eq!(sub.description, "sub group");
        assert_eq!(sub.options[0].name, "c");
    }

    #[test]
    fn test_failing_definition_is_isolated() {
        let ns = Namespace::root().namespace(
            Namespace::new("alpha")
                .command("broken", || -> Result<Named, crate::BoxError> { Err("malformed".into()) })
                .command("panics", || -> Result<Named, crate::BoxError> { panic!("bad definition") })
                .command("ok", || Ok(Named::new("ok"))),
        );

        let tree = CommandLoader::new().load(&ns).unwrap();
        let alpha = group(&tree, "alpha");
        assert_eq!(alpha.table().len(), 1);
        assert!(alpha.table().contains(&DispatchKey::new(None, "ok")));

        let skipped = &tree.report().skipped;
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].id(), "alpha/broken");
        assert!(matches!(skipped[1], DefinitionError::LoadFailure { .. }));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let ns = Namespace::root()
            .command("nameless", || Ok(Named::new("")))
            .command("undescribed", || {
                Ok(Named {
                    name: "undescribed",
                    description: "",
                })
            })
            .command("help", || Ok(Named::new("help")));

        let tree = CommandLoader::new().load(&ns).unwrap();
        assert_eq!(tree.commands().len(), 1);
        assert_eq!(
            tree.report().skipped,
            vec![
                DefinitionError::MissingFields {
                    id: "nameless".to_string(),
                    field: "name"
                },
                DefinitionError::MissingFields {
                    id: "undescribed".to_string(),
                    field: "description"
                },
            ]
        );
    }

    #[test]
    fn test_strict_mode_aborts() {
        let ns = Namespace::root()
            .command("broken", || -> Result<Named, crate::BoxError> { Err("malformed".into()) })
            .command("help", || Ok(Named::new("help")));

        let loader = CommandLoader::with_options(LoaderOptions { strict: true });
        let err = loader.load(&ns).unwrap_err();
        assert!(matches!(err, LoadError::Definition(DefinitionError::LoadFailure { .. })));
    }

    #[test]
    fn test_strict_mode_aborts_on_panic() {
        let ns = Namespace::root()
            .command("help", || Ok(Named::new("help")))
            .command("panics", || -> Result<Named, crate::BoxError> { panic!("bad definition") });

        let loader = CommandLoader::with_options(LoaderOptions { strict: true });
        let err = loader.load(&ns).unwrap_err();
        assert!(matches!(
            &err,
            LoadError::Definition(DefinitionError::LoadFailure { id, reason })
                if id == "panics" && reason == "constructor panicked"
        ));
    }

    #[test]
    fn test_strict_mode_aborts_on_missing_fields() {
        let ns = Namespace::root()
            .command("help", || Ok(Named::new("help")))
            .command("undescribed", || {
                Ok(Named {
                    name: "undescribed",
                    description: " ",
                })
            });

        let loader = CommandLoader::with_options(LoaderOptions { strict: true });
        let err = loader.load(&ns).unwrap_err();
        assert!(matches!(
            &err,
            LoadError::Definition(DefinitionError::MissingFields { id, field: "description" })
                if id == "undescribed"
        ));
    }

    #[test]
    fn test_strict_mode_aborts_on_invalid_schema() {
        let ns = Namespace::root().namespace(
            Namespace::new("utility")
                .command("calculate", || Ok(Named::new("calculate")))
                .command("profiles", || Ok(Nested)),
        );

        let loader = CommandLoader::with_options(LoaderOptions { strict: true });
        let err = loader.load(&ns).unwrap_err();
        assert!(matches!(
            &err,
            LoadError::Definition(DefinitionError::InvalidSchema {
                id,
                source: SchemaError::NotALeaf(_),
            }) if id == "utility/profiles"
        ));
    }

    #[test]
    fn test_nested_command_inside_group_is_skipped() {
        let ns = Namespace::root().namespace(
            Namespace::new("utility")
                .command("profiles", || Ok(Nested))
                .command("calculate", || Ok(Named::new("calculate"))),
        );

        let tree = CommandLoader::new().load(&ns).unwrap();
        let utility = group(&tree, "utility");
        assert_eq!(utility.table().len(), 1);
        assert_eq!(tree.report().loaded, 1);
        assert!(matches!(
            tree.report().skipped[0],
            DefinitionError::InvalidSchema { source: SchemaError::NotALeaf(_), .. }
        ));
    }

    #[test]
    fn test_nested_command_at_root_is_kept() {
        let ns = Namespace::root().command("profiles", || Ok(Nested));
        let tree = CommandLoader::new().load(&ns).unwrap();
        assert_eq!(tree.commands().len(), 1);
        assert_eq!(tree.schemas()[0].options[0].name, "shs");
    }

    #[test]
    fn test_too_deep_and_empty_namespaces_are_dropped() {
        let ns = Namespace::root()
            .namespace(Namespace::new("empty"))
            .namespace(
                Namespace::new("alpha").command("a", || Ok(Named::new("a"))).namespace(
                    Namespace::new("sub").namespace(Namespace::new("deep").command("x", || Ok(Named::new("x")))),
                ),
            );

        let tree = CommandLoader::new().load(&ns).unwrap();
        let names: Vec<_> = tree.commands().iter().map(LoadedCommand::name).collect();
        assert_eq!(names, vec!["alpha"]);
        // "sub" only held a too-deep namespace
        assert_eq!(tree.schemas()[0].options.len(), 1);
    }

    #[test]
    fn test_duplicates_abort() {
        let ns = Namespace::root()
            .command("one", || Ok(Named::new("help")))
            .command("two", || Ok(Named::new("help")));
        assert!(matches!(
            CommandLoader::new().load(&ns),
            Err(LoadError::DuplicateCommand(name)) if name == "help"
        ));

        let ns = Namespace::root().namespace(
            Namespace::new("alpha")
                .command("one", || Ok(Named::new("a")))
                .command("two", || Ok(Named::new("a"))),
        );
        assert!(matches!(
            CommandLoader::new().load(&ns),
            Err(LoadError::DuplicateKey { key, .. }) if key == "a"
        ));
    }

    #[tokio::test]
    async fn test_group_dispatch_routes_by_path() {
        let tree = CommandLoader::new().load(&sample()).unwrap();
        let responder = Arc::new(CollectingResponder::new());

        let beta = group(&tree, "beta");
        let ctx = CommandContext::new(
            ResolvedInteraction::new("beta").with_group("sub").with_subcommand("c"),
            responder.clone(),
        );
        assert_eq!(beta.dispatch(&ctx).await, DispatchOutcome::Handled);

        let ctx = CommandContext::new(ResolvedInteraction::new("beta"), responder.clone());
        assert_eq!(beta.dispatch(&ctx).await, DispatchOutcome::NotFound);

        assert_eq!(
            responder.replies().await,
            vec![Reply::text("c"), Reply::not_found()]
        );
    }
}
