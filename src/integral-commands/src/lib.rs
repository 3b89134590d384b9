//! Slash command framework for the Integral bot.
//!
//! Commands are declared in a static [`Namespace`] tree at most three levels
//! deep:
//!
//! ```text
//! root
//! ├── help                     top-level command
//! └── integral/                group
//!     ├── calculate            subcommand, key "calculate"
//!     └── combinations/        subgroup
//!         └── get              subcommand, key "combinations/get"
//! ```
//!
//! The [`CommandLoader`] walks the tree once at startup, synthesizing group
//! and subgroup schemas and building one [`DispatchTable`] per group. A
//! broken definition is logged and skipped so its siblings still load.
//! The resulting [`CommandRegistry`] is immutable and can be shared across
//! concurrent requests without locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use integral_commands::{CommandLoader, CommandRegistry, Namespace};
//!
//! let namespace = Namespace::root()
//!     .command("help", || Ok(HelpCommand))
//!     .namespace(Namespace::new("integral").command("calculate", || Ok(CalculateCommand)));
//!
//! let registry = CommandRegistry::load(&namespace, &CommandLoader::new())?;
//! let payload = serde_json::to_string(&registry.schemas())?;
//! registry.dispatch(&ctx).await;
//! ```

mod command;
mod dispatch;
mod interaction;
mod loader;
mod namespace;
mod registry;
mod reply;
mod schema;

pub use command::{Command, CommandContext, HandlerError};
pub use dispatch::{DispatchKey, DispatchOutcome, DispatchTable, dispatch, run_contained};
pub use interaction::{
    ApplicationCommandData, InteractionOption, InteractionPayload, OptionValue,
    ResolvedInteraction,
};
pub use loader::{
    CommandGroup, CommandLoader, CommandTree, CommandUnit, DefinitionError, LoadError, LoadReport,
    LoadedCommand, LoaderOptions,
};
pub use namespace::{BoxError, Definition, Entry, Namespace};
pub use registry::CommandRegistry;
pub use reply::{CollectingResponder, Embed, EmbedField, Reply, ReplyError, Responder};
pub use schema::{CommandOption, CommandSchema, OptionChoice, OptionKind, SchemaError};
