//! `/integral combinations` subgroup.

pub mod get;
pub mod subset;

use integral_commands::Namespace;

use crate::commands::CommandSettings;

pub fn namespace(settings: CommandSettings) -> Namespace {
    Namespace::new("combinations")
        .command("get", move || Ok(get::GetCommand::new(settings.page_size)))
        .command("subset", move || Ok(subset::SubsetCommand::new(settings)))
}
