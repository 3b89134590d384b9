//! `/integral` group.

pub mod calculate;
pub mod combinations;

use integral_commands::Namespace;

use super::CommandSettings;

pub fn namespace(settings: CommandSettings) -> Namespace {
    Namespace::new("integral")
        .command("calculate", move || {
            Ok(calculate::CalculateCommand::new(settings.max_types))
        })
        .namespace(combinations::namespace(settings))
}
