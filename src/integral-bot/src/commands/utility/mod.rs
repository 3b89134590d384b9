//! `/utility` group.

pub mod calculate;

use integral_commands::Namespace;

use super::CommandSettings;

pub fn namespace(settings: CommandSettings) -> Namespace {
    Namespace::new("utility").command("calculate", move || {
        Ok(calculate::CalculateCommand::new(settings.max_types))
    })
}
