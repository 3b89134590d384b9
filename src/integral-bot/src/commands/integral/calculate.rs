//! `/integral calculate types:<list>`

use async_trait::async_trait;
use tracing::debug;

use integral_algebra::{combine, parse_types};
use integral_commands::{Command, CommandContext, CommandSchema, Embed, HandlerError, Reply};

use crate::commands::{EMBED_COLOR, types_option, wrong_format};

const USAGE: &str = "/integral calculate types: LSI EIE LIE";

/// Combines the provided types into their integral type.
pub struct CalculateCommand {
    max_types: usize,
}

impl CalculateCommand {
    pub fn new(max_types: usize) -> Self {
        Self { max_types }
    }
}

#[async_trait]
impl Command for CalculateCommand {
    fn describe(&self) -> CommandSchema {
        CommandSchema::new(
            "calculate",
            "Calculates intertype relationship of provided types.",
        )
        .with_option(types_option())
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        let input = ctx.required_string("types")?;

        let types = match parse_types(input, self.max_types) {
            Ok(types) => types,
            Err(e) => {
                debug!("Rejected input {:?}: {}", input, e);
                return ctx.reply(wrong_format(input, USAGE, self.max_types)).await;
            }
        };

        let result = combine(&types);
        let listed = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let embed = Embed::new()
            .color(EMBED_COLOR)
            .title(result.as_str())
            .description(listed)
            .field("Relationship", result.relationship().name());

        ctx.reply(Reply::embed(embed)).await
    }
}
