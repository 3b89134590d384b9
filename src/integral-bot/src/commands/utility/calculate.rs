//! `/utility calculate types:<list>`
//!
//! Plain-text counterpart of `/integral calculate`.

use async_trait::async_trait;

use integral_algebra::{combine, parse_types};
use integral_commands::{Command, CommandContext, CommandSchema, HandlerError, Reply};

use crate::commands::types_option;

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

        let reply = match parse_types(input, self.max_types) {
            Ok(types) => Reply::text(format!("The integral type is: {}", combine(&types))),
            Err(e) => Reply::text(format!(
                "{}. Usage example: `/utility calculate types: LSI EIE LIE` (up to {} types)",
                e, self.max_types
            ))
            .ephemeral(),
        };

        ctx.reply(reply).await
    }
}
