//! `/chart`

use async_trait::async_trait;

use integral_algebra::TypeSymbol;
use integral_commands::{Command, CommandContext, CommandSchema, Embed, HandlerError, Reply};

use super::EMBED_COLOR;

/// Attachment the chart image is delivered as.
pub const CHART_ATTACHMENT: &str = "attachment://chart.png";

pub struct ChartCommand;

impl ChartCommand {
    /// One line per type: the relationship a partner of that integral type
    /// has with the identity.
    fn legend() -> String {
        TypeSymbol::ALL
            .iter()
            .map(|t| format!("**{}** - {}", t, t.relationship()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Command for ChartCommand {
    fn describe(&self) -> CommandSchema {
        CommandSchema::new("chart", "Prints a chart of intertype relationships.")
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        let embed = Embed::new()
            .color(EMBED_COLOR)
            .title("SHS intertype relationship chart")
            .field(":left_right_arrow: Types of relationships", Self::legend())
            .image(CHART_ATTACHMENT);

        ctx.reply(Reply::embed(embed)).await
    }
}
