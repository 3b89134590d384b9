//! `/help`

use async_trait::async_trait;

use integral_commands::{Command, CommandContext, CommandSchema, Embed, HandlerError, Reply};

use super::EMBED_COLOR;

const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Displays the list of available commands."),
    ("/chart", "Prints a chart of intertype relationships."),
    (
        "/integral calculate",
        "Calculates intertype relationship of provided types.",
    ),
    (
        "/integral combinations get",
        "Finds all unique subsets of types that combine into the target integral type.",
    ),
    (
        "/integral combinations subset",
        "Finds all unique subsets of the provided types that combine into the target integral type.",
    ),
    (
        "/utility calculate",
        "Prints the integral type of provided types as plain text.",
    ),
];

const THEORY: &[(&str, &str)] = &[
    (
        "Internal relations in a group as a reflection of its integral type - Varlawend's Blog",
        "https://varlawend.blogspot.com/2018/12/introverted-socionics.html",
    ),
    (
        "Intertype relations - Wikisocion",
        "https://wikisocion.github.io/content/intertype.html",
    ),
];

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn describe(&self) -> CommandSchema {
        CommandSchema::new("help", "Displays the list of available commands.")
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        let commands = COMMANDS
            .iter()
            .map(|(path, about)| format!("`{}` - {}", path, about))
            .collect::<Vec<_>>()
            .join("\n");
        let theory = THEORY
            .iter()
            .map(|(title, url)| format!("[{}]({})", title, url))
            .collect::<Vec<_>>()
            .join("\n");

        let embed = Embed::new()
            .color(EMBED_COLOR)
            .title("Help")
            .field(":computer: Commands", commands)
            .field(":memo: Theory", theory);

        ctx.reply(Reply::embed(embed).ephemeral()).await
    }
}
