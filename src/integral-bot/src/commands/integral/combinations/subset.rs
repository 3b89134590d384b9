//! `/integral combinations subset types:<list> target:<type>`

use async_trait::async_trait;
use tracing::debug;

use integral_algebra::{Subset, TypeSymbol, format_subsets, parse_types};
use integral_commands::{Command, CommandContext, CommandSchema, Embed, HandlerError, Reply};

use crate::commands::{
    CommandSettings, EMBED_COLOR, paginate, search, target, target_option, types_option,
    wrong_format,
};

const USAGE: &str = "/integral combinations subset types: LII LII IEI SLE LIE ILE target: ILE";

/// Lists the subsets of the provided types that combine into the target.
pub struct SubsetCommand {
    settings: CommandSettings,
}

impl SubsetCommand {
    pub fn new(settings: CommandSettings) -> Self {
        Self { settings }
    }

    fn render(&self, types: &[TypeSymbol], target: TypeSymbol, subsets: &[Subset]) -> Embed {
        let embed = Embed::new()
            .color(EMBED_COLOR)
            .title(format!("Subsets resulting in {}", target));

        if subsets.is_empty() {
            let listed = types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return embed.description(format!(
                "No subsets of {} result in **{}**.",
                listed, target
            ));
        }

        let pages = paginate(&format_subsets(subsets), self.settings.page_size);
        let plural = if subsets.len() == 1 { "" } else { "s" };
        let first = pages.first().map(String::as_str).unwrap_or_default();

        embed
            .description(format!(
                "Found **{}** subset{}.\n{}",
                subsets.len(),
                plural,
                first
            ))
            .footer(format!("Page 1/{}", pages.len()))
    }
}

#[async_trait]
impl Command for SubsetCommand {
    fn describe(&self) -> CommandSchema {
        CommandSchema::new(
            "subset",
            "Finds all unique subsets of provided types that result in the target integral type.",
        )
        .with_option(types_option())
        .with_option(target_option())
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        let target = target(ctx)?;
        let input = ctx.required_string("types")?;

        let types = match parse_types(input, self.settings.max_types) {
            Ok(types) => types,
            Err(e) => {
                debug!("Rejected input {:?}: {}", input, e);
                let reply = wrong_format(input, USAGE, self.settings.max_types);
                return ctx.reply(reply).await;
            }
        };

        let subsets = search(types.clone(), target).await?;
        ctx.reply(Reply::embed(self.render(&types, target, &subsets))).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::commands::test_support::run;
    use integral_commands::ResolvedInteraction;

    fn command(page_size: usize) -> SubsetCommand {
        SubsetCommand::new(CommandSettings {
            max_types: 10,
            page_size,
        })
    }

    fn request(types: &str, target: &str) -> ResolvedInteraction {
        ResolvedInteraction::new("integral")
            .with_group("combinations")
            .with_subcommand("subset")
            .with_option("types", types)
            .with_option("target", target)
    }

    #[tokio::test]
    async fn test_single_page() {
        let replies = run(&command(10), request("ILE LIE IEE", "EIE")).await.unwrap();
        let embed = &replies[0].embeds[0];

        assert_eq!(embed.title.as_deref(), Some("Subsets resulting in EIE"));
        assert_eq!(
            embed.description.as_deref(),
            Some("Found **2** subsets.\n#1: LIE, IEE\n#2: ILE, LIE, IEE")
        );
        assert_eq!(embed.footer.as_deref(), Some("Page 1/1"));
    }

    #[tokio::test]
    async fn test_pages_and_singular() {
        let replies = run(&command(1), request("ILE LIE IEE", "EIE")).await.unwrap();
        let embed = &replies[0].embeds[0];
        assert_eq!(
            embed.description.as_deref(),
            Some("Found **2** subsets.\n#1: LIE, IEE")
        );
        assert_eq!(embed.footer.as_deref(), Some("Page 1/2"));

        let replies = run(&command(10), request("LIE", "LIE")).await.unwrap();
        assert_eq!(
            replies[0].embeds[0].description.as_deref(),
            Some("Found **1** subset.\n#1: LIE")
        );
    }

    #[tokio::test]
    async fn test_no_match() {
        let replies = run(&command(10), request("LIE LIE", "SEE")).await.unwrap();
        let embed = &replies[0].embeds[0];
        assert_eq!(
            embed.description.as_deref(),
            Some("No subsets of LIE, LIE result in **SEE**.")
        );
        assert_eq!(embed.footer, None);
    }

    #[tokio::test]
    async fn test_over_limit_gets_usage() {
        let types = vec!["ILE"; 11].join(" ");
        let replies = run(&command(10), request(&types, "ILE")).await.unwrap();
        assert!(replies[0].ephemeral);
        assert_eq!(
            replies[0].embeds[0].fields[1].value,
            "The number of types to process is limited to 10."
        );
    }

    #[tokio::test]
    async fn test_large_search_leaves_runtime_responsive() {
        let command = SubsetCommand::new(CommandSettings {
            max_types: 20,
            page_size: 10,
        });
        let types = vec!["ILE"; 20].join(" ");

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    ticks.fetch_add(1, Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            }
        });

        let replies = run(&command, request(&types, "ILE")).await.unwrap();
        let during = ticks.load(Ordering::Relaxed);
        ticker.abort();

        assert!(during > 0, "runtime was blocked for the whole search");
        assert!(
            replies[0].embeds[0]
                .description
                .as_deref()
                .unwrap()
                .starts_with("Found **20** subsets.\n#1: ILE\n")
        );
    }
}
