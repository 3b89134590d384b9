//! `/integral combinations get target:<type>`

use async_trait::async_trait;

use integral_algebra::{TypeSymbol, format_subsets};
use integral_commands::{Command, CommandContext, CommandSchema, Embed, HandlerError, Reply};

use crate::commands::{EMBED_COLOR, paginate, search, target, target_option};

/// Lists the subsets of all sixteen types that combine into the target.
pub struct GetCommand {
    page_size: usize,
}

impl GetCommand {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }
}

#[async_trait]
impl Command for GetCommand {
    fn describe(&self) -> CommandSchema {
        CommandSchema::new(
            "get",
            "Finds all unique subsets that result in the target integral type.",
        )
        .with_option(target_option())
    }

    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError> {
        let target = target(ctx)?;

        let subsets = search(TypeSymbol::ALL.to_vec(), target).await?;

        let pages = paginate(&format_subsets(&subsets), self.page_size);
        let mut embed = Embed::new()
            .color(EMBED_COLOR)
            .title(format!(
                "Found {} subsets that result in **{}**",
                subsets.len(),
                target
            ))
            .description(pages.first().cloned().unwrap_or_default());
        if pages.len() > 1 {
            embed = embed.footer(format!("Page 1/{}", pages.len()));
        }

        ctx.reply(Reply::embed(embed)).await
    }
}
