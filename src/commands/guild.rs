use crate::utils::locale::{Locale, Text};
use crate::{CommandResult, Context};
use tracing::info;

/// Guild settings
#[poise::command(
    slash_command,
    guild_only,
    category = "Guild",
    subcommand_required,
    subcommands("locale"),
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn guild(_ctx: Context<'_>) -> CommandResult {
    Ok(())
}

/// Set the language the bot answers in
#[poise::command(slash_command, guild_only, category = "Guild")]
pub async fn locale(
    ctx: Context<'_>,
    #[description = "Language to use in this server"] locale: Locale,
) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    ctx.data().bot_data.set_locale(guild_id, locale)?;
    info!(
        "{} changed the locale of guild {} to {}",
        ctx.author().name,
        guild_id,
        locale.code()
    );

    ctx.say(locale.text(Text::LocaleSet)).await?;
    // Open panels pick up the new labels right away
    ctx.data().sync.request_refresh(guild_id);
    Ok(())
}
