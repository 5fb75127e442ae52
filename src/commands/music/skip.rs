use super::*;

/// Skip the currently playing track
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        ctx.data().players.skip(guild_id).await?;
        Ok(locale.text(Text::Skipped).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
