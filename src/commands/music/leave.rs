use super::*;

/// Leave the voice channel
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        ctx.data().players.leave(guild_id).await?;
        Ok(locale.text(Text::Left).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
