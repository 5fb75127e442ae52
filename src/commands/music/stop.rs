use super::*;

/// Stop the music and clear the queue
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        ctx.data().players.stop(guild_id).await?;
        Ok(locale.text(Text::Stopped).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
