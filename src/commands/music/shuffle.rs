use super::*;

/// Shuffle the upcoming tracks
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        ctx.data().players.shuffle(guild_id).await?;
        Ok(locale.text(Text::Shuffled).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
