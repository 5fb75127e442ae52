use super::*;

/// Loop the current track, or stop looping it
#[poise::command(slash_command, guild_only, category = "Music", rename = "loop")]
pub async fn toggle_loop(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        let looping = ctx.data().players.toggle_loop(guild_id).await?;
        let text = if looping { Text::Looped } else { Text::Unlooped };
        Ok(locale.text(text).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
