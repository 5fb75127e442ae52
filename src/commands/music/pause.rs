use super::*;
use tracing::info;

/// Pause or resume the current track
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn togglepause(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        let playing = ctx.data().players.toggle_pause(guild_id).await?;
        info!("Playback in guild {} now playing: {}", guild_id, playing);
        let text = if playing { Text::Resumed } else { Text::Paused };
        Ok(locale.text(text).to_string())
    }
    .await;

    reply_outcome(ctx, outcome).await
}
