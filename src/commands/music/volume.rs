use super::*;

/// Set the player volume
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume in percent"]
    #[min = 0]
    #[max = 150]
    percent: u32,
) -> CommandResult {
    let locale = guild_locale(ctx);
    let outcome: MusicResult<String> = async {
        let guild_id = listener_guild(ctx).await?;
        let volume = ctx
            .data()
            .players
            .set_volume(guild_id, percent as f32 / 100.0)
            .await?;
        Ok(locale.format(Text::VolumeSet, (volume * 100.0).round() as u32))
    }
    .await;

    reply_outcome(ctx, outcome).await
}
