use super::*;

/// Queue every track of a playlist
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "Play the tracks in random order"] shuffle: Option<bool>,
) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    ctx.defer_ephemeral().await?;

    let queued = queue_playlist(
        ctx.serenity_context(),
        ctx.data(),
        guild_id,
        ctx.author().id,
        id.trim(),
        shuffle.unwrap_or(false),
    )
    .await;

    match queued {
        Ok(count) => reply_text(ctx, guild_locale(ctx).format(Text::PlaylistQueued, count)).await,
        Err(err) => reply_error(ctx, err).await,
    }
}
