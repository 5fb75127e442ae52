use super::*;

/// Show the upcoming tracks
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let guild_id = match guild_id(ctx) {
        Ok(guild_id) => guild_id,
        Err(err) => return reply_error(ctx, err).await,
    };

    match ctx.data().players.queue_view(guild_id).await {
        Ok(view) => {
            ctx.send(
                CreateReply::default()
                    .embed(embedded_messages::music_queue(&view, locale))
                    .ephemeral(true),
            )
            .await?;
            Ok(())
        }
        Err(err) => reply_error(ctx, err).await,
    }
}
