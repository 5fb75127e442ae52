use super::*;
use tracing::info;
use utils::music_manager::is_link;

/// Play a track from a link, or search for one
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let locale = guild_locale(ctx);
    let guild_id = match guild_id(ctx) {
        Ok(guild_id) => guild_id,
        Err(err) => return reply_error(ctx, err).await,
    };

    let user_channel = author_voice_channel(ctx, guild_id);
    if user_channel.is_none() {
        return reply_error(ctx, MusicError::UserNotInVoiceChannel).await;
    }

    // Resolving tracks runs yt-dlp, which easily outlasts the interaction deadline
    ctx.defer().await?;

    let players = &ctx.data().players;
    let results = match players.search(&query).await {
        Ok(results) => results,
        Err(err) => return reply_error(ctx, err).await,
    };

    if !is_link(&query) {
        ctx.send(embedded_messages::search_results(&query, &results))
            .await?;
        return Ok(());
    }

    let Some(track) = results.into_iter().next() else {
        return reply_error(ctx, MusicError::NoResults).await;
    };

    match players.play(guild_id, user_channel, track.clone()).await {
        Ok(position) => {
            ctx.send(CreateReply::default().embed(embedded_messages::added_to_queue(
                &track, position, locale,
            )))
            .await?;
            ctx.data().sync.request_refresh(guild_id);
            Ok(())
        }
        Err(err) => reply_error(ctx, err).await,
    }
}
