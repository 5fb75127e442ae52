use super::*;
use crate::commands::music::utils::music_manager::{MusicError, is_link};

/// Add a track to a playlist from a link or a search
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    let author = ctx.author().id;
    let locale = guild_locale(ctx);

    let playlist = match find_playlist(ctx, &id) {
        Ok(playlist) => playlist,
        Err(err) => return reply_error(ctx, err).await,
    };
    if let Err(err) = playlist.ensure_contributor(author) {
        return reply_error(ctx, err).await;
    }

    // yt-dlp easily outlasts the interaction deadline
    ctx.defer_ephemeral().await?;

    let results = match ctx.data().players.search(&query).await {
        Ok(results) => results,
        Err(err) => return reply_error(ctx, err.into()).await,
    };

    if results.len() > 1 && !is_link(&query) {
        let view = playlist_views::track_choices(&playlist, &query, &results, locale);
        ctx.send(view.into_reply()).await?;
        return Ok(());
    }

    let Some(track) = results.into_iter().next() else {
        return reply_error(ctx, MusicError::NoResults.into()).await;
    };
    let title = track.title.clone();
    match ctx.data().bot_data.add_track(&playlist.id, author, track) {
        Ok(_) => reply_text(ctx, locale.format(Text::TrackAdded, title)).await,
        Err(err) => reply_error(ctx, err).await,
    }
}

/// Remove a track from a playlist you own
#[poise::command(
    slash_command,
    guild_only,
    category = "Playlist",
    rename = "removetrack"
)]
pub async fn remove_track(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "Position of the track, starting at 1"]
    #[min = 1]
    position: usize,
) -> CommandResult {
    let index = position.saturating_sub(1);
    match ctx
        .data()
        .bot_data
        .remove_track(id.trim(), ctx.author().id, index)
    {
        Ok(track) => {
            let message = guild_locale(ctx).format(Text::TrackRemoved, track.title);
            reply_text(ctx, message).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}
