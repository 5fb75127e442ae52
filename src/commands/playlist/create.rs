use super::*;

/// Create a new playlist
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn create(
    ctx: Context<'_>,
    #[description = "Name of the playlist"]
    #[max_length = 100]
    name: String,
) -> CommandResult {
    let author = ctx.author().id;
    match ctx.data().bot_data.create_playlist(author, &name) {
        Ok(playlist) => {
            reply_view(ctx, playlist_views::details(&playlist, author, 0, guild_locale(ctx))).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}
