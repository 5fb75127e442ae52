use super::*;
use utils::playlist_views::Listing;

/// Zero-based page from the one-based number users type.
fn page_index(page: Option<usize>) -> usize {
    page.unwrap_or(1).saturating_sub(1)
}

/// List playlists
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Only your own playlists (default: yes)"] mine: Option<bool>,
    #[description = "Page number, starting at 1"]
    #[min = 1]
    page: Option<usize>,
) -> CommandResult {
    let mine = mine.unwrap_or(true);
    let owner = mine.then(|| ctx.author().id);
    let playlists = ctx.data().bot_data.playlists(owner);

    let view = playlist_views::listing(
        &playlists,
        &Listing::from_scope(mine),
        page_index(page),
        guild_locale(ctx),
    );
    reply_view(ctx, view).await
}

/// Search playlists by name
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Name to look for"] query: String,
    #[description = "Only your own playlists (default: no)"] mine: Option<bool>,
) -> CommandResult {
    let mine = mine.unwrap_or(false);
    let owner = mine.then(|| ctx.author().id);
    let playlists = ctx.data().bot_data.search_playlists(&query, owner);

    let listing = Listing::Search { query, mine };
    let view = playlist_views::listing(&playlists, &listing, 0, guild_locale(ctx));
    reply_view(ctx, view).await
}

/// Show a playlist and its tracks
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn show(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "Page number, starting at 1"]
    #[min = 1]
    page: Option<usize>,
) -> CommandResult {
    let playlist = match find_playlist(ctx, &id) {
        Ok(playlist) => playlist,
        Err(err) => return reply_error(ctx, err).await,
    };

    let view = playlist_views::details(
        &playlist,
        ctx.author().id,
        page_index(page),
        guild_locale(ctx),
    );
    reply_view(ctx, view).await
}
