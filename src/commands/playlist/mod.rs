pub(crate) mod browse;
pub(crate) mod create;
pub(crate) mod manage;
pub(crate) mod play;
pub(crate) mod tracks;

pub mod utils;

use crate::commands::music::utils::embedded_messages;
use crate::commands::music::utils::music_manager::MusicManager;
use crate::commands::music::utils::track_metadata::TrackMetadata;
use crate::utils::locale::{Locale, Text};
use crate::utils::playlist::{Playlist, PlaylistError};
use crate::{CommandResult, Context, Data};
use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;
use serenity::model::id::{GuildId, UserId};
use tracing::{error, info};
use utils::playlist_views::{self, ViewResult};

use browse::{list, search, show};
use create::create;
use manage::{contributor, delete, rename};
use play::play;
use tracks::{add, remove_track};

/// Playlists shared between every server the bot is in
#[poise::command(
    slash_command,
    guild_only,
    category = "Playlist",
    subcommand_required,
    subcommands(
        "create",
        "list",
        "search",
        "show",
        "add",
        "remove_track",
        "play",
        "rename",
        "contributor",
        "delete"
    )
)]
pub async fn playlist(_ctx: Context<'_>) -> CommandResult {
    Ok(())
}

fn guild_locale(ctx: Context<'_>) -> Locale {
    ctx.guild_id()
        .map(|guild_id| ctx.data().bot_data.locale(guild_id))
        .unwrap_or_default()
}

/// The localized text for a failed playlist action. Failures that are not
/// the user's doing are logged.
pub fn error_text(err: &PlaylistError) -> Text {
    match err.user_text() {
        Some(text) => text,
        None => {
            error!("Playlist action failed: {}", err);
            Text::SomethingWentWrong
        }
    }
}

async fn reply_error(ctx: Context<'_>, err: PlaylistError) -> CommandResult {
    let text = guild_locale(ctx).text(error_text(&err));
    ctx.send(embedded_messages::error_reply(text)).await?;
    Ok(())
}

async fn reply_text(ctx: Context<'_>, message: impl Into<String>) -> CommandResult {
    ctx.send(embedded_messages::ephemeral(message)).await?;
    Ok(())
}

async fn reply_view(ctx: Context<'_>, view: ViewResult) -> CommandResult {
    match view {
        Ok(view) => {
            ctx.send(view.into_reply()).await?;
        }
        Err(text) => {
            let message = guild_locale(ctx).text(text);
            ctx.send(embedded_messages::error_reply(message)).await?;
        }
    }
    Ok(())
}

fn find_playlist(ctx: Context<'_>, id: &str) -> Result<Playlist, PlaylistError> {
    ctx.data()
        .bot_data
        .playlist(id.trim())
        .ok_or_else(|| PlaylistError::NotFound(id.to_string()))
}

/// Tracks of a playlist in the order they should be queued.
pub fn playback_order(playlist: Playlist, shuffle: bool) -> Result<Vec<TrackMetadata>, PlaylistError> {
    let mut tracks = playlist.tracks;
    if tracks.is_empty() {
        return Err(PlaylistError::NoTracks);
    }
    if shuffle {
        tracks.shuffle(&mut rand::rng());
    }
    Ok(tracks)
}

/// Queues a whole playlist in the requester's voice channel and returns how
/// many tracks were queued.
pub async fn queue_playlist(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: GuildId,
    user_id: UserId,
    id: &str,
    shuffle: bool,
) -> Result<usize, PlaylistError> {
    let playlist = data
        .bot_data
        .playlist(id)
        .ok_or_else(|| PlaylistError::NotFound(id.to_string()))?;
    let name = playlist.name.clone();
    let tracks = playback_order(playlist, shuffle)?;

    let user_channel = MusicManager::user_voice_channel(ctx, guild_id, user_id);
    let queued = data
        .players
        .play_all(guild_id, user_channel, tracks)
        .await?;

    info!(
        "Queued {} tracks of playlist {} in guild {}",
        queued, name, guild_id
    );
    data.sync.request_refresh(guild_id);
    Ok(queued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn playlist(titles: &[&str]) -> Playlist {
        Playlist {
            id: "abc".to_string(),
            name: "Mix".to_string(),
            owner: UserId::new(1),
            contributors: Vec::new(),
            tracks: titles
                .iter()
                .map(|title| TrackMetadata {
                    title: title.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn titles(tracks: &[TrackMetadata]) -> Vec<String> {
        tracks.iter().map(|track| track.title.clone()).collect()
    }

    #[test]
    fn playlists_play_in_their_saved_order() {
        let tracks = playback_order(playlist(&["a", "b", "c"]), false).unwrap();
        assert_eq!(titles(&tracks), vec!["a", "b", "c"]);
    }

    #[test]
    fn shuffling_keeps_every_track() {
        let names: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let mut shuffled = titles(&playback_order(playlist(&refs), true).unwrap());
        shuffled.sort();
        let mut expected = names.clone();
        expected.sort();

        assert_eq!(shuffled, expected);
    }

    #[test]
    fn empty_playlist_cannot_be_played() {
        assert_matches!(playback_order(playlist(&[]), true), Err(PlaylistError::NoTracks));
    }

    #[test]
    fn storage_failures_are_not_shown_verbatim() {
        let err = PlaylistError::Store(crate::utils::bot_data::StoreError::Io(
            std::io::Error::other("disk full"),
        ));
        assert_eq!(error_text(&err), Text::SomethingWentWrong);
        assert_eq!(error_text(&PlaylistError::NotOwner), Text::PlaylistNotOwner);
    }
}
