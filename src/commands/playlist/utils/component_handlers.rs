use ::serenity::all::{
    ComponentInteraction, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, GuildId,
};
use poise::serenity_prelude::Context;
use tracing::{info, warn};

use super::playlist_buttons::PlaylistAction;
use super::playlist_views::{self, Listing, ViewResult};
use crate::commands::music::utils::music_manager::MusicError;
use crate::commands::playlist::{error_text, queue_playlist};
use crate::utils::locale::{Locale, Text};
use crate::utils::playlist::{Playlist, PlaylistError};
use crate::{Data, Error};

type ButtonInteractionResult = Result<(), Error>;

/// Handle a playlist button
pub async fn handle_interaction(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
) -> ButtonInteractionResult {
    let Some(action) = PlaylistAction::from_custom_id(&interaction.data.custom_id) else {
        warn!("Unknown playlist button ID: {}", interaction.data.custom_id);
        return Ok(());
    };
    let Some(guild_id) = interaction.guild_id else {
        return Ok(());
    };
    let locale = data.bot_data.locale(guild_id);
    let user = interaction.user.id;

    info!(
        "Playlist button {:?} pressed by {} in guild {}",
        action, interaction.user.name, guild_id
    );

    let bot_data = &data.bot_data;
    match action {
        PlaylistAction::List { mine, page } => {
            let playlists = bot_data.playlists(mine.then_some(user));
            let view = playlist_views::listing(&playlists, &Listing::from_scope(mine), page, locale);
            respond_view(ctx, interaction, view, locale, true).await
        }
        PlaylistAction::Search { mine, page, query } => {
            let playlists = bot_data.search_playlists(&query, mine.then_some(user));
            let listing = Listing::Search { query, mine };
            let view = playlist_views::listing(&playlists, &listing, page, locale);
            respond_view(ctx, interaction, view, locale, true).await
        }
        PlaylistAction::Show { id } => {
            let view = with_playlist(data, &id, |playlist| {
                playlist_views::details(playlist, user, 0, locale)
            });
            respond_view(ctx, interaction, view, locale, false).await
        }
        PlaylistAction::Page { id, page } => {
            let view = with_playlist(data, &id, |playlist| {
                playlist_views::details(playlist, user, page, locale)
            });
            respond_view(ctx, interaction, view, locale, true).await
        }
        PlaylistAction::Track { id, index } => {
            let view = with_playlist(data, &id, |playlist| {
                playlist_views::track(playlist, index, user, locale)
            });
            respond_view(ctx, interaction, view, locale, false).await
        }
        PlaylistAction::RemoveTrack { id, index } => match bot_data.remove_track(&id, user, index) {
            Ok(track) => {
                let text = locale.format(Text::TrackRemoved, track.title);
                respond_text(ctx, interaction, text, true).await
            }
            Err(err) => respond_error(ctx, interaction, err, locale).await,
        },
        PlaylistAction::AddTrack { id, url } => {
            handle_add_track(ctx, interaction, data, locale, &id, &url).await
        }
        PlaylistAction::Play { id } => {
            handle_play(ctx, interaction, data, guild_id, locale, &id, false).await
        }
        PlaylistAction::Shuffle { id } => {
            handle_play(ctx, interaction, data, guild_id, locale, &id, true).await
        }
        PlaylistAction::Delete { id } => {
            let confirmation = bot_data
                .playlist(&id)
                .ok_or(PlaylistError::NotFound(id))
                .and_then(|playlist| {
                    playlist.ensure_owner(user)?;
                    Ok(playlist_views::delete_confirmation(&playlist, locale))
                });
            match confirmation {
                Ok(view) => respond_view(ctx, interaction, Ok(view), locale, false).await,
                Err(err) => respond_error(ctx, interaction, err, locale).await,
            }
        }
        PlaylistAction::ConfirmDelete { id } => match bot_data.delete_playlist(&id, user) {
            Ok(playlist) => {
                let text = locale.format(Text::PlaylistDeleted, playlist.name);
                respond_text(ctx, interaction, text, true).await
            }
            Err(err) => respond_error(ctx, interaction, err, locale).await,
        },
    }
}

fn with_playlist(
    data: &Data,
    id: &str,
    view: impl FnOnce(&Playlist) -> ViewResult,
) -> ViewResult {
    match data.bot_data.playlist(id) {
        Some(playlist) => view(&playlist),
        None => Err(Text::PlaylistNotFound),
    }
}

/// Adds a track picked from search results.
async fn handle_add_track(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
    locale: Locale,
    id: &str,
    url: &str,
) -> ButtonInteractionResult {
    interaction.defer_ephemeral(ctx).await?;

    let outcome = async {
        let playlist = data
            .bot_data
            .playlist(id)
            .ok_or_else(|| PlaylistError::NotFound(id.to_string()))?;
        playlist.ensure_contributor(interaction.user.id)?;

        let track = data
            .players
            .search(url)
            .await?
            .into_iter()
            .next()
            .ok_or(MusicError::NoResults)?;
        let title = track.title.clone();
        data.bot_data.add_track(id, interaction.user.id, track)?;
        Ok::<_, PlaylistError>(title)
    }
    .await;

    let text = match outcome {
        Ok(title) => locale.format(Text::TrackAdded, title),
        Err(PlaylistError::Player(MusicError::AudioSourceError(e))) => {
            warn!("Could not load {} for playlist {}: {}", url, id, e);
            locale.text(Text::InvalidLink).to_string()
        }
        Err(err) => locale.text(error_text(&err)).to_string(),
    };
    followup_text(ctx, interaction, text).await
}

async fn handle_play(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
    guild_id: GuildId,
    locale: Locale,
    id: &str,
    shuffle: bool,
) -> ButtonInteractionResult {
    interaction.defer_ephemeral(ctx).await?;

    let text = match queue_playlist(ctx, data, guild_id, interaction.user.id, id, shuffle).await {
        Ok(count) => locale.format(Text::PlaylistQueued, count),
        Err(err) => locale.text(error_text(&err)).to_string(),
    };
    followup_text(ctx, interaction, text).await
}

async fn followup_text(
    ctx: &Context,
    interaction: &ComponentInteraction,
    text: String,
) -> ButtonInteractionResult {
    let followup = CreateInteractionResponseFollowup::new()
        .content(text)
        .ephemeral(true);
    interaction.create_followup(ctx, followup).await?;
    Ok(())
}

/// Shows a view, either in place of the pressed message or as a new one.
async fn respond_view(
    ctx: &Context,
    interaction: &ComponentInteraction,
    view: ViewResult,
    locale: Locale,
    replace: bool,
) -> ButtonInteractionResult {
    let view = match view {
        Ok(view) => view,
        Err(text) => return respond_text(ctx, interaction, locale.text(text).to_string(), false).await,
    };

    let message = view.into_message();
    let response = if replace {
        CreateInteractionResponse::UpdateMessage(message)
    } else {
        CreateInteractionResponse::Message(message)
    };
    interaction.create_response(ctx, response).await?;
    Ok(())
}

/// Answers with plain text. `replace` swaps out the pressed message and its buttons.
async fn respond_text(
    ctx: &Context,
    interaction: &ComponentInteraction,
    text: String,
    replace: bool,
) -> ButtonInteractionResult {
    let response = if replace {
        CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .content(text)
                .embeds(Vec::new())
                .components(Vec::new()),
        )
    } else {
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        )
    };
    interaction.create_response(ctx, response).await?;
    Ok(())
}

async fn respond_error(
    ctx: &Context,
    interaction: &ComponentInteraction,
    err: PlaylistError,
    locale: Locale,
) -> ButtonInteractionResult {
    respond_text(ctx, interaction, locale.text(error_text(&err)).to_string(), false).await
}
