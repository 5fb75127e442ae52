//! Embeds and button rows shown by the playlist commands.
//!
//! Views are built without touching Discord so both slash commands and
//! button presses can reuse them.

use poise::CreateReply;
use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponseMessage, Mentionable, UserId,
};
use std::ops::Range;

use super::playlist_buttons::PlaylistAction;
use crate::commands::music::utils::button_controls::playlink_button;
use crate::commands::music::utils::format_duration;
use crate::commands::music::utils::track_metadata::TrackMetadata;
use crate::utils::locale::{Locale, Text};
use crate::utils::playlist::Playlist;

/// Items shown on one page.
pub const PAGE_SIZE: usize = 5;
const PLAYLIST_COLOUR: u32 = 0x9b59b6;
const WARNING_COLOUR: u32 = 0xff0000;

pub type ViewResult = Result<PlaylistView, Text>;

pub struct PlaylistView {
    pub embed: CreateEmbed,
    pub components: Vec<CreateActionRow>,
}

impl PlaylistView {
    fn new(embed: CreateEmbed) -> Self {
        Self {
            embed,
            components: Vec::new(),
        }
    }

    fn row(mut self, buttons: Vec<CreateButton>) -> Self {
        if !buttons.is_empty() {
            self.components.push(CreateActionRow::Buttons(buttons));
        }
        self
    }

    pub fn into_reply(self) -> CreateReply {
        CreateReply::default()
            .embed(self.embed)
            .components(self.components)
            .ephemeral(true)
    }

    pub fn into_message(self) -> CreateInteractionResponseMessage {
        CreateInteractionResponseMessage::new()
            .embed(self.embed)
            .components(self.components)
            .ephemeral(true)
    }
}

/// Indices of `count` items that fall on `page`.
pub fn page_bounds(count: usize, page: usize) -> Result<Range<usize>, Text> {
    if count == 0 {
        return Err(Text::PlaylistsEmpty);
    }
    let start = page.saturating_mul(PAGE_SIZE);
    if start >= count {
        return Err(Text::PlaylistWrongPage);
    }
    Ok(start..(start + PAGE_SIZE).min(count))
}

/// Previous and next buttons around `page`.
fn navigation(count: usize, page: usize, action: impl Fn(usize) -> PlaylistAction) -> Vec<CreateButton> {
    let mut buttons = Vec::new();
    if page > 0 {
        buttons.extend(action(page - 1).with_emoji("⬅"));
    }
    if (page + 1) * PAGE_SIZE < count {
        buttons.extend(action(page + 1).with_emoji("➡"));
    }
    buttons
}

fn page_footer(embed: CreateEmbed, count: usize, page: usize, locale: Locale) -> CreateEmbed {
    if count > PAGE_SIZE {
        embed.footer(CreateEmbedFooter::new(locale.format(Text::Page, page + 1)))
    } else {
        embed
    }
}

fn duration_text(track: &TrackMetadata) -> String {
    track
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Stream".to_string())
}

/// Which playlists a list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Mine,
    All,
    Search { query: String, mine: bool },
}

impl Listing {
    pub fn from_scope(mine: bool) -> Self {
        if mine { Self::Mine } else { Self::All }
    }

    fn page_action(&self, page: usize) -> PlaylistAction {
        match self {
            Self::Mine => PlaylistAction::List { mine: true, page },
            Self::All => PlaylistAction::List { mine: false, page },
            Self::Search { query, mine } => PlaylistAction::Search {
                mine: *mine,
                page,
                query: query.clone(),
            },
        }
    }

    fn heading(&self, locale: Locale) -> CreateEmbed {
        let embed = CreateEmbed::new().colour(PLAYLIST_COLOUR);
        match self {
            Self::Mine => embed.title(locale.text(Text::MyPlaylists)),
            Self::All => embed.title(locale.text(Text::SharedPlaylists)),
            Self::Search { query, mine } => embed
                .title(locale.format(Text::PlaylistSearchTitle, query))
                .description(locale.text(if *mine {
                    Text::MyPlaylists
                } else {
                    Text::SharedPlaylists
                })),
        }
    }
}

/// One page of playlists, each with a button that opens it.
pub fn listing(playlists: &[Playlist], listing: &Listing, page: usize, locale: Locale) -> ViewResult {
    let range = page_bounds(playlists.len(), page)?;

    let mut embed = listing.heading(locale);
    let mut open_buttons = Vec::new();
    for index in range {
        let playlist = &playlists[index];
        embed = embed.field(
            format!("{}. {}", index + 1, playlist.name),
            format!(
                "{} {}\n{}",
                locale.text(Text::By),
                playlist.owner.mention(),
                locale.format(Text::TrackCount, playlist.tracks.len())
            ),
            false,
        );
        open_buttons.extend(
            PlaylistAction::Show {
                id: playlist.id.clone(),
            }
            .labeled((index + 1).to_string(), ButtonStyle::Secondary),
        );
    }

    let embed = page_footer(embed, playlists.len(), page, locale);
    Ok(PlaylistView::new(embed)
        .row(open_buttons)
        .row(navigation(playlists.len(), page, |page| listing.page_action(page))))
}

/// A playlist with one page of its tracks and the actions `viewer` may take.
pub fn details(playlist: &Playlist, viewer: UserId, page: usize, locale: Locale) -> ViewResult {
    let count = playlist.tracks.len();
    let range = match page_bounds(count, page) {
        Ok(range) => range,
        Err(Text::PlaylistsEmpty) if page == 0 => 0..0,
        Err(_) => return Err(Text::PlaylistWrongPage),
    };

    let mut description = format!(
        "ID: `{}`\n{}\n",
        playlist.id,
        locale.format(Text::Owner, playlist.owner.mention())
    );
    if !playlist.contributors.is_empty() {
        let contributors = playlist
            .contributors
            .iter()
            .map(|user| user.mention().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        description.push_str(&locale.format(Text::Contributors, contributors));
        description.push('\n');
    }
    description.push_str(&locale.format(Text::TrackCount, count));

    let mut embed = CreateEmbed::new()
        .title(locale.format(Text::PlaylistTitle, &playlist.name))
        .description(description)
        .colour(PLAYLIST_COLOUR);

    let mut track_buttons = Vec::new();
    for index in range {
        let track = &playlist.tracks[index];
        embed = embed.field(
            format!("{}. {}", index + 1, track.title),
            format!("({}) - {} {}", duration_text(track), locale.text(Text::By), track.author),
            false,
        );
        track_buttons.extend(
            PlaylistAction::Track {
                id: playlist.id.clone(),
                index,
            }
            .labeled((index + 1).to_string(), ButtonStyle::Secondary),
        );
    }
    let embed = page_footer(embed, count, page, locale);

    let id = playlist.id.clone();
    let mut actions = Vec::new();
    if count > 0 {
        actions.extend(
            PlaylistAction::Play { id: id.clone() }
                .labeled(locale.text(Text::PlayLabel), ButtonStyle::Primary),
        );
        actions.extend(
            PlaylistAction::Shuffle { id: id.clone() }
                .labeled(locale.text(Text::ShuffleLabel), ButtonStyle::Secondary),
        );
    }
    actions.extend(
        PlaylistAction::Page {
            id: id.clone(),
            page,
        }
        .labeled(locale.text(Text::RefreshLabel), ButtonStyle::Secondary),
    );
    if playlist.is_owner(viewer) {
        actions.extend(
            PlaylistAction::Delete { id: id.clone() }
                .labeled(locale.text(Text::DeleteLabel), ButtonStyle::Danger),
        );
    }

    Ok(PlaylistView::new(embed)
        .row(track_buttons)
        .row(navigation(count, page, |page| PlaylistAction::Page {
            id: id.clone(),
            page,
        }))
        .row(actions))
}

/// One track of a playlist with buttons to queue it or, for the owner, drop it.
pub fn track(playlist: &Playlist, index: usize, viewer: UserId, locale: Locale) -> ViewResult {
    let track = playlist.tracks.get(index).ok_or(Text::PlaylistTrackNotFound)?;

    let mut embed = CreateEmbed::new()
        .title(&track.title)
        .description(format!(
            "{} {}\n{}",
            locale.text(Text::By),
            track.author,
            track.url.as_deref().unwrap_or_default()
        ))
        .field(
            locale.text(Text::Duration),
            format!("`{}`", duration_text(track)),
            true,
        )
        .field("#", format!("`{}`", index + 1), true)
        .colour(PLAYLIST_COLOUR);
    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    let mut buttons: Vec<CreateButton> = track
        .url
        .as_deref()
        .map(|url| playlink_button(index + 1, url).label(locale.text(Text::PlayLabel)))
        .into_iter()
        .collect();
    if playlist.is_owner(viewer) {
        buttons.extend(
            PlaylistAction::RemoveTrack {
                id: playlist.id.clone(),
                index,
            }
            .labeled(locale.text(Text::DeleteLabel), ButtonStyle::Danger),
        );
    }

    Ok(PlaylistView::new(embed).row(buttons))
}

/// Search results offered for adding to a playlist.
pub fn track_choices(playlist: &Playlist, query: &str, results: &[TrackMetadata], locale: Locale) -> PlaylistView {
    let mut embed = CreateEmbed::new()
        .title(format!("\"{}\"", query))
        .description(locale.format(Text::PlaylistPick, &playlist.name))
        .colour(PLAYLIST_COLOUR);

    let mut buttons = Vec::new();
    for (index, result) in results.iter().take(PAGE_SIZE).enumerate() {
        embed = embed.field(
            format!("{}. {}", index + 1, result.title),
            format!("({}) - {} {}", duration_text(result), locale.text(Text::By), result.author),
            false,
        );
        if let Some(url) = &result.url {
            buttons.extend(
                PlaylistAction::AddTrack {
                    id: playlist.id.clone(),
                    url: url.clone(),
                }
                .labeled((index + 1).to_string(), ButtonStyle::Secondary),
            );
        }
    }

    PlaylistView::new(embed).row(buttons)
}

pub fn delete_confirmation(playlist: &Playlist, locale: Locale) -> PlaylistView {
    let embed = CreateEmbed::new()
        .title(locale.text(Text::ConfirmationTitle))
        .description(locale.format(Text::DeleteConfirm, &playlist.name))
        .colour(WARNING_COLOUR);

    let confirm = PlaylistAction::ConfirmDelete {
        id: playlist.id.clone(),
    }
    .labeled(locale.text(Text::DeleteLabel), ButtonStyle::Danger);

    PlaylistView::new(embed).row(confirm.into_iter().collect())
}
