//! User playlists shared across every guild the bot is in.

use serde::{Deserialize, Serialize};
use serenity::model::id::UserId;
use thiserror::Error;

use super::bot_data::StoreError;
use super::locale::Text;
use crate::commands::music::utils::music_manager::MusicError;
use crate::commands::music::utils::track_metadata::TrackMetadata;

/// Longest name a playlist may have, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: UserId,
    /// Users other than the owner who may add tracks.
    #[serde(default)]
    pub contributors: Vec<UserId>,
    #[serde(default)]
    pub tracks: Vec<TrackMetadata>,
}

impl Playlist {
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner == user_id
    }

    pub fn can_add_tracks(&self, user_id: UserId) -> bool {
        self.is_owner(user_id) || self.contributors.contains(&user_id)
    }

    pub fn ensure_owner(&self, user_id: UserId) -> Result<(), PlaylistError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(PlaylistError::NotOwner)
        }
    }

    pub fn ensure_contributor(&self, user_id: UserId) -> Result<(), PlaylistError> {
        if self.can_add_tracks(user_id) {
            Ok(())
        } else {
            Err(PlaylistError::NotContributor)
        }
    }
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Playlist {0} does not exist")]
    NotFound(String),

    #[error("A playlist named {0:?} already exists")]
    AlreadyExists(String),

    #[error("Invalid playlist name")]
    InvalidName,

    #[error("Only the owner may change this playlist")]
    NotOwner,

    #[error("User may not add tracks to this playlist")]
    NotContributor,

    #[error("The playlist has no tracks")]
    NoTracks,

    #[error("No track at position {0}")]
    TrackNotFound(usize),

    #[error(transparent)]
    Player(#[from] MusicError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlaylistError {
    /// The localized message for errors the user caused. `None` for real failures.
    pub fn user_text(&self) -> Option<Text> {
        match self {
            PlaylistError::NotFound(_) => Some(Text::PlaylistNotFound),
            PlaylistError::AlreadyExists(_) => Some(Text::PlaylistExists),
            PlaylistError::InvalidName => Some(Text::PlaylistInvalidName),
            PlaylistError::NotOwner => Some(Text::PlaylistNotOwner),
            PlaylistError::NotContributor => Some(Text::PlaylistNotContributor),
            PlaylistError::NoTracks => Some(Text::PlaylistNoTracks),
            PlaylistError::TrackNotFound(_) => Some(Text::PlaylistTrackNotFound),
            PlaylistError::Player(err) => err.user_text(),
            PlaylistError::Store(_) => None,
        }
    }
}

/// Trims a requested name and checks its length.
pub fn normalize_name(name: &str) -> Result<String, PlaylistError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(PlaylistError::InvalidName);
    }
    Ok(name.to_string())
}

/// Scores how well a playlist name matches a search query, case-insensitively.
/// Zero means no match at all.
pub fn match_score(name: &str, query: &str) -> u32 {
    let name = name.to_lowercase();
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return 1;
    }
    if name == query {
        return 100;
    }
    if name.starts_with(&query) {
        return 80;
    }
    if name.contains(&query) {
        return 60;
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    let matched = words.iter().filter(|word| name.contains(**word)).count();
    if matched > 0 {
        return (40 * matched / words.len()).max(11) as u32;
    }

    if is_subsequence(&query, &name) { 10 } else { 0 }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut haystack = haystack.chars();
    needle
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|c| haystack.any(|h| h == c))
}
