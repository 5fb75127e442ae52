//! Custom ids of the buttons attached to playlist views.

use serenity::all::{ButtonStyle, CreateButton, ReactionType};

/// Every component id owned by playlists starts with this.
pub const PLAYLIST_PREFIX: &str = "playlist-";
/// Discord rejects longer custom ids.
pub const MAX_CUSTOM_ID_LENGTH: usize = 100;

/// Actions a playlist button can request. Pages are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistAction {
    List { mine: bool, page: usize },
    Search { mine: bool, page: usize, query: String },
    /// Opens the playlist in a new message.
    Show { id: String },
    /// Turns the page of an already shown playlist.
    Page { id: String, page: usize },
    Track { id: String, index: usize },
    RemoveTrack { id: String, index: usize },
    AddTrack { id: String, url: String },
    Play { id: String },
    Shuffle { id: String },
    Delete { id: String },
    ConfirmDelete { id: String },
}

impl PlaylistAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        let (name, args) = custom_id.strip_prefix(PLAYLIST_PREFIX)?.split_once(':')?;

        let action = match name {
            "list" => {
                let (mine, page) = args.split_once(',')?;
                Self::List {
                    mine: mine.parse().ok()?,
                    page: page.parse().ok()?,
                }
            }
            "search" => {
                let mut parts = args.splitn(3, ',');
                Self::Search {
                    mine: parts.next()?.parse().ok()?,
                    page: parts.next()?.parse().ok()?,
                    query: parts.next()?.to_string(),
                }
            }
            "show" => Self::Show { id: id(args)? },
            "page" => {
                let (id, page) = args.split_once(',')?;
                Self::Page {
                    id: self::id(id)?,
                    page: page.parse().ok()?,
                }
            }
            "track" | "delete-track" => {
                let (id, index) = args.split_once(',')?;
                let (id, index) = (self::id(id)?, index.parse().ok()?);
                if name == "track" {
                    Self::Track { id, index }
                } else {
                    Self::RemoveTrack { id, index }
                }
            }
            "add-track" => {
                let (id, url) = args.split_once(',')?;
                if url.is_empty() {
                    return None;
                }
                Self::AddTrack {
                    id: self::id(id)?,
                    url: url.to_string(),
                }
            }
            "play" => Self::Play { id: id(args)? },
            "random" => Self::Shuffle { id: id(args)? },
            "delete" => Self::Delete { id: id(args)? },
            "confirm-delete" => Self::ConfirmDelete { id: id(args)? },
            _ => return None,
        };
        Some(action)
    }

    pub fn custom_id(&self) -> String {
        let args = match self {
            Self::List { mine, page } => format!("list:{},{}", mine, page),
            Self::Search { mine, page, query } => format!("search:{},{},{}", mine, page, query),
            Self::Show { id } => format!("show:{}", id),
            Self::Page { id, page } => format!("page:{},{}", id, page),
            Self::Track { id, index } => format!("track:{},{}", id, index),
            Self::RemoveTrack { id, index } => format!("delete-track:{},{}", id, index),
            Self::AddTrack { id, url } => format!("add-track:{},{}", id, url),
            Self::Play { id } => format!("play:{}", id),
            Self::Shuffle { id } => format!("random:{}", id),
            Self::Delete { id } => format!("delete:{}", id),
            Self::ConfirmDelete { id } => format!("confirm-delete:{}", id),
        };
        format!("{}{}", PLAYLIST_PREFIX, args)
    }

    /// A button for this action, or `None` if its id would be too long.
    pub fn button(&self, style: ButtonStyle) -> Option<CreateButton> {
        let custom_id = self.custom_id();
        (custom_id.len() <= MAX_CUSTOM_ID_LENGTH).then(|| CreateButton::new(custom_id).style(style))
    }

    pub fn labeled(&self, label: impl Into<String>, style: ButtonStyle) -> Option<CreateButton> {
        self.button(style).map(|button| button.label(label))
    }

    pub fn with_emoji(&self, emoji: &str) -> Option<CreateButton> {
        self.button(ButtonStyle::Secondary)
            .map(|button| button.emoji(ReactionType::Unicode(emoji.to_string())))
    }
}

fn id(value: &str) -> Option<String> {
    (!value.is_empty() && !value.contains(',')).then(|| value.to_string())
}
