use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, ReactionType};

use crate::utils::locale::{Locale, Text};

/// Every component id owned by the player starts with this.
pub const PLAYER_PREFIX: &str = "player-";
const PLAYLINK_PREFIX: &str = "player-playlink:";

/// Actions a player button can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    SeekBack,
    PlayPause,
    Stop,
    SeekForward,
    Skip,
    VolumeDown,
    VolumeUp,
    Leave,
    Loop,
    Shuffle,
    Queue,
    Close,
    /// Enqueue the linked track, offered by search results.
    PlayLink(String),
}

impl PanelAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        if let Some(url) = custom_id.strip_prefix(PLAYLINK_PREFIX) {
            return (!url.is_empty()).then(|| Self::PlayLink(url.to_string()));
        }

        let action = match custom_id.strip_prefix(PLAYER_PREFIX)? {
            "back" => Self::SeekBack,
            "play" => Self::PlayPause,
            "stop" => Self::Stop,
            "forward" => Self::SeekForward,
            "skip" => Self::Skip,
            "voldown" => Self::VolumeDown,
            "volup" => Self::VolumeUp,
            "leave" => Self::Leave,
            "loop" => Self::Loop,
            "shuffle" => Self::Shuffle,
            "queue" => Self::Queue,
            "close" => Self::Close,
            _ => return None,
        };
        Some(action)
    }

    pub fn custom_id(&self) -> String {
        let name = match self {
            Self::SeekBack => "back",
            Self::PlayPause => "play",
            Self::Stop => "stop",
            Self::SeekForward => "forward",
            Self::Skip => "skip",
            Self::VolumeDown => "voldown",
            Self::VolumeUp => "volup",
            Self::Leave => "leave",
            Self::Loop => "loop",
            Self::Shuffle => "shuffle",
            Self::Queue => "queue",
            Self::Close => "close",
            Self::PlayLink(url) => return format!("{}{}", PLAYLINK_PREFIX, url),
        };
        format!("{}{}", PLAYER_PREFIX, name)
    }
}

fn emoji_button(action: PanelAction, emoji: &str, style: ButtonStyle) -> CreateButton {
    CreateButton::new(action.custom_id())
        .emoji(ReactionType::Unicode(emoji.to_string()))
        .style(style)
}

/// Creates the three rows of buttons attached to a control panel
pub fn control_buttons(locale: Locale) -> Vec<CreateActionRow> {
    let transport = vec![
        emoji_button(PanelAction::SeekBack, "⏪", ButtonStyle::Secondary),
        emoji_button(PanelAction::PlayPause, "⏯️", ButtonStyle::Primary),
        emoji_button(PanelAction::Stop, "⏹️", ButtonStyle::Danger),
        emoji_button(PanelAction::SeekForward, "⏩", ButtonStyle::Secondary),
        emoji_button(PanelAction::Skip, "⏭️", ButtonStyle::Secondary),
    ];

    let mixer = vec![
        emoji_button(PanelAction::VolumeDown, "🔉", ButtonStyle::Secondary),
        emoji_button(PanelAction::VolumeUp, "🔊", ButtonStyle::Secondary),
        emoji_button(PanelAction::Leave, "🔌", ButtonStyle::Danger),
    ];

    let queue = vec![
        emoji_button(PanelAction::Loop, "🔁", ButtonStyle::Secondary),
        emoji_button(PanelAction::Shuffle, "🔀", ButtonStyle::Secondary),
        CreateButton::new(PanelAction::Queue.custom_id())
            .style(ButtonStyle::Secondary)
            .label(locale.text(Text::QueueTitle)),
        emoji_button(PanelAction::Close, "✖️", ButtonStyle::Secondary),
    ];

    vec![
        CreateActionRow::Buttons(transport),
        CreateActionRow::Buttons(mixer),
        CreateActionRow::Buttons(queue),
    ]
}

/// A numbered button that enqueues one search result.
pub fn playlink_button(position: usize, url: &str) -> CreateButton {
    CreateButton::new(PanelAction::PlayLink(url.to_string()).custom_id())
        .style(ButtonStyle::Primary)
        .label(position.to_string())
}
