//! Sample players, panels and a ready-to-use sync loop

use std::sync::Arc;
use std::time::Duration;

use serenity::model::id::{ChannelId, GuildId, MessageId};
use tempo::commands::music::utils::control_panel::RenderedPanel;
use tempo::commands::music::utils::control_registry::ControlRegistry;
use tempo::commands::music::utils::control_sync::{ControlSync, SyncSettings};
use tempo::commands::music::utils::messenger::{ControlMessage, ControlMessenger};
use tempo::commands::music::utils::player::{PlayerSnapshot, PlayerSource, PlayerState};
use tempo::commands::music::utils::track_metadata::TrackMetadata;
use tempo::utils::bot_data::BotData;

use super::mocks::FakePlayers;

/// Channel every sample panel lives in
pub const PANEL_CHANNEL_ID: u64 = 987654321;

pub fn guild(id: u64) -> GuildId {
    GuildId::new(id)
}

pub fn channel() -> ChannelId {
    ChannelId::new(PANEL_CHANNEL_ID)
}

pub fn message(id: u64) -> ControlMessage {
    ControlMessage {
        channel_id: channel(),
        message_id: MessageId::new(id),
    }
}

/// A player halfway through a 100 second track
pub fn playing(title: &str, position_secs: u64) -> PlayerSnapshot {
    PlayerSnapshot {
        exists: true,
        current_track: Some(TrackMetadata {
            title: title.to_string(),
            author: "Artist".to_string(),
            url: Some(format!("https://youtu.be/{}", title)),
            duration: Some(Duration::from_secs(100)),
            thumbnail: None,
        }),
        position: Duration::from_secs(position_secs),
        volume: 0.2,
        state: PlayerState::Playing,
        looping: false,
        queue_length: 0,
    }
}

/// What a panel looked like before anything was rendered into it
pub fn stale_panel() -> RenderedPanel {
    RenderedPanel {
        body: "stale".to_string(),
        link: None,
    }
}

pub fn fast_settings() -> SyncSettings {
    SyncSettings {
        interval: Duration::from_millis(10),
        edit_timeout: Duration::from_millis(200),
        max_event_refreshes: 4,
    }
}

pub fn build_sync(
    players: Arc<FakePlayers>,
    messenger: impl ControlMessenger + 'static,
) -> Arc<ControlSync> {
    build_sync_with(
        players,
        messenger,
        Arc::new(BotData::in_memory()),
        fast_settings(),
    )
}

pub fn build_sync_with(
    players: Arc<dyn PlayerSource>,
    messenger: impl ControlMessenger + 'static,
    bot_data: Arc<BotData>,
    settings: SyncSettings,
) -> Arc<ControlSync> {
    Arc::new(ControlSync::new(
        Arc::new(ControlRegistry::new()),
        players,
        Arc::new(messenger),
        bot_data,
        settings,
    ))
}
