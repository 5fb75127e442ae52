//! Point-in-time view of a guild's player, as consumed by the control panel.

use serenity::async_trait;
use serenity::model::id::GuildId;
use std::time::Duration;
use tokio::sync::broadcast;

use super::track_metadata::TrackMetadata;

/// Coarse playback state of a guild player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Playing,
    Paused,
    NotPlaying,
    /// The current track failed and the player is unusable until something new is queued.
    Destroyed,
    /// A call exists but the voice connection is not established.
    NotConnected,
}

/// Everything the control panel needs to render one guild.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    /// Whether the guild has a player at all. When false every other field is ignored.
    pub exists: bool,
    pub current_track: Option<TrackMetadata>,
    pub position: Duration,
    /// 1.0 is 100%.
    pub volume: f32,
    pub state: PlayerState,
    pub looping: bool,
    /// Tracks waiting after the current one.
    pub queue_length: usize,
}

impl PlayerSnapshot {
    /// The snapshot of a guild without a player.
    pub fn absent() -> Self {
        Self {
            exists: false,
            current_track: None,
            position: Duration::ZERO,
            volume: 0.0,
            state: PlayerState::NotConnected,
            looping: false,
            queue_length: 0,
        }
    }
}

/// Read side of the audio layer.
///
/// `snapshot` must not block on the network and must never fail: a guild
/// without a player yields [`PlayerSnapshot::absent`].
#[async_trait]
pub trait PlayerSource: Send + Sync {
    async fn snapshot(&self, guild_id: GuildId) -> PlayerSnapshot;

    /// Stream of guilds whose current track just ended.
    fn subscribe(&self) -> broadcast::Receiver<GuildId>;
}
