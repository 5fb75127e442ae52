//! Mock implementations for the player and messaging collaborators

use async_trait::async_trait;
use dashmap::DashMap;
use mockall::mock;
use serenity::model::id::{ChannelId, GuildId};
use std::time::Duration;
use tokio::sync::broadcast;

use tempo::commands::music::utils::control_panel::RenderedPanel;
use tempo::commands::music::utils::messenger::{ControlMessage, ControlMessenger, EditError};
use tempo::commands::music::utils::player::{PlayerSnapshot, PlayerSource};
use tempo::utils::locale::Locale;

mock! {
    pub Messenger {}

    #[async_trait]
    impl ControlMessenger for Messenger {
        async fn edit(&self, message: ControlMessage, panel: &RenderedPanel) -> Result<(), EditError>;
        async fn delete(&self, message: ControlMessage) -> Result<(), EditError>;
        async fn send(
            &self,
            channel_id: ChannelId,
            panel: &RenderedPanel,
            locale: Locale,
        ) -> Result<ControlMessage, EditError>;
    }
}

/// Player source whose snapshots are set by the test
pub struct FakePlayers {
    snapshots: DashMap<GuildId, PlayerSnapshot>,
    track_end: broadcast::Sender<GuildId>,
}

impl FakePlayers {
    pub fn new() -> Self {
        let (track_end, _) = broadcast::channel(64);
        Self {
            snapshots: DashMap::new(),
            track_end,
        }
    }

    pub fn set(&self, guild_id: GuildId, snapshot: PlayerSnapshot) {
        self.snapshots.insert(guild_id, snapshot);
    }

    /// Simulates the audio layer reporting the end of a track
    pub fn end_track(&self, guild_id: GuildId) {
        let _ = self.track_end.send(guild_id);
    }
}

#[async_trait]
impl PlayerSource for FakePlayers {
    async fn snapshot(&self, guild_id: GuildId) -> PlayerSnapshot {
        self.snapshots
            .get(&guild_id)
            .map(|snapshot| snapshot.value().clone())
            .unwrap_or_else(PlayerSnapshot::absent)
    }

    fn subscribe(&self) -> broadcast::Receiver<GuildId> {
        self.track_end.subscribe()
    }
}

/// Messenger whose edits hang for a while, to exercise the edit timeout
pub struct SlowMessenger {
    pub delay: Duration,
}

#[async_trait]
impl ControlMessenger for SlowMessenger {
    async fn edit(&self, _message: ControlMessage, _panel: &RenderedPanel) -> Result<(), EditError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn delete(&self, _message: ControlMessage) -> Result<(), EditError> {
        Ok(())
    }

    async fn send(
        &self,
        _channel_id: ChannelId,
        _panel: &RenderedPanel,
        _locale: Locale,
    ) -> Result<ControlMessage, EditError> {
        Err(EditError::Transient("not supported".to_string()))
    }
}

/// Player source stuck on a lock that is never released
pub struct HangingPlayers {
    track_end: broadcast::Sender<GuildId>,
}

impl HangingPlayers {
    pub fn new() -> Self {
        let (track_end, _) = broadcast::channel(4);
        Self { track_end }
    }
}

#[async_trait]
impl PlayerSource for HangingPlayers {
    async fn snapshot(&self, _guild_id: GuildId) -> PlayerSnapshot {
        std::future::pending().await
    }

    fn subscribe(&self) -> broadcast::Receiver<GuildId> {
        self.track_end.subscribe()
    }
}

/// Messenger whose edits blow up, to exercise refresh supervision
pub struct PanickingMessenger;

#[async_trait]
impl ControlMessenger for PanickingMessenger {
    async fn edit(&self, _message: ControlMessage, _panel: &RenderedPanel) -> Result<(), EditError> {
        panic!("edit exploded");
    }

    async fn delete(&self, _message: ControlMessage) -> Result<(), EditError> {
        Ok(())
    }

    async fn send(
        &self,
        _channel_id: ChannelId,
        _panel: &RenderedPanel,
        _locale: Locale,
    ) -> Result<ControlMessage, EditError> {
        Err(EditError::Transient("not supported".to_string()))
    }
}
