use poise::serenity_prelude as serenity;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::{Compose, YoutubeDl};
use songbird::tracks::{ControlError, LoopState, PlayMode, Track, TrackHandle};
use songbird::{Call, Songbird, TrackEvent};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use super::event_handlers::TrackEndNotifier;
use super::player::{PlayerSnapshot, PlayerSource, PlayerState};
use super::track_metadata::TrackMetadata;
use crate::utils::locale::Text;

use dashmap::DashMap;
use rand::seq::SliceRandom;

/// Highest volume a guild may set, 1.0 being 100%.
pub const MAX_VOLUME: f32 = 1.5;
/// Volume change of one press of the volume buttons.
pub const VOLUME_STEP: f32 = 0.05;
/// Distance covered by one press of the seek buttons.
pub const SEEK_STEP: Duration = Duration::from_secs(10);
/// Number of results offered for a text search.
pub const SEARCH_RESULTS: usize = 5;
/// Number of upcoming tracks listed by the queue view.
pub const QUEUE_VIEW_LIMIT: usize = 20;
/// How long before a track ends the next one starts loading.
const PRELOAD_LEAD: Duration = Duration::from_secs(5);

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("No active player in this guild")]
    NoActivePlayer,

    #[error("Nothing is playing")]
    NoTrack,

    #[error("The queue is empty")]
    EmptyQueue,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("User is not in the bot's voice channel")]
    WrongVoiceChannel,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("No results found")]
    NoResults,

    #[error("Playback control failed: {0}")]
    Control(String),
}

impl From<ControlError> for MusicError {
    fn from(error: ControlError) -> Self {
        MusicError::Control(error.to_string())
    }
}

impl MusicError {
    /// The localized message shown to the user for errors that are the
    /// user's to fix. `None` means the error is a genuine failure.
    pub fn user_text(&self) -> Option<Text> {
        match self {
            MusicError::NoActivePlayer => Some(Text::NoPlayer),
            MusicError::NoTrack => Some(Text::NoTrack),
            MusicError::EmptyQueue => Some(Text::EmptyQueue),
            MusicError::UserNotInVoiceChannel => Some(Text::NoVoiceChannel),
            MusicError::WrongVoiceChannel => Some(Text::WrongVoiceChannel),
            MusicError::NoResults => Some(Text::NoResults),
            MusicError::NotInGuild
            | MusicError::JoinError(_)
            | MusicError::AudioSourceError(_)
            | MusicError::Control(_) => None,
        }
    }
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// The current track and what follows it.
#[derive(Debug, Clone, Default)]
pub struct QueueView {
    pub current: Option<TrackMetadata>,
    /// At most [`QUEUE_VIEW_LIMIT`] upcoming tracks.
    pub upcoming: Vec<TrackMetadata>,
    pub total_upcoming: usize,
}

/// Owns the voice side of the bot: joining calls, queueing tracks and
/// translating songbird's state into [`PlayerSnapshot`]s.
pub struct MusicManager {
    songbird: Arc<Songbird>,
    http_client: reqwest::Client,
    default_volume: f32,
    // Volume chosen per guild, applied to newly queued tracks
    volumes: DashMap<GuildId, f32>,
    track_end: broadcast::Sender<GuildId>,
}

impl MusicManager {
    pub fn new(songbird: Arc<Songbird>, default_volume: f32) -> Self {
        let (track_end, _) = broadcast::channel(256);
        Self {
            songbird,
            http_client: reqwest::Client::new(),
            default_volume,
            volumes: DashMap::new(),
            track_end,
        }
    }

    /// Get the current voice channel call handle
    pub fn call(&self, guild_id: GuildId) -> MusicResult<Arc<SerenityMutex<Call>>> {
        self.songbird
            .get(guild_id)
            .ok_or(MusicError::NoActivePlayer)
    }

    /// Voice channel a user is currently in, according to the cache
    pub fn user_voice_channel(
        ctx: &serenity::Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Option<ChannelId> {
        let guild = ctx.cache.guild(guild_id)?;
        guild
            .voice_states
            .get(&user_id)
            .and_then(|voice_state| voice_state.channel_id)
    }

    /// Voice channel the bot is connected to in this guild
    pub async fn voice_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        let call = self.songbird.get(guild_id)?;
        let handler = call.lock().await;
        handler
            .current_channel()
            .map(|channel| ChannelId::new(channel.0.get()))
    }

    /// Rejects users who are not listening along with the bot.
    pub async fn ensure_listener(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
    ) -> MusicResult<()> {
        check_same_channel(self.voice_channel(guild_id).await, user_channel)
    }

    pub fn volume(&self, guild_id: GuildId) -> f32 {
        self.volumes
            .get(&guild_id)
            .map(|volume| *volume)
            .unwrap_or(self.default_volume)
    }

    /// Join a voice channel and start reporting track ends for it
    pub async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        let call = self
            .songbird
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;

        {
            let mut handler = call.lock().await;
            handler.remove_all_global_events();
            handler.add_global_event(
                TrackEvent::End.into(),
                TrackEndNotifier::new(guild_id, self.track_end.clone()),
            );
        }

        self.volumes
            .entry(guild_id)
            .or_insert(self.default_volume);

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);
        Ok(())
    }

    /// Resolves a link to its track, or runs a text search.
    pub async fn search(&self, query: &str) -> MusicResult<Vec<TrackMetadata>> {
        let results: Vec<TrackMetadata> = if is_link(query) {
            let mut source = YoutubeDl::new(self.http_client.clone(), query.to_string());
            let aux = source
                .aux_metadata()
                .await
                .map_err(|e| MusicError::AudioSourceError(e.to_string()))?;

            let mut metadata = TrackMetadata::from(aux);
            metadata.url.get_or_insert_with(|| query.to_string());
            vec![metadata]
        } else {
            let mut source = YoutubeDl::new_search(self.http_client.clone(), query.to_string());
            source
                .search(Some(SEARCH_RESULTS))
                .await
                .map_err(|e| MusicError::AudioSourceError(e.to_string()))?
                .into_iter()
                .map(TrackMetadata::from)
                .filter(|metadata| metadata.url.is_some())
                .collect()
        };

        debug!("Query {:?} yielded {} results", query, results.len());

        if results.is_empty() {
            Err(MusicError::NoResults)
        } else {
            Ok(results)
        }
    }

    /// Adds a track to the end of the guild's queue and returns the queue length.
    pub async fn enqueue(&self, guild_id: GuildId, metadata: TrackMetadata) -> MusicResult<usize> {
        let url = metadata.url.clone().ok_or_else(|| {
            MusicError::AudioSourceError("Track has no playable URL".to_string())
        })?;
        let call = self.call(guild_id)?;

        let input = YoutubeDl::new(self.http_client.clone(), url);
        let track = Track::new_with_data(input.into(), Arc::new(metadata.clone()))
            .volume(self.volume(guild_id));

        // The metadata is already known, so nothing is fetched while the call is locked
        let mut handler = call.lock().await;
        handler.enqueue_with_preload(track, preload_time(metadata.duration));
        let queue_length = handler.queue().len();

        info!(
            "Enqueued '{}' in guild {} at position {}",
            metadata.title, guild_id, queue_length
        );
        Ok(queue_length)
    }

    /// Joins the requester's channel unless the bot is already there.
    async fn connect_listener(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
    ) -> MusicResult<()> {
        let channel_id = user_channel.ok_or(MusicError::UserNotInVoiceChannel)?;

        match self.voice_channel(guild_id).await {
            Some(bot_channel) if bot_channel != channel_id => Err(MusicError::WrongVoiceChannel),
            Some(_) => Ok(()),
            None => self.join(guild_id, channel_id).await,
        }
    }

    /// Joins the requester's channel if needed, then queues the track.
    pub async fn play(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        metadata: TrackMetadata,
    ) -> MusicResult<usize> {
        self.connect_listener(guild_id, user_channel).await?;
        self.enqueue(guild_id, metadata).await
    }

    /// Queues several tracks in order. Tracks without a playable URL are
    /// skipped; returns how many were queued.
    pub async fn play_all(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        tracks: Vec<TrackMetadata>,
    ) -> MusicResult<usize> {
        self.connect_listener(guild_id, user_channel).await?;

        let mut queued = 0;
        for metadata in tracks {
            match self.enqueue(guild_id, metadata).await {
                Ok(_) => queued += 1,
                Err(MusicError::AudioSourceError(e)) => {
                    warn!("Skipping a track in guild {}: {}", guild_id, e)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(queued)
    }

    async fn current_track(&self, guild_id: GuildId) -> MusicResult<TrackHandle> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        let current = handler.queue().current();
        current.ok_or(MusicError::NoTrack)
    }

    /// Pauses a playing track or resumes any other. Returns whether it now plays.
    pub async fn toggle_pause(&self, guild_id: GuildId) -> MusicResult<bool> {
        let track = self.current_track(guild_id).await?;
        let info = track.get_info().await?;

        if matches!(info.playing, PlayMode::Play) {
            track.pause()?;
            Ok(false)
        } else {
            track.play()?;
            Ok(true)
        }
    }

    pub async fn skip(&self, guild_id: GuildId) -> MusicResult<()> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        let queue = handler.queue();

        check_skippable(queue.current().is_some(), queue.len())?;
        queue.skip()?;

        info!("Skipped track in guild {}", guild_id);
        Ok(())
    }

    /// Stops playback and clears the queue, staying in the channel.
    pub async fn stop(&self, guild_id: GuildId) -> MusicResult<()> {
        let call = self.call(guild_id)?;
        call.lock().await.queue().stop();

        info!("Stopped playback in guild {}", guild_id);
        Ok(())
    }

    pub async fn leave(&self, guild_id: GuildId) -> MusicResult<()> {
        let call = self.call(guild_id)?;
        call.lock().await.queue().stop();

        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        self.volumes.remove(&guild_id);

        info!("Left voice channel in guild {}", guild_id);
        Ok(())
    }

    /// Moves the playhead by [`SEEK_STEP`], returning the new position.
    pub async fn seek_by(&self, guild_id: GuildId, forward: bool) -> MusicResult<Duration> {
        let track = self.current_track(guild_id).await?;
        let info = track.get_info().await?;

        let mut target = if forward {
            info.position + SEEK_STEP
        } else {
            info.position.saturating_sub(SEEK_STEP)
        };
        if let Some(total) = track.data::<TrackMetadata>().duration {
            target = target.min(total);
        }

        let position = track.seek_async(target).await?;
        debug!("Seeked to {:?} in guild {}", position, guild_id);
        Ok(position)
    }

    /// Sets the guild volume, clamped to `[0, MAX_VOLUME]`, and returns it.
    pub async fn set_volume(&self, guild_id: GuildId, volume: f32) -> MusicResult<f32> {
        let call = self.call(guild_id)?;
        let volume = volume.clamp(0.0, MAX_VOLUME);
        self.volumes.insert(guild_id, volume);

        let tracks = call.lock().await.queue().current_queue();
        for track in tracks {
            if let Err(e) = track.set_volume(volume) {
                debug!("Could not set volume on a queued track: {}", e);
            }
        }

        info!("Volume for guild {} set to {:.2}", guild_id, volume);
        Ok(volume)
    }

    pub async fn adjust_volume(&self, guild_id: GuildId, delta: f32) -> MusicResult<f32> {
        self.set_volume(guild_id, self.volume(guild_id) + delta)
            .await
    }

    /// Toggles looping of the current track. Returns whether it now loops.
    pub async fn toggle_loop(&self, guild_id: GuildId) -> MusicResult<bool> {
        let track = self.current_track(guild_id).await?;
        let info = track.get_info().await?;

        if matches!(info.loops, LoopState::Infinite) {
            track.disable_loop()?;
            Ok(false)
        } else {
            track.enable_loop()?;
            Ok(true)
        }
    }

    /// Shuffles the upcoming tracks, leaving the current one in place.
    pub async fn shuffle(&self, guild_id: GuildId) -> MusicResult<()> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;

        if handler.queue().len() < 2 {
            return Err(MusicError::EmptyQueue);
        }

        handler.queue().modify_queue(|queue| {
            if let Some((_, upcoming)) = queue.make_contiguous().split_first_mut() {
                upcoming.shuffle(&mut rand::rng());
            }
        });

        info!("Shuffled queue for guild {}", guild_id);
        Ok(())
    }

    pub async fn queue_view(&self, guild_id: GuildId) -> MusicResult<QueueView> {
        let call = self.call(guild_id)?;
        let handles = call.lock().await.queue().current_queue();

        let mut tracks = handles.iter().map(metadata_of);
        let current = tracks.next();
        let upcoming: Vec<TrackMetadata> = tracks.collect();

        Ok(QueueView {
            current,
            total_upcoming: upcoming.len(),
            upcoming: upcoming.into_iter().take(QUEUE_VIEW_LIMIT).collect(),
        })
    }
}

#[serenity::async_trait]
impl PlayerSource for MusicManager {
    async fn snapshot(&self, guild_id: GuildId) -> PlayerSnapshot {
        let Some(call) = self.songbird.get(guild_id) else {
            return PlayerSnapshot::absent();
        };

        let (connected, current, queue_length) = {
            let handler = call.lock().await;
            (
                handler.current_connection().is_some(),
                handler.queue().current(),
                handler.queue().len(),
            )
        };

        let mut snapshot = PlayerSnapshot {
            exists: true,
            current_track: None,
            position: Duration::ZERO,
            volume: self.volume(guild_id),
            state: if connected {
                PlayerState::NotPlaying
            } else {
                PlayerState::NotConnected
            },
            looping: false,
            queue_length: queue_length.saturating_sub(1),
        };

        let Some(track) = current else {
            return snapshot;
        };
        snapshot.current_track = Some(metadata_of(&track));

        match track.get_info().await {
            Ok(info) => {
                if connected {
                    snapshot.state = state_from_play_mode(&info.playing);
                }
                snapshot.position = info.position;
                snapshot.volume = info.volume;
                snapshot.looping = matches!(info.loops, LoopState::Infinite);
            }
            Err(e) => debug!("Track state unavailable in guild {}: {}", guild_id, e),
        }

        snapshot
    }

    fn subscribe(&self) -> broadcast::Receiver<GuildId> {
        self.track_end.subscribe()
    }
}

/// Point in a track at which its successor should start loading.
fn preload_time(duration: Option<Duration>) -> Option<Duration> {
    duration.map(|duration| duration.saturating_sub(PRELOAD_LEAD))
}

fn metadata_of(track: &TrackHandle) -> TrackMetadata {
    track.data::<TrackMetadata>().as_ref().clone()
}

pub fn state_from_play_mode(mode: &PlayMode) -> PlayerState {
    match mode {
        PlayMode::Play => PlayerState::Playing,
        PlayMode::Pause => PlayerState::Paused,
        PlayMode::Stop | PlayMode::End => PlayerState::NotPlaying,
        PlayMode::Errored(_) => PlayerState::Destroyed,
        #[allow(unreachable_patterns)]
        _ => PlayerState::NotPlaying,
    }
}

/// Skipping needs a current track and something queued after it.
pub fn check_skippable(has_current: bool, queue_length: usize) -> MusicResult<()> {
    if !has_current {
        Err(MusicError::NoTrack)
    } else if queue_length < 2 {
        Err(MusicError::EmptyQueue)
    } else {
        Ok(())
    }
}

/// A user may control the player only from the bot's own voice channel.
/// Without a connected bot there is nothing to guard.
pub fn check_same_channel(
    bot_channel: Option<ChannelId>,
    user_channel: Option<ChannelId>,
) -> MusicResult<()> {
    match bot_channel {
        Some(bot) if user_channel != Some(bot) => Err(MusicError::WrongVoiceChannel),
        _ => Ok(()),
    }
}

pub fn is_link(query: &str) -> bool {
    Url::parse(query.trim())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn manager() -> MusicManager {
        MusicManager::new(Songbird::serenity(), 0.2)
    }

    #[test_case(PlayMode::Play, PlayerState::Playing)]
    #[test_case(PlayMode::Pause, PlayerState::Paused)]
    #[test_case(PlayMode::Stop, PlayerState::NotPlaying)]
    #[test_case(PlayMode::End, PlayerState::NotPlaying)]
    fn play_modes_map_to_states(mode: PlayMode, expected: PlayerState) {
        assert_eq!(state_from_play_mode(&mode), expected);
    }

    #[test_case(Some(Duration::from_secs(200)), Some(Duration::from_secs(195)))]
    #[test_case(Some(Duration::from_secs(3)), Some(Duration::ZERO))]
    #[test_case(None, None)]
    fn preload_starts_shortly_before_the_end(duration: Option<Duration>, expected: Option<Duration>) {
        assert_eq!(preload_time(duration), expected);
    }

    #[test]
    fn skip_needs_an_upcoming_track() {
        assert_matches!(check_skippable(false, 0), Err(MusicError::NoTrack));
        assert_matches!(check_skippable(true, 1), Err(MusicError::EmptyQueue));
        assert!(check_skippable(true, 2).is_ok());
    }

    #[test]
    fn listener_check() {
        let bot = Some(ChannelId::new(1));

        assert!(check_same_channel(None, None).is_ok());
        assert!(check_same_channel(bot, Some(ChannelId::new(1))).is_ok());
        assert_matches!(
            check_same_channel(bot, Some(ChannelId::new(2))),
            Err(MusicError::WrongVoiceChannel)
        );
        assert_matches!(check_same_channel(bot, None), Err(MusicError::WrongVoiceChannel));
    }

    #[test_case("https://www.youtube.com/watch?v=abc", true)]
    #[test_case("http://example.com/a.mp3", true)]
    #[test_case("never gonna give you up", false)]
    #[test_case("ftp://example.com/a.mp3", false)]
    fn links_are_detected(query: &str, expected: bool) {
        assert_eq!(is_link(query), expected);
    }

    #[test]
    fn user_errors_have_localized_text() {
        assert_eq!(MusicError::NoActivePlayer.user_text(), Some(Text::NoPlayer));
        assert_eq!(
            MusicError::WrongVoiceChannel.user_text(),
            Some(Text::WrongVoiceChannel)
        );
        assert_eq!(MusicError::JoinError("boom".into()).user_text(), None);
    }

    #[tokio::test]
    async fn guild_without_call_has_no_player() {
        let manager = manager();
        let guild = GuildId::new(5);

        assert_eq!(manager.snapshot(guild).await, PlayerSnapshot::absent());
        assert_matches!(manager.skip(guild).await, Err(MusicError::NoActivePlayer));
        assert_matches!(manager.toggle_pause(guild).await, Err(MusicError::NoActivePlayer));
        assert_matches!(
            manager.set_volume(guild, 1.0).await,
            Err(MusicError::NoActivePlayer)
        );
        assert_eq!(manager.volume(guild), 0.2);
    }

    #[tokio::test]
    async fn play_requires_a_voice_channel() {
        let manager = manager();
        let result = manager
            .play(GuildId::new(5), None, TrackMetadata::default())
            .await;
        assert_matches!(result, Err(MusicError::UserNotInVoiceChannel));

        let result = manager
            .play_all(GuildId::new(5), None, vec![TrackMetadata::default()])
            .await;
        assert_matches!(result, Err(MusicError::UserNotInVoiceChannel));
    }
}
