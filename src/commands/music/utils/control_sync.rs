//! Keeps every open control panel in step with its guild's player.
//!
//! Two triggers feed the same refresh: a fixed-interval scan over all
//! registered panels, and a one-off refresh when a guild's track ends. A
//! refresh always reads a fresh snapshot and only edits the message when the
//! rendered panel differs from what was last written, so overlapping
//! refreshes of one guild cost at most a redundant identical edit.

use futures::FutureExt;
use futures::future::join_all;
use serenity::model::id::{ChannelId, GuildId};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Semaphore, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, error, info, warn};

use super::control_panel::{self, RenderedPanel};
use super::control_registry::{ControlEntry, ControlRegistry};
use super::messenger::{ControlMessage, ControlMessenger, EditError};
use super::player::{PlayerSnapshot, PlayerSource};
use crate::config::Config;
use crate::utils::bot_data::BotData;

/// What a single refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The guild has no open panel.
    Absent,
    Unchanged,
    Updated,
    /// The panel message was gone; its entry has been dropped.
    Evicted,
    /// The edit failed or timed out; the entry is kept for the next tick.
    Failed,
}

/// Tally of one periodic tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub unchanged: usize,
    pub updated: usize,
    pub evicted: usize,
    pub failed: usize,
}

impl TickReport {
    fn record(&mut self, outcome: RefreshOutcome) {
        match outcome {
            RefreshOutcome::Absent => {}
            RefreshOutcome::Unchanged => self.unchanged += 1,
            RefreshOutcome::Updated => self.updated += 1,
            RefreshOutcome::Evicted => self.evicted += 1,
            RefreshOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unchanged + self.updated + self.evicted + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub interval: Duration,
    pub edit_timeout: Duration,
    /// Cap on concurrently running track-end refreshes.
    pub max_event_refreshes: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2500),
            edit_timeout: Duration::from_secs(5),
            max_event_refreshes: 16,
        }
    }
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.sync_interval,
            edit_timeout: config.edit_timeout,
            max_event_refreshes: config.max_event_refreshes,
        }
    }
}

/// Handles of the two background loops started by [`ControlSync::start`].
pub struct SyncTasks {
    pub periodic: JoinHandle<()>,
    pub track_end: JoinHandle<()>,
}

impl SyncTasks {
    /// Waits for both loops to finish after shutdown was signalled.
    pub async fn join(self) {
        for (name, task) in [("periodic", self.periodic), ("track-end", self.track_end)] {
            if let Err(e) = task.await {
                error!("Control panel {} loop ended abnormally: {}", name, e);
            }
        }
    }
}

pub struct ControlSync {
    registry: Arc<ControlRegistry>,
    players: Arc<dyn PlayerSource>,
    messenger: Arc<dyn ControlMessenger>,
    bot_data: Arc<BotData>,
    settings: SyncSettings,
    event_permits: Arc<Semaphore>,
}

impl ControlSync {
    pub fn new(
        registry: Arc<ControlRegistry>,
        players: Arc<dyn PlayerSource>,
        messenger: Arc<dyn ControlMessenger>,
        bot_data: Arc<BotData>,
        settings: SyncSettings,
    ) -> Self {
        let event_permits = Arc::new(Semaphore::new(settings.max_event_refreshes));
        Self {
            registry,
            players,
            messenger,
            bot_data,
            settings,
            event_permits,
        }
    }

    pub fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    fn render(&self, guild_id: GuildId, snapshot: &PlayerSnapshot) -> RenderedPanel {
        control_panel::render(snapshot, self.bot_data.locale(guild_id))
    }

    /// Opens a control panel in `channel_id`, replacing the guild's previous
    /// panel if there was one.
    pub async fn open(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<ControlMessage, EditError> {
        if let Some(previous) = self.registry.remove(guild_id) {
            self.delete_panel(guild_id, previous.message).await;
        }

        let snapshot = self.players.snapshot(guild_id).await;
        let rendered = self.render(guild_id, &snapshot);
        let message = self
            .messenger
            .send(channel_id, &rendered, self.bot_data.locale(guild_id))
            .await?;

        // A concurrent open may have slipped in between; keep only the newest
        if let Some(raced) = self.registry.put(guild_id, message, rendered) {
            if raced.message != message {
                self.delete_panel(guild_id, raced.message).await;
            }
        }

        info!(
            "Opened control panel {} for guild {}",
            message.message_id, guild_id
        );
        Ok(message)
    }

    /// Closes the guild's panel. Returns false if none was open.
    pub async fn close(&self, guild_id: GuildId) -> bool {
        match self.registry.remove(guild_id) {
            Some(entry) => {
                self.delete_panel(guild_id, entry.message).await;
                info!("Closed control panel for guild {}", guild_id);
                true
            }
            None => false,
        }
    }

    async fn delete_panel(&self, guild_id: GuildId, message: ControlMessage) {
        match self.messenger.delete(message).await {
            Ok(()) | Err(EditError::NotFound) => {}
            Err(e) => warn!(
                "Failed to delete control panel {} for guild {}: {}",
                message.message_id, guild_id, e
            ),
        }
    }

    /// Refreshes the guild's panel if it has one.
    pub async fn refresh(&self, guild_id: GuildId) -> RefreshOutcome {
        match self.registry.get(guild_id) {
            Some(entry) => self.refresh_entry(guild_id, entry).await,
            None => RefreshOutcome::Absent,
        }
    }

    async fn refresh_entry(&self, guild_id: GuildId, entry: ControlEntry) -> RefreshOutcome {
        let snapshot = match timeout(self.settings.edit_timeout, self.players.snapshot(guild_id)).await
        {
            Ok(snapshot) => snapshot,
            Err(_) => {
                warn!(
                    "Reading the player of guild {} timed out after {:?}",
                    guild_id, self.settings.edit_timeout
                );
                return RefreshOutcome::Failed;
            }
        };
        let rendered = self.render(guild_id, &snapshot);

        if rendered == entry.last_rendered {
            return RefreshOutcome::Unchanged;
        }

        let result = timeout(
            self.settings.edit_timeout,
            self.messenger.edit(entry.message, &rendered),
        )
        .await;

        match result {
            Ok(Ok(())) => {
                self.registry
                    .record_rendered(guild_id, entry.message, rendered);
                debug!("Updated control panel for guild {}", guild_id);
                RefreshOutcome::Updated
            }
            Ok(Err(EditError::NotFound)) => {
                self.registry.remove_if_message(guild_id, entry.message);
                info!(
                    "Control panel for guild {} was deleted, dropping it",
                    guild_id
                );
                RefreshOutcome::Evicted
            }
            Ok(Err(e)) => {
                warn!("Failed to update control panel for guild {}: {}", guild_id, e);
                RefreshOutcome::Failed
            }
            Err(_) => {
                warn!(
                    "Updating control panel for guild {} timed out after {:?}",
                    guild_id, self.settings.edit_timeout
                );
                RefreshOutcome::Failed
            }
        }
    }

    /// Refreshes every registered panel concurrently.
    pub async fn tick(&self) -> TickReport {
        let refreshes = self
            .registry
            .entries()
            .into_iter()
            .map(|(guild_id, entry)| self.refresh_entry(guild_id, entry));

        let mut report = TickReport::default();
        for outcome in join_all(refreshes).await {
            report.record(outcome);
        }
        report
    }

    /// Schedules a single refresh of a guild's panel without waiting for it.
    ///
    /// Returns `None` when the guild has no panel or too many refreshes are
    /// already in flight; the periodic tick picks those up.
    pub fn request_refresh(self: &Arc<Self>, guild_id: GuildId) -> Option<JoinHandle<RefreshOutcome>> {
        if !self.registry.contains(guild_id) {
            return None;
        }

        let Ok(permit) = Arc::clone(&self.event_permits).try_acquire_owned() else {
            debug!(
                "Refresh limit reached, leaving guild {} to the next tick",
                guild_id
            );
            return None;
        };

        let sync = Arc::clone(self);
        Some(tokio::spawn(async move {
            let _permit = permit;
            match AssertUnwindSafe(sync.refresh(guild_id)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("Control panel refresh for guild {} panicked", guild_id);
                    RefreshOutcome::Failed
                }
            }
        }))
    }

    /// Runs the periodic scan until `shutdown` turns true or its sender is dropped.
    pub async fn run_periodic(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Control panel sync started with a {:?} interval",
            self.settings.interval
        );

        while !*shutdown.borrow() {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let report = self.tick().await;
                    if report.updated + report.evicted + report.failed > 0 {
                        debug!(
                            "Control panel tick: {} updated, {} unchanged, {} evicted, {} failed",
                            report.updated, report.unchanged, report.evicted, report.failed
                        );
                    }
                }
            }
        }

        info!("Control panel sync stopped");
    }

    /// Turns track-end notifications into single refreshes.
    pub async fn run_track_end_listener(
        self: Arc<Self>,
        mut events: broadcast::Receiver<GuildId>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        while !*shutdown.borrow() {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                event = events.recv() => match event {
                    Ok(guild_id) => {
                        debug!("Track ended in guild {}, refreshing its panel", guild_id);
                        self.request_refresh(guild_id);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} track end notifications", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }

        debug!("Track end listener stopped");
    }

    /// Starts both loops in the background.
    pub fn start(self: &Arc<Self>, shutdown: watch::Receiver<bool>) -> SyncTasks {
        let events = self.players.subscribe();
        SyncTasks {
            periodic: tokio::spawn(Arc::clone(self).run_periodic(shutdown.clone())),
            track_end: tokio::spawn(Arc::clone(self).run_track_end_listener(events, shutdown)),
        }
    }
}
