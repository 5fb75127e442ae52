use poise::serenity_prelude as serenity;
use serenity::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

/// Event handler for when a song ends.
///
/// Registered as a global track event on every call, so it fires for each
/// track the builtin queue finishes. The queue advances on its own; this only
/// tells the rest of the bot which guild changed.
pub struct TrackEndNotifier {
    pub guild_id: serenity::GuildId,
    pub sender: broadcast::Sender<serenity::GuildId>,
}

impl TrackEndNotifier {
    pub fn new(guild_id: serenity::GuildId, sender: broadcast::Sender<serenity::GuildId>) -> Self {
        Self { guild_id, sender }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(tracks) = ctx {
            debug!(
                "{} track(s) ended for guild {}",
                tracks.len(),
                self.guild_id
            );
            // Nobody listening is fine
            let _ = self.sender.send(self.guild_id);
        }
        None
    }
}
