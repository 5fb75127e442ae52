pub(crate) mod controls;
pub(crate) mod leave;
pub(crate) mod looping;
pub(crate) mod pause;
pub(crate) mod play;
pub(crate) mod queue;
pub(crate) mod shuffle;
pub(crate) mod skip;
pub(crate) mod stop;
pub(crate) mod volume;

pub mod utils;

use crate::utils::locale::{Locale, Text};
use crate::{CommandResult, Context};
use poise::{CreateReply, serenity_prelude as serenity};
use serenity::model::id::{ChannelId, GuildId};
use tracing::error;
use utils::embedded_messages;
use utils::music_manager::{MusicError, MusicManager, MusicResult};

use controls::controls;
use leave::leave;
use looping::toggle_loop;
use pause::togglepause;
use play::play;
use queue::queue;
use shuffle::shuffle;
use skip::skip;
use stop::stop;
use volume::volume;

/// Music player commands
#[poise::command(
    slash_command,
    guild_only,
    category = "Music",
    subcommand_required,
    subcommands(
        "play",
        "controls",
        "togglepause",
        "skip",
        "stop",
        "leave",
        "toggle_loop",
        "shuffle",
        "volume",
        "queue"
    )
)]
pub async fn player(_ctx: Context<'_>) -> CommandResult {
    Ok(())
}

fn guild_id(ctx: Context<'_>) -> MusicResult<GuildId> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}

fn guild_locale(ctx: Context<'_>) -> Locale {
    ctx.guild_id()
        .map(|guild_id| ctx.data().bot_data.locale(guild_id))
        .unwrap_or_default()
}

/// Voice channel the invoking user sits in
fn author_voice_channel(ctx: Context<'_>, guild_id: GuildId) -> Option<ChannelId> {
    MusicManager::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id)
}

/// Resolves the guild and makes sure the author listens along with the bot.
async fn listener_guild(ctx: Context<'_>) -> MusicResult<GuildId> {
    let guild_id = guild_id(ctx)?;
    let user_channel = author_voice_channel(ctx, guild_id);
    ctx.data()
        .players
        .ensure_listener(guild_id, user_channel)
        .await?;
    Ok(guild_id)
}

/// Reports the outcome of a player action back to the author.
///
/// Errors the author can fix become a localized ephemeral message; anything
/// else is logged and answered with a generic apology.
async fn reply_outcome(ctx: Context<'_>, outcome: MusicResult<String>) -> CommandResult {
    match outcome {
        Ok(message) => {
            ctx.send(embedded_messages::ephemeral(message)).await?;
            if let Some(guild_id) = ctx.guild_id() {
                ctx.data().sync.request_refresh(guild_id);
            }
            Ok(())
        }
        Err(err) => reply_error(ctx, err).await,
    }
}

async fn reply_error(ctx: Context<'_>, err: MusicError) -> CommandResult {
    let locale = guild_locale(ctx);
    match err.user_text() {
        Some(text) => {
            ctx.send(embedded_messages::error_reply(locale.text(text)))
                .await?;
            Ok(())
        }
        None => {
            error!("Player command failed: {}", err);
            ctx.send(embedded_messages::error_reply(
                locale.text(Text::SomethingWentWrong),
            ))
            .await?;
            Ok(())
        }
    }
}
