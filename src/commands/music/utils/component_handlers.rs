use ::serenity::all::{
    ComponentInteraction, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, GuildId,
};
use poise::serenity_prelude::Context;
use tracing::{error, info, warn};

use super::button_controls::PanelAction;
use super::embedded_messages;
use super::music_manager::{MusicError, MusicManager, MusicResult, VOLUME_STEP};
use crate::utils::locale::{Locale, Text};
use crate::{Data, Error};

type ButtonInteractionResult = Result<(), Error>;

/// Handle a button interaction
pub async fn handle_interaction(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
) -> ButtonInteractionResult {
    let Some(action) = PanelAction::from_custom_id(&interaction.data.custom_id) else {
        warn!("Unknown button ID: {}", interaction.data.custom_id);
        return Ok(());
    };
    let Some(guild_id) = interaction.guild_id else {
        return Ok(());
    };
    let locale = data.bot_data.locale(guild_id);

    info!(
        "Button {:?} pressed by {} in guild {}",
        action, interaction.user.name, guild_id
    );

    match action {
        PanelAction::Queue => handle_queue(ctx, interaction, data, guild_id, locale).await,
        PanelAction::Close => {
            data.sync.close(guild_id).await;
            interaction.defer(ctx).await?;
            Ok(())
        }
        PanelAction::PlayLink(url) => {
            handle_play_link(ctx, interaction, data, guild_id, locale, &url).await
        }
        action => handle_player_action(ctx, interaction, data, guild_id, locale, action).await,
    }
}

/// Buttons that change playback. Only listeners in the bot's channel may use them.
async fn handle_player_action(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
    guild_id: GuildId,
    locale: Locale,
    action: PanelAction,
) -> ButtonInteractionResult {
    let players = &data.players;
    let user_channel = MusicManager::user_voice_channel(ctx, guild_id, interaction.user.id);

    let outcome: MusicResult<Option<Text>> = async {
        players.ensure_listener(guild_id, user_channel).await?;

        match action {
            PanelAction::SeekBack => players.seek_by(guild_id, false).await.map(|_| None),
            PanelAction::SeekForward => players.seek_by(guild_id, true).await.map(|_| None),
            PanelAction::PlayPause => players.toggle_pause(guild_id).await.map(|_| None),
            PanelAction::VolumeDown => players
                .adjust_volume(guild_id, -VOLUME_STEP)
                .await
                .map(|_| None),
            PanelAction::VolumeUp => players
                .adjust_volume(guild_id, VOLUME_STEP)
                .await
                .map(|_| None),
            PanelAction::Stop => players.stop(guild_id).await.map(|_| Some(Text::Stopped)),
            PanelAction::Skip => players.skip(guild_id).await.map(|_| Some(Text::Skipped)),
            PanelAction::Leave => players.leave(guild_id).await.map(|_| Some(Text::Left)),
            PanelAction::Shuffle => players
                .shuffle(guild_id)
                .await
                .map(|_| Some(Text::Shuffled)),
            PanelAction::Loop => players.toggle_loop(guild_id).await.map(|looping| {
                Some(if looping { Text::Looped } else { Text::Unlooped })
            }),
            PanelAction::Queue | PanelAction::Close | PanelAction::PlayLink(_) => Ok(None),
        }
    }
    .await;

    match outcome {
        Ok(None) => interaction.defer(ctx).await?,
        Ok(Some(text)) => respond_ephemeral(ctx, interaction, locale.text(text)).await?,
        Err(err) => return respond_error(ctx, interaction, err, locale).await,
    }

    // Show the change without waiting for the next tick
    data.sync.request_refresh(guild_id);
    Ok(())
}

async fn handle_queue(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
    guild_id: GuildId,
    locale: Locale,
) -> ButtonInteractionResult {
    match data.players.queue_view(guild_id).await {
        Ok(view) => {
            respond_embed(ctx, interaction, embedded_messages::music_queue(&view, locale)).await
        }
        Err(err) => respond_error(ctx, interaction, err, locale).await,
    }
}

/// Enqueues a track picked from search results.
async fn handle_play_link(
    ctx: &Context,
    interaction: &ComponentInteraction,
    data: &Data,
    guild_id: GuildId,
    locale: Locale,
    url: &str,
) -> ButtonInteractionResult {
    interaction.defer(ctx).await?;

    let user_channel = MusicManager::user_voice_channel(ctx, guild_id, interaction.user.id);
    let outcome = async {
        let track = data
            .players
            .search(url)
            .await?
            .into_iter()
            .next()
            .ok_or(MusicError::NoResults)?;
        let position = data
            .players
            .play(guild_id, user_channel, track.clone())
            .await?;
        Ok::<_, MusicError>((track, position))
    }
    .await;

    let followup = match outcome {
        Ok((track, position)) => CreateInteractionResponseFollowup::new().embed(
            embedded_messages::added_to_queue(&track, position, locale),
        ),
        Err(err) => {
            let text = match err.user_text() {
                Some(text) => locale.text(text),
                None => {
                    warn!("Failed to play {} in guild {}: {}", url, guild_id, err);
                    locale.text(Text::InvalidLink)
                }
            };
            CreateInteractionResponseFollowup::new()
                .content(text)
                .ephemeral(true)
        }
    };

    interaction.create_followup(ctx, followup).await?;
    data.sync.request_refresh(guild_id);
    Ok(())
}

async fn respond_ephemeral(
    ctx: &Context,
    interaction: &ComponentInteraction,
    content: &str,
) -> Result<(), ::serenity::Error> {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    interaction
        .create_response(ctx, CreateInteractionResponse::Message(message))
        .await
}

async fn respond_embed(
    ctx: &Context,
    interaction: &ComponentInteraction,
    embed: CreateEmbed,
) -> ButtonInteractionResult {
    let message = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true);
    interaction
        .create_response(ctx, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

/// User mistakes get a localized note; real failures are logged as well.
async fn respond_error(
    ctx: &Context,
    interaction: &ComponentInteraction,
    err: MusicError,
    locale: Locale,
) -> ButtonInteractionResult {
    let text = match err.user_text() {
        Some(text) => text,
        None => {
            error!("Button action failed: {}", err);
            Text::SomethingWentWrong
        }
    };
    respond_ephemeral(ctx, interaction, locale.text(text)).await?;
    Ok(())
}
