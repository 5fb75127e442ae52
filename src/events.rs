use poise::serenity_prelude as serenity;
use serenity::all::ComponentInteraction;
use serenity::model::application::Interaction;
use tracing::{error, info};

use crate::commands::music::utils::button_controls::PLAYER_PREFIX;
use crate::commands::music::utils::component_handlers;
use crate::commands::playlist::utils::component_handlers as playlist_handlers;
use crate::commands::playlist::utils::playlist_buttons::PLAYLIST_PREFIX;
use crate::{Data, Error};

/// Gateway events the framework hands to us
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is connected", data_about_bot.user.name);
        }
        serenity::FullEvent::InteractionCreate {
            interaction: Interaction::Component(component),
        } if component.data.custom_id.starts_with(PLAYER_PREFIX) => {
            player_component_interaction(ctx, component, data).await;
        }
        serenity::FullEvent::InteractionCreate {
            interaction: Interaction::Component(component),
        } if component.data.custom_id.starts_with(PLAYLIST_PREFIX) => {
            if let Err(e) = playlist_handlers::handle_interaction(ctx, component, data).await {
                error!("Error handling playlist interaction: {}", e);
            }
        }
        _ => (),
    }
    Ok(())
}

/// Handle component interactions for components with identities starting with "player-"
async fn player_component_interaction(
    ctx: &serenity::Context,
    component: &ComponentInteraction,
    data: &Data,
) {
    if let Err(e) = component_handlers::handle_interaction(ctx, component, data).await {
        error!("Error handling component interaction: {}", e);
    }
}
