//! The Discord side of the control panel: sending, editing and deleting the
//! panel message.

use serenity::all::{ChannelId, CreateMessage, EditMessage, Http, MessageId};
use serenity::async_trait;
use serenity::http::HttpError;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::button_controls::control_buttons;
use super::control_panel::RenderedPanel;
use crate::utils::locale::Locale;

/// Discord's JSON error code for "Unknown Message".
const UNKNOWN_MESSAGE: isize = 10008;

/// Address of a control panel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

#[derive(Debug, Error)]
pub enum EditError {
    /// The message was deleted or can no longer be reached. Retrying is pointless.
    #[error("Control message no longer exists")]
    NotFound,

    #[error("Transient messaging failure: {0}")]
    Transient(String),
}

#[async_trait]
pub trait ControlMessenger: Send + Sync {
    async fn edit(&self, message: ControlMessage, panel: &RenderedPanel) -> Result<(), EditError>;

    async fn delete(&self, message: ControlMessage) -> Result<(), EditError>;

    /// Posts a new panel, with its buttons, and returns where it landed.
    async fn send(
        &self,
        channel_id: ChannelId,
        panel: &RenderedPanel,
        locale: Locale,
    ) -> Result<ControlMessage, EditError>;
}

/// [`ControlMessenger`] backed by the Discord REST API.
pub struct SerenityMessenger {
    http: Arc<Http>,
}

impl SerenityMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ControlMessenger for SerenityMessenger {
    async fn edit(&self, message: ControlMessage, panel: &RenderedPanel) -> Result<(), EditError> {
        let edit = EditMessage::new().embed(panel.to_embed());
        message
            .channel_id
            .edit_message(&self.http, message.message_id, edit)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete(&self, message: ControlMessage) -> Result<(), EditError> {
        self.http
            .delete_message(message.channel_id, message.message_id, None)
            .await
            .map_err(classify)
    }

    async fn send(
        &self,
        channel_id: ChannelId,
        panel: &RenderedPanel,
        locale: Locale,
    ) -> Result<ControlMessage, EditError> {
        let create_message = CreateMessage::new()
            .embed(panel.to_embed())
            .components(control_buttons(locale));

        let message = channel_id
            .send_message(&self.http, create_message)
            .await
            .map_err(classify)?;

        debug!("Sent control panel {} in channel {}", message.id, channel_id);
        Ok(ControlMessage {
            channel_id,
            message_id: message.id,
        })
    }
}

/// Splits Discord failures into "the message is gone" and everything else.
pub fn classify(error: serenity::Error) -> EditError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &error {
        if response.status_code.as_u16() == 404 || response.error.code == UNKNOWN_MESSAGE {
            return EditError::NotFound;
        }
    }
    EditError::Transient(error.to_string())
}
