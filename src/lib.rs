use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod events;
pub mod utils;

use commands::music::utils::control_sync::ControlSync;
use commands::music::utils::music_manager::MusicManager;
use utils::bot_data::BotData;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub bot_data: Arc<BotData>,
    pub players: Arc<MusicManager>,
    pub sync: Arc<ControlSync>,
}
