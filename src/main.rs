use ::serenity::all::ClientBuilder;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tempo::commands::guild::guild;
use tempo::commands::music::player;
use tempo::commands::playlist::playlist;
use tempo::commands::music::utils::control_registry::ControlRegistry;
use tempo::commands::music::utils::control_sync::{ControlSync, SyncSettings};
use tempo::commands::music::utils::messenger::SerenityMessenger;
use tempo::commands::music::utils::music_manager::MusicManager;
use tempo::config::Config;
use tempo::utils::bot_data::BotData;
use tempo::{CommandResult, Context, Data, Error, events};

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tempo=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    let config = Config::from_env()?;
    let bot_data = Arc::new(BotData::load(&config.bot_data_path)?);

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let songbird = Songbird::serenity();
    let players = Arc::new(MusicManager::new(songbird.clone(), config.default_volume));

    // The panel loops only need REST access, so they get their own client
    let http = Arc::new(serenity::Http::new(&config.discord_token));
    let sync = Arc::new(ControlSync::new(
        Arc::new(ControlRegistry::new()),
        players.clone(),
        Arc::new(SerenityMessenger::new(http)),
        bot_data.clone(),
        SyncSettings::from(&config),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_tasks = sync.start(shutdown_rx);

    let token = config.discord_token;
    let data = Data {
        bot_data,
        players,
        sync,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![help(), player(), playlist(), guild()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .register_songbird_with(songbird)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    let result = client.start().await;

    // Stop refreshing panels once the gateway is down
    let _ = shutdown_tx.send(true);
    sync_tasks.join().await;
    info!("Bye");

    result.map_err(Into::into)
}
