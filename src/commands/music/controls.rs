use super::*;

/// Display the player controls in this channel
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn controls(ctx: Context<'_>) -> CommandResult {
    let locale = guild_locale(ctx);
    let guild_id = match guild_id(ctx) {
        Ok(guild_id) => guild_id,
        Err(err) => return reply_error(ctx, err).await,
    };

    ctx.defer_ephemeral().await?;
    ctx.data().sync.open(guild_id, ctx.channel_id()).await?;

    ctx.send(embedded_messages::ephemeral(locale.text(Text::PanelOpened)))
        .await?;
    Ok(())
}
