use super::*;
use ::serenity::all::Mentionable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ContributorChange {
    Add,
    Remove,
}

/// Rename a playlist you own
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn rename(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "New name"]
    #[max_length = 100]
    name: String,
) -> CommandResult {
    match ctx
        .data()
        .bot_data
        .rename_playlist(id.trim(), ctx.author().id, &name)
    {
        Ok(()) => {
            let message = guild_locale(ctx).format(Text::PlaylistRenamed, name.trim());
            reply_text(ctx, message).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}

/// Let someone else add tracks to your playlist, or take that back
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn contributor(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
    #[description = "Add or remove"] change: ContributorChange,
    #[description = "Who"] user: serenity::User,
) -> CommandResult {
    let allowed = change == ContributorChange::Add;
    let result = ctx
        .data()
        .bot_data
        .set_contributor(id.trim(), ctx.author().id, user.id, allowed);

    let locale = guild_locale(ctx);
    match result {
        Ok(false) => reply_text(ctx, locale.text(Text::ContributorUnchanged)).await,
        Ok(true) => {
            let text = if allowed {
                Text::ContributorAdded
            } else {
                Text::ContributorRemoved
            };
            reply_text(ctx, locale.format(text, user.mention())).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}

/// Delete a playlist you own
#[poise::command(slash_command, guild_only, category = "Playlist")]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "ID of the playlist"] id: String,
) -> CommandResult {
    let playlist = match find_playlist(ctx, &id) {
        Ok(playlist) => playlist,
        Err(err) => return reply_error(ctx, err).await,
    };
    if let Err(err) = playlist.ensure_owner(ctx.author().id) {
        return reply_error(ctx, err).await;
    }

    let view = playlist_views::delete_confirmation(&playlist, guild_locale(ctx));
    ctx.send(view.into_reply()).await?;
    Ok(())
}
