use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::{CreateActionRow, CreateEmbed};
use std::time::Duration;

use super::button_controls::playlink_button;
use super::format_duration;
use super::music_manager::QueueView;
use super::track_metadata::TrackMetadata;
use crate::utils::locale::{Locale, Text};

const SUCCESS_COLOUR: u32 = 0x00ff00;
const ERROR_COLOUR: u32 = 0xff0000;

fn duration_text(duration: Option<Duration>) -> String {
    duration
        .map(format_duration)
        .unwrap_or_else(|| "Stream".to_string())
}

/// A markdown link to the track, or just its title if it has no URL.
fn track_link(metadata: &TrackMetadata) -> String {
    match &metadata.url {
        Some(url) => format!("[{}]({})", metadata.title, url),
        None => metadata.title.clone(),
    }
}

/// Create an embed for when a song is added to the queue
pub fn added_to_queue(metadata: &TrackMetadata, position: usize, locale: Locale) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(format!("🎵 {}", locale.text(Text::Enqueued)))
        .description(format!(
            "{}\n{} {}",
            track_link(metadata),
            locale.text(Text::By),
            metadata.author
        ))
        .field(
            locale.text(Text::Duration),
            format!("`{}`", duration_text(metadata.duration)),
            true,
        )
        .field("#", format!("`{}`", position), true)
        .color(SUCCESS_COLOUR);

    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

/// Numbered search results with one button per result
pub fn search_results(query: &str, results: &[TrackMetadata]) -> CreateReply {
    let description = results
        .iter()
        .enumerate()
        .map(|(index, track)| {
            format!(
                "`{}.` {} - {} `{}`",
                index + 1,
                track_link(track),
                track.author,
                duration_text(track.duration)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let buttons = results
        .iter()
        .enumerate()
        .filter_map(|(index, track)| {
            track
                .url
                .as_deref()
                .map(|url| playlink_button(index + 1, url))
        })
        .collect::<Vec<_>>();

    let reply = CreateReply::default().embed(
        CreateEmbed::new()
            .title(format!("🔎 {}", query))
            .description(description)
            .color(SUCCESS_COLOUR),
    );

    if buttons.is_empty() {
        reply
    } else {
        reply.components(vec![CreateActionRow::Buttons(buttons)])
    }
}

/// Create an embed for the music queue
pub fn music_queue(view: &QueueView, locale: Locale) -> CreateEmbed {
    let mut description = String::new();

    if let Some(current) = &view.current {
        description.push_str(&locale.format(Text::NowPlaying, track_link(current)));
        description.push_str("\n\n");
    }

    if view.upcoming.is_empty() {
        description.push_str(locale.text(Text::QueueEmpty));
    } else {
        for (index, track) in view.upcoming.iter().enumerate() {
            description.push_str(&format!(
                "`{}.` {} `{}`\n",
                index + 1,
                track_link(track),
                duration_text(track.duration)
            ));
        }

        let hidden = view.total_upcoming.saturating_sub(view.upcoming.len());
        if hidden > 0 {
            description.push_str(&format!("… +{}", hidden));
        }
    }

    CreateEmbed::new()
        .title(format!(
            "📃 {} ({})",
            locale.text(Text::QueueTitle),
            view.total_upcoming
        ))
        .description(description)
        .color(SUCCESS_COLOUR)
}

/// An ephemeral error reply
pub fn error_reply(message: &str) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌")
                .description(message)
                .color(ERROR_COLOUR),
        )
        .ephemeral(true)
}

/// An ephemeral plain text reply
pub fn ephemeral(message: impl Into<String>) -> CreateReply {
    CreateReply::default().content(message).ephemeral(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn action_confirmations_are_private() {
        let reply = ephemeral("Skipped the current track.");

        assert_eq!(reply.ephemeral, Some(true));
        assert_eq!(reply.content.as_deref(), Some("Skipped the current track."));
    }

    #[test]
    fn errors_are_private() {
        assert_eq!(error_reply("nope").ephemeral, Some(true));
    }

    #[test]
    fn queue_lists_hidden_tracks() {
        let view = QueueView {
            current: None,
            upcoming: vec![TrackMetadata::default()],
            total_upcoming: 3,
        };

        let embed = serde_json::to_value(music_queue(&view, Locale::English)).unwrap();
        let description = embed["description"].as_str().unwrap();

        assert!(description.contains("Unknown Track"));
        assert!(description.ends_with("… +2"));
    }
}
