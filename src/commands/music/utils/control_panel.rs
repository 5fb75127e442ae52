//! Rendering of the now-playing control panel.
//!
//! Rendering is a pure function of the player snapshot and the guild locale:
//! the same input always produces byte-identical output, which is what lets
//! the sync loop skip edits when nothing changed.

use serenity::all::{Colour, CreateEmbed};

use super::format_duration;
use super::player::{PlayerSnapshot, PlayerState};
use crate::utils::locale::{Locale, Text};

/// Width of the wrapped title lines and of the seek bar.
pub const PANEL_WIDTH: usize = 35;

const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '▁';
const NO_TRACK_TIME: &str = "00:00/00:00";
const PANEL_COLOUR: Colour = Colour::new(0x9b59b6);

/// The "Link" field shown under the panel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkField {
    pub label: String,
    pub url: String,
}

/// Output of a render. Two panels are equal exactly when the remote message
/// would look the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanel {
    pub body: String,
    pub link: Option<LinkField>,
}

impl RenderedPanel {
    pub fn to_embed(&self) -> CreateEmbed {
        let embed = CreateEmbed::new()
            .description(&self.body)
            .colour(PANEL_COLOUR);

        match &self.link {
            Some(link) => embed.field(&link.label, &link.url, false),
            None => embed,
        }
    }
}

pub fn render(snapshot: &PlayerSnapshot, locale: Locale) -> RenderedPanel {
    render_with_width(snapshot, locale, PANEL_WIDTH)
}

pub fn render_with_width(snapshot: &PlayerSnapshot, locale: Locale, width: usize) -> RenderedPanel {
    if !snapshot.exists {
        return RenderedPanel {
            body: locale.text(Text::NoPlayer).to_string(),
            link: None,
        };
    }

    let link = snapshot
        .current_track
        .as_ref()
        .and_then(|track| track.url.clone())
        .map(|url| LinkField {
            label: locale.text(Text::LinkLabel).to_string(),
            url,
        });

    RenderedPanel {
        body: format!("```\n{}\n```", status_block(snapshot, locale, width)),
        link,
    }
}

/// The text inside the panel's code block.
pub fn status_block(snapshot: &PlayerSnapshot, locale: Locale, width: usize) -> String {
    let width = width.max(1);

    let (heading, time) = match &snapshot.current_track {
        Some(track) => {
            let heading = format!(
                "{}\n{}",
                hard_wrap(&track.title, width),
                hard_wrap(&format!("{} {}", locale.text(Text::By), track.author), width)
            );
            let total = track
                .duration
                .map(format_duration)
                .unwrap_or_else(|| "Stream".to_string());
            (heading, format!("{}/{}", format_duration(snapshot.position), total))
        }
        None => (
            hard_wrap(locale.text(Text::NoTrack), width),
            NO_TRACK_TIME.to_string(),
        ),
    };

    let status = format!(
        "{} {} 🔊{}% {} 📃{}",
        state_glyph(snapshot.state),
        time,
        volume_percent(snapshot.volume),
        loop_glyph(snapshot.looping),
        snapshot.queue_length
    );

    format!(
        "{}\n\n{}\n{}",
        heading,
        seek_bar(progress(snapshot), width),
        status
    )
}

pub fn state_glyph(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Playing => "▶",
        PlayerState::Paused => "❘❘",
        PlayerState::NotPlaying => "■",
        PlayerState::Destroyed => "❌",
        PlayerState::NotConnected => "🔌",
    }
}

fn loop_glyph(looping: bool) -> &'static str {
    if looping { "⭯" } else { "➡" }
}

fn volume_percent(volume: f32) -> i64 {
    (f64::from(volume) * 100.0).round() as i64
}

/// Fraction of the current track already played, clamped to `[0, 1]`.
fn progress(snapshot: &PlayerSnapshot) -> f64 {
    let Some(duration) = snapshot
        .current_track
        .as_ref()
        .and_then(|track| track.duration)
        .filter(|duration| !duration.is_zero())
    else {
        return 0.0;
    };

    let ratio = snapshot.position.as_secs_f64() / duration.as_secs_f64();
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

/// A bar of `width` cells with the first `floor(percent * width)` filled.
fn seek_bar(percent: f64, width: usize) -> String {
    let filled = ((percent * width as f64).floor() as usize).min(width);
    let mut bar = String::with_capacity(width * FILLED_CELL.len_utf8());
    bar.extend(std::iter::repeat_n(FILLED_CELL, filled));
    bar.extend(std::iter::repeat_n(EMPTY_CELL, width - filled));
    bar
}

/// Splits `text` into lines of exactly `width` characters, ignoring word boundaries.
fn hard_wrap(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
