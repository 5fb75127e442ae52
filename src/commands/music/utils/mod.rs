pub mod button_controls;
pub mod component_handlers;
pub mod control_panel;
pub mod control_registry;
pub mod control_sync;
pub mod embedded_messages;
pub mod event_handlers;
pub mod messenger;
pub mod music_manager;
pub mod player;
pub mod track_metadata;

use std::time::Duration;

const SECONDS_PER_DAY: u64 = 86_400;
/// Durations this long are what live streams report.
const STREAM_DAYS: u64 = 1_000_000;

/// Formats a duration as `mm:ss`, `hh:mm:ss` past an hour and `d.hh:mm:ss`
/// past a day. Absurdly long durations are reported as `Stream`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / SECONDS_PER_DAY;
    if days >= STREAM_DAYS {
        return "Stream".to_string();
    }

    let hours = (total % SECONDS_PER_DAY) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}.{:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
