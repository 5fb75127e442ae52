//! Defines the `TrackMetadata` struct, the information attached to every
//! queued track and shown on the control panel.

use serde::{Deserialize, Serialize};
use songbird::input::AuxMetadata;
use std::time::Duration;

/// Unified representation of metadata for a playable track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// Uploader, artist or channel name.
    pub author: String,
    /// The direct URL to the track, if available.
    pub url: Option<String>,
    /// The duration of the track. `None` for live streams.
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            author: "Unknown Artist".to_string(),
            url: None,
            duration: None,
            thumbnail: None,
        }
    }
}

/// Converts the metadata reported by `yt-dlp` into `TrackMetadata`.
impl From<AuxMetadata> for TrackMetadata {
    fn from(value: AuxMetadata) -> Self {
        let defaults = Self::default();
        Self {
            title: value.title.or(value.track).unwrap_or(defaults.title),
            author: value.artist.or(value.channel).unwrap_or(defaults.author),
            url: value.source_url,
            duration: value.duration.filter(|d| !d.is_zero()),
            thumbnail: value.thumbnail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn falls_back_to_channel_and_track_name() {
        let aux = AuxMetadata {
            track: Some("Song".to_string()),
            channel: Some("Uploader".to_string()),
            source_url: Some("https://youtu.be/abc".to_string()),
            duration: Some(Duration::from_secs(200)),
            ..Default::default()
        };

        let metadata = TrackMetadata::from(aux);

        assert_eq!(metadata.title, "Song");
        assert_eq!(metadata.author, "Uploader");
        assert_eq!(metadata.url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(metadata.duration, Some(Duration::from_secs(200)));
    }

    #[test]
    fn zero_duration_is_treated_as_a_stream() {
        let aux = AuxMetadata {
            duration: Some(Duration::ZERO),
            ..Default::default()
        };

        let metadata = TrackMetadata::from(aux);

        assert_eq!(metadata.duration, None);
        assert_eq!(metadata.title, "Unknown Track");
    }
}
