//! This module aggregates all the command modules for the bot.

/// Per-guild settings (e.g., response language).
pub mod guild;
/// Commands related to music playback and the control panel.
pub mod music;
/// User playlists that can be queued in any server.
pub mod playlist;
