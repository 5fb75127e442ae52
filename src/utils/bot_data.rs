//! Per-guild configuration and user playlists persisted to a JSON file.
//!
//! The whole store is loaded once at start-up and rewritten after every
//! mutation. Reads never touch the disk.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serenity::model::id::{GuildId, UserId};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::locale::Locale;
use super::playlist::{Playlist, PlaylistError, match_score, normalize_name};
use crate::commands::music::utils::track_metadata::TrackMetadata;

/// Errors raised while reading or writing the bot data file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access bot data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bot data file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings a guild can change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    #[serde(default)]
    pub locale: Locale,
}

/// On-disk shape of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredData {
    #[serde(default)]
    guilds: HashMap<u64, GuildConfig>,
    #[serde(default)]
    playlists: Vec<Playlist>,
}

pub struct BotData {
    path: Option<PathBuf>,
    guilds: DashMap<GuildId, GuildConfig>,
    // Creation order is the listing order
    playlists: RwLock<Vec<Playlist>>,
    // Serialises whole-file rewrites
    save_lock: Mutex<()>,
}

impl BotData {
    /// A store with no backing file. Mutations are kept in memory only.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            guilds: DashMap::new(),
            playlists: RwLock::new(Vec::new()),
            save_lock: Mutex::new(()),
        }
    }

    /// Loads the store from `path`. A missing or empty file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let stored = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => {
                info!("Bot data file {:?} is empty, starting fresh.", path);
                StoredData::default()
            }
            Ok(content) => {
                let stored: StoredData = serde_json::from_str(&content)?;
                info!(
                    "Loaded configuration for {} guilds and {} playlists from {:?}.",
                    stored.guilds.len(),
                    stored.playlists.len(),
                    path
                );
                stored
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Bot data file {:?} not found, starting fresh.", path);
                StoredData::default()
            }
            Err(e) => return Err(e.into()),
        };

        let guilds = stored
            .guilds
            .into_iter()
            .filter(|(id, _)| *id != 0)
            .map(|(id, config)| (GuildId::new(id), config))
            .collect();

        Ok(Self {
            path: Some(path),
            guilds,
            playlists: RwLock::new(stored.playlists),
            save_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Configuration for a guild, or the defaults if it never changed anything.
    pub fn guild_config(&self, guild_id: GuildId) -> GuildConfig {
        self.guilds
            .get(&guild_id)
            .map(|config| config.value().clone())
            .unwrap_or_default()
    }

    pub fn locale(&self, guild_id: GuildId) -> Locale {
        self.guilds
            .get(&guild_id)
            .map(|config| config.locale)
            .unwrap_or_default()
    }

    pub fn set_locale(&self, guild_id: GuildId, locale: Locale) -> Result<(), StoreError> {
        self.guilds.entry(guild_id).or_default().locale = locale;
        info!("Locale for guild {} set to {}", guild_id, locale.code());
        self.save()
    }

    fn read_playlists(&self) -> RwLockReadGuard<'_, Vec<Playlist>> {
        self.playlists.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_playlists(&self) -> RwLockWriteGuard<'_, Vec<Playlist>> {
        self.playlists.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies `change` to one playlist and persists the store if it succeeds.
    fn modify_playlist<T>(
        &self,
        id: &str,
        change: impl FnOnce(&mut Playlist) -> Result<T, PlaylistError>,
    ) -> Result<T, PlaylistError> {
        let result = {
            let mut playlists = self.write_playlists();
            let playlist = playlists
                .iter_mut()
                .find(|playlist| playlist.id == id)
                .ok_or_else(|| PlaylistError::NotFound(id.to_string()))?;
            change(playlist)?
        };
        self.save()?;
        Ok(result)
    }

    /// Creates an empty playlist. Names are unique per owner.
    pub fn create_playlist(&self, owner: UserId, name: &str) -> Result<Playlist, PlaylistError> {
        let name = normalize_name(name)?;

        let playlist = {
            let mut playlists = self.write_playlists();
            if playlists
                .iter()
                .any(|playlist| playlist.owner == owner && playlist.name == name)
            {
                return Err(PlaylistError::AlreadyExists(name));
            }

            let mut id = Uuid::new_v4().simple().to_string();
            while playlists.iter().any(|playlist| playlist.id == id) {
                id = Uuid::new_v4().simple().to_string();
            }

            let playlist = Playlist {
                id,
                name,
                owner,
                contributors: Vec::new(),
                tracks: Vec::new(),
            };
            playlists.push(playlist.clone());
            playlist
        };

        info!("{} created playlist {} ({})", owner, playlist.name, playlist.id);
        self.save()?;
        Ok(playlist)
    }

    pub fn playlist(&self, id: &str) -> Option<Playlist> {
        self.read_playlists()
            .iter()
            .find(|playlist| playlist.id == id)
            .cloned()
    }

    /// Every playlist, or only those owned by `owner`, oldest first.
    pub fn playlists(&self, owner: Option<UserId>) -> Vec<Playlist> {
        self.read_playlists()
            .iter()
            .filter(|playlist| owner.is_none_or(|owner| playlist.owner == owner))
            .cloned()
            .collect()
    }

    /// Playlists whose names match `query`, best match first.
    pub fn search_playlists(&self, query: &str, owner: Option<UserId>) -> Vec<Playlist> {
        let mut scored: Vec<(u32, Playlist)> = self
            .playlists(owner)
            .into_iter()
            .map(|playlist| (match_score(&playlist.name, query), playlist))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, playlist)| playlist).collect()
    }

    /// Appends a track. Only the owner and contributors may do this.
    pub fn add_track(
        &self,
        id: &str,
        user: UserId,
        track: TrackMetadata,
    ) -> Result<Playlist, PlaylistError> {
        self.modify_playlist(id, |playlist| {
            playlist.ensure_contributor(user)?;
            playlist.tracks.push(track);
            Ok(playlist.clone())
        })
    }

    /// Removes the track at `index` (zero-based) and returns it.
    pub fn remove_track(
        &self,
        id: &str,
        user: UserId,
        index: usize,
    ) -> Result<TrackMetadata, PlaylistError> {
        self.modify_playlist(id, |playlist| {
            playlist.ensure_owner(user)?;
            if index >= playlist.tracks.len() {
                return Err(PlaylistError::TrackNotFound(index + 1));
            }
            Ok(playlist.tracks.remove(index))
        })
    }

    pub fn rename_playlist(&self, id: &str, user: UserId, name: &str) -> Result<(), PlaylistError> {
        let name = normalize_name(name)?;
        let taken = self
            .read_playlists()
            .iter()
            .any(|playlist| playlist.owner == user && playlist.name == name && playlist.id != id);
        if taken {
            return Err(PlaylistError::AlreadyExists(name));
        }

        self.modify_playlist(id, |playlist| {
            playlist.ensure_owner(user)?;
            playlist.name = name;
            Ok(())
        })
    }

    /// Grants or revokes a contributor. Returns false if nothing changed.
    pub fn set_contributor(
        &self,
        id: &str,
        user: UserId,
        contributor: UserId,
        allowed: bool,
    ) -> Result<bool, PlaylistError> {
        self.modify_playlist(id, |playlist| {
            playlist.ensure_owner(user)?;
            let present = playlist.contributors.contains(&contributor);

            if allowed && !present && !playlist.is_owner(contributor) {
                playlist.contributors.push(contributor);
                Ok(true)
            } else if !allowed && present {
                playlist.contributors.retain(|c| *c != contributor);
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    pub fn delete_playlist(&self, id: &str, user: UserId) -> Result<Playlist, PlaylistError> {
        let removed = {
            let mut playlists = self.write_playlists();
            let index = playlists
                .iter()
                .position(|playlist| playlist.id == id)
                .ok_or_else(|| PlaylistError::NotFound(id.to_string()))?;
            playlists[index].ensure_owner(user)?;
            playlists.remove(index)
        };

        info!("{} deleted playlist {} ({})", user, removed.name, removed.id);
        self.save()?;
        Ok(removed)
    }

    /// Rewrites the backing file with the current contents of the store.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _lock = self.save_lock.lock().unwrap_or_else(|e| e.into_inner());

        let stored = StoredData {
            guilds: self
                .guilds
                .iter()
                .map(|entry| (entry.key().get(), entry.value().clone()))
                .collect(),
            playlists: self.read_playlists().clone(),
        };
        let serialized = serde_json::to_string_pretty(&stored)?;

        // Write next to the target and rename so a crash never leaves a torn file
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, path)?;

        debug!("Saved bot data to {:?}", path);
        Ok(())
    }
}
