//! Tracks the single control panel message each guild may have.

use dashmap::DashMap;
use serenity::model::id::GuildId;

use super::control_panel::RenderedPanel;
use super::messenger::ControlMessage;

/// A live control panel and what it currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEntry {
    pub message: ControlMessage,
    pub last_rendered: RenderedPanel,
}

/// Guild to control panel mapping shared by the commands and the sync loop.
///
/// Only the mapping lives here; deleting remote messages is up to the caller.
/// No method hands out a guard, so callers can hold results across awaits.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    entries: DashMap<GuildId, ControlEntry>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the panel for a guild, returning the entry it replaced.
    pub fn put(
        &self,
        guild_id: GuildId,
        message: ControlMessage,
        rendered: RenderedPanel,
    ) -> Option<ControlEntry> {
        self.entries.insert(
            guild_id,
            ControlEntry {
                message,
                last_rendered: rendered,
            },
        )
    }

    pub fn get(&self, guild_id: GuildId) -> Option<ControlEntry> {
        self.entries.get(&guild_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.entries.contains_key(&guild_id)
    }

    /// Removes the panel for a guild. Removing an absent entry is a no-op.
    pub fn remove(&self, guild_id: GuildId) -> Option<ControlEntry> {
        self.entries.remove(&guild_id).map(|(_, entry)| entry)
    }

    /// Removes the entry only if it still points at `message`, so a panel
    /// opened after the failing edit started is left alone.
    pub fn remove_if_message(&self, guild_id: GuildId, message: ControlMessage) -> bool {
        self.entries
            .remove_if(&guild_id, |_, entry| entry.message == message)
            .is_some()
    }

    /// Records what `message` now shows. Ignored if the guild's panel has
    /// since been closed or replaced.
    pub fn record_rendered(
        &self,
        guild_id: GuildId,
        message: ControlMessage,
        rendered: RenderedPanel,
    ) -> bool {
        match self.entries.get_mut(&guild_id) {
            Some(mut entry) if entry.message == message => {
                entry.last_rendered = rendered;
                true
            }
            _ => false,
        }
    }

    /// Copies out every entry so the caller can iterate without holding shard locks.
    pub fn entries(&self) -> Vec<(GuildId, ControlEntry)> {
        self.entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serenity::model::id::{ChannelId, MessageId};

    fn message(id: u64) -> ControlMessage {
        ControlMessage {
            channel_id: ChannelId::new(1),
            message_id: MessageId::new(id),
        }
    }

    fn panel(body: &str) -> RenderedPanel {
        RenderedPanel {
            body: body.to_string(),
            link: None,
        }
    }

    #[test]
    fn put_then_get() {
        let registry = ControlRegistry::new();
        let guild = GuildId::new(1);

        assert!(registry.put(guild, message(10), panel("a")).is_none());

        let entry = registry.get(guild).unwrap();
        assert_eq!(entry.message, message(10));
        assert_eq!(entry.last_rendered, panel("a"));
    }

    #[test]
    fn put_replaces_and_returns_previous_entry() {
        let registry = ControlRegistry::new();
        let guild = GuildId::new(1);
        registry.put(guild, message(10), panel("a"));

        let previous = registry.put(guild, message(11), panel("b")).unwrap();

        assert_eq!(previous.message, message(10));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(guild).unwrap().message, message(11));
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = ControlRegistry::new();
        let guild = GuildId::new(1);
        registry.put(guild, message(10), panel("a"));

        assert!(registry.remove(guild).is_some());
        assert!(registry.remove(guild).is_none());
        assert!(registry.get(guild).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_if_message_ignores_newer_panels() {
        let registry = ControlRegistry::new();
        let guild = GuildId::new(1);
        registry.put(guild, message(11), panel("b"));

        assert!(!registry.remove_if_message(guild, message(10)));
        assert!(registry.contains(guild));
        assert!(registry.remove_if_message(guild, message(11)));
        assert!(!registry.contains(guild));
    }

    #[test]
    fn record_rendered_only_updates_matching_message() {
        let registry = ControlRegistry::new();
        let guild = GuildId::new(1);
        registry.put(guild, message(11), panel("b"));

        assert!(!registry.record_rendered(guild, message(10), panel("stale")));
        assert_eq!(registry.get(guild).unwrap().last_rendered, panel("b"));

        assert!(registry.record_rendered(guild, message(11), panel("c")));
        assert_eq!(registry.get(guild).unwrap().last_rendered, panel("c"));

        assert!(!registry.record_rendered(GuildId::new(2), message(11), panel("c")));
    }

    #[test]
    fn entries_is_a_detached_copy() {
        let registry = ControlRegistry::new();
        for id in 1..=3 {
            registry.put(GuildId::new(id), message(id), panel("a"));
        }

        let entries = registry.entries();
        registry.remove(GuildId::new(1));

        assert_eq!(entries.len(), 3);
        assert_eq!(registry.len(), 2);
    }
}
