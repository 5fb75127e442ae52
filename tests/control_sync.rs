//! Control panel synchronization against fake players and a mocked Discord

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use mockall::Sequence;
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

use common::fixtures::*;
use common::init_tracing;
use common::mocks::{FakePlayers, HangingPlayers, MockMessenger, PanickingMessenger, SlowMessenger};
use tempo::commands::music::utils::control_panel;
use tempo::commands::music::utils::control_registry::ControlRegistry;
use tempo::commands::music::utils::control_sync::{
    ControlSync, RefreshOutcome, SyncSettings, TickReport,
};
use tempo::commands::music::utils::messenger::EditError;
use tempo::commands::music::utils::player::{PlayerSnapshot, PlayerSource};
use tempo::utils::bot_data::BotData;
use tempo::utils::locale::Locale;

const WAIT: Duration = Duration::from_secs(2);

/// Messenger that reports every successful edit on a channel
fn notifying_messenger() -> (MockMessenger, mpsc::UnboundedReceiver<u64>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut messenger = MockMessenger::new();
    messenger.expect_edit().returning(move |message, _| {
        let _ = tx.send(message.message_id.get());
        Ok(())
    });
    (messenger, rx)
}

#[tokio::test]
async fn test_unchanged_panel_is_not_edited() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(0);

    let sync = build_sync(players, messenger);
    let current = control_panel::render(&playing("Intro", 10), Locale::English);
    sync.registry().put(guild(1), message(1), current);

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Unchanged);
    assert_eq!(
        sync.tick().await,
        TickReport {
            unchanged: 1,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn test_changed_panel_is_edited_once_and_recorded() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 50));

    let mut messenger = MockMessenger::new();
    messenger
        .expect_edit()
        .with(eq(message(1)), always())
        .times(1)
        .returning(|_, _| Ok(()));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Updated);
    let entry = sync.registry().get(guild(1)).expect("entry kept");
    assert_eq!(
        entry.last_rendered,
        control_panel::render(&playing("Intro", 50), Locale::English)
    );

    // Nothing moved, so the second pass must not touch Discord
    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Unchanged);
}

#[tokio::test]
async fn test_deleted_panel_is_evicted() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let mut messenger = MockMessenger::new();
    messenger
        .expect_edit()
        .times(1)
        .returning(|_, _| Err(EditError::NotFound));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Evicted);
    assert!(sync.registry().get(guild(1)).is_none());
    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Absent);
}

#[tokio::test]
async fn test_transient_failure_keeps_entry() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let mut messenger = MockMessenger::new();
    messenger
        .expect_edit()
        .times(2)
        .returning(|_, _| Err(EditError::Transient("rate limited".to_string())));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Failed);
    let entry = sync.registry().get(guild(1)).expect("entry kept");
    assert_eq!(entry.message, message(1));
    assert_eq!(entry.last_rendered, stale_panel());

    // Retried on the next pass because nothing was recorded
    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Failed);
}

#[tokio::test]
async fn test_slow_edit_times_out_as_failure() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let settings = SyncSettings {
        edit_timeout: Duration::from_millis(20),
        ..fast_settings()
    };
    let sync = build_sync_with(
        players,
        SlowMessenger {
            delay: Duration::from_secs(5),
        },
        Arc::new(BotData::in_memory()),
        settings,
    );
    sync.registry().put(guild(1), message(1), stale_panel());

    let outcome = timeout(WAIT, sync.refresh(guild(1)))
        .await
        .expect("edit timeout should bound the refresh");
    assert_eq!(outcome, RefreshOutcome::Failed);
    assert!(sync.registry().contains(guild(1)));
}

#[tokio::test]
async fn test_one_tick_handles_many_guilds_independently() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    let failing: HashSet<u64> = [7, 42, 99].into_iter().collect();
    let failing_for_mock = failing.clone();

    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(100).returning(move |message, _| {
        if failing_for_mock.contains(&message.message_id.get()) {
            Err(EditError::Transient("rate limited".to_string()))
        } else {
            Ok(())
        }
    });

    let sync = build_sync(players.clone(), messenger);
    for id in 1..=100 {
        players.set(guild(id), playing(&format!("Track{}", id), id % 90));
        sync.registry().put(guild(id), message(id), stale_panel());
    }

    let report = sync.tick().await;
    assert_eq!(
        report,
        TickReport {
            updated: 97,
            failed: 3,
            ..Default::default()
        }
    );
    assert_eq!(report.total(), 100);
    assert_eq!(sync.registry().len(), 100);

    for id in failing {
        let entry = sync.registry().get(guild(id)).expect("entry kept");
        assert_eq!(entry.last_rendered, stale_panel());
    }
}

#[tokio::test]
async fn test_panel_for_missing_player_is_rendered() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());

    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(1).returning(|_, _| Ok(()));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Updated);
    let entry = sync.registry().get(guild(1)).expect("entry kept");
    assert_eq!(
        entry.last_rendered,
        control_panel::render(&PlayerSnapshot::absent(), Locale::English)
    );
}

#[tokio::test]
async fn test_locale_change_rerenders_panel() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));
    let bot_data = Arc::new(BotData::in_memory());

    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(1).returning(|_, _| Ok(()));

    let sync = build_sync_with(players, messenger, bot_data.clone(), fast_settings());
    let english = control_panel::render(&playing("Intro", 10), Locale::English);
    sync.registry().put(guild(1), message(1), english);

    bot_data
        .set_locale(guild(1), Locale::Russian)
        .expect("in-memory store accepts writes");

    assert_eq!(sync.refresh(guild(1)).await, RefreshOutcome::Updated);
    let entry = sync.registry().get(guild(1)).expect("entry kept");
    assert_eq!(
        entry.last_rendered,
        control_panel::render(&playing("Intro", 10), Locale::Russian)
    );
}

#[tokio::test]
async fn test_open_replaces_previous_panel() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let mut seq = Sequence::new();
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(message(1)));
    messenger
        .expect_delete()
        .with(eq(message(1)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    messenger
        .expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(message(2)));

    let sync = build_sync(players, messenger);
    assert_eq!(sync.open(guild(1), channel()).await.unwrap(), message(1));
    assert_eq!(sync.open(guild(1), channel()).await.unwrap(), message(2));

    assert_eq!(sync.registry().len(), 1);
    let entry = sync.registry().get(guild(1)).expect("entry kept");
    assert_eq!(entry.message, message(2));
    assert_eq!(
        entry.last_rendered,
        control_panel::render(&playing("Intro", 10), Locale::English)
    );
}

#[tokio::test]
async fn test_open_tolerates_already_deleted_previous_panel() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());

    let mut messenger = MockMessenger::new();
    messenger
        .expect_delete()
        .with(eq(message(1)))
        .times(1)
        .returning(|_| Err(EditError::NotFound));
    messenger
        .expect_send()
        .times(1)
        .returning(|_, _, _| Ok(message(2)));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert_eq!(sync.open(guild(1), channel()).await.unwrap(), message(2));
    assert_eq!(sync.registry().get(guild(1)).unwrap().message, message(2));
}

#[tokio::test]
async fn test_failed_open_registers_nothing() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());

    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .times(1)
        .returning(|_, _, _| Err(EditError::Transient("missing permissions".to_string())));

    let sync = build_sync(players, messenger);
    assert_matches!(
        sync.open(guild(1), channel()).await,
        Err(EditError::Transient(_))
    );
    assert!(sync.registry().is_empty());
}

#[tokio::test]
async fn test_close_removes_and_deletes_panel() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());

    let mut messenger = MockMessenger::new();
    messenger
        .expect_delete()
        .with(eq(message(1)))
        .times(1)
        .returning(|_| Ok(()));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    assert!(sync.close(guild(1)).await);
    assert!(sync.registry().is_empty());
    assert!(!sync.close(guild(1)).await);
}

#[tokio::test]
async fn test_request_refresh_without_panel_is_skipped() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(0);

    let sync = build_sync(players, messenger);
    assert!(sync.request_refresh(guild(1)).is_none());
}

#[tokio::test]
async fn test_request_refresh_updates_in_background() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(1).returning(|_, _| Ok(()));

    let sync = build_sync(players, messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    let handle = sync.request_refresh(guild(1)).expect("refresh scheduled");
    assert_eq!(handle.await.unwrap(), RefreshOutcome::Updated);
}

#[tokio::test]
async fn test_track_end_triggers_refresh() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Next", 0));
    let (messenger, mut edits) = notifying_messenger();

    let sync = build_sync(players.clone(), messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = tokio::spawn(
        sync.clone()
            .run_track_end_listener(players.subscribe(), shutdown_rx),
    );

    players.end_track(guild(1));
    let edited = timeout(WAIT, edits.recv()).await.expect("edit after track end");
    assert_eq!(edited, Some(1));

    shutdown_tx.send(true).unwrap();
    timeout(WAIT, listener)
        .await
        .expect("listener stops on shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_periodic_loop_refreshes_and_stops_on_shutdown() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));
    let (messenger, mut edits) = notifying_messenger();

    let sync = build_sync(players.clone(), messenger);
    sync.registry().put(guild(1), message(1), stale_panel());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let tasks = sync.start(shutdown_rx);

    assert_eq!(timeout(WAIT, edits.recv()).await.unwrap(), Some(1));

    // Playback moves on and the next tick picks it up
    players.set(guild(1), playing("Intro", 11));
    assert_eq!(timeout(WAIT, edits.recv()).await.unwrap(), Some(1));

    shutdown_tx.send(true).unwrap();
    timeout(WAIT, tasks.join())
        .await
        .expect("both loops stop on shutdown");
}

#[tokio::test]
async fn test_loops_stop_when_shutdown_sender_is_dropped() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    let messenger = MockMessenger::new();

    let sync = build_sync(players, messenger);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let tasks = sync.start(shutdown_rx);

    drop(shutdown_tx);
    timeout(WAIT, tasks.join())
        .await
        .expect("both loops stop once the sender is gone");
}

#[tokio::test]
async fn test_stuck_player_does_not_stall_the_tick() {
    init_tracing();
    let settings = SyncSettings {
        edit_timeout: Duration::from_millis(50),
        ..fast_settings()
    };
    let mut messenger = MockMessenger::new();
    messenger.expect_edit().times(0);

    let sync = build_sync_with(
        Arc::new(HangingPlayers::new()),
        messenger,
        Arc::new(BotData::in_memory()),
        settings,
    );
    for id in 1..=3 {
        sync.registry().put(guild(id), message(id), stale_panel());
    }

    let report = timeout(WAIT, sync.tick())
        .await
        .expect("a stuck player must not hold up the tick");
    assert_eq!(
        report,
        TickReport {
            failed: 3,
            ..Default::default()
        }
    );
    assert_eq!(sync.registry().len(), 3);
}

#[tokio::test]
async fn test_open_racing_another_open_keeps_only_the_newest() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    let registry = Arc::new(ControlRegistry::new());
    let racing_registry = registry.clone();

    let mut messenger = MockMessenger::new();
    messenger.expect_send().times(1).returning(move |_, _, _| {
        // Another open lands while this one is still sending
        racing_registry.put(guild(1), message(9), stale_panel());
        Ok(message(2))
    });
    messenger
        .expect_delete()
        .with(eq(message(9)))
        .times(1)
        .returning(|_| Ok(()));

    let sync = ControlSync::new(
        registry.clone(),
        players,
        Arc::new(messenger),
        Arc::new(BotData::in_memory()),
        fast_settings(),
    );

    assert_eq!(sync.open(guild(1), channel()).await.unwrap(), message(2));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(guild(1)).unwrap().message, message(2));
}

#[tokio::test]
async fn test_panicking_refresh_is_reported_as_failure() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));

    let settings = SyncSettings {
        max_event_refreshes: 1,
        ..fast_settings()
    };
    let sync = build_sync_with(
        players,
        PanickingMessenger,
        Arc::new(BotData::in_memory()),
        settings,
    );
    sync.registry().put(guild(1), message(1), stale_panel());

    let handle = sync.request_refresh(guild(1)).expect("refresh scheduled");
    assert_eq!(handle.await.unwrap(), RefreshOutcome::Failed);
    assert!(sync.registry().contains(guild(1)));

    // The permit came back even though the refresh panicked
    let handle = sync.request_refresh(guild(1)).expect("permit released");
    assert_eq!(handle.await.unwrap(), RefreshOutcome::Failed);
}

#[tokio::test]
async fn test_refreshes_beyond_the_cap_are_left_to_the_tick() {
    init_tracing();
    let players = Arc::new(FakePlayers::new());
    players.set(guild(1), playing("Intro", 10));
    players.set(guild(2), playing("Outro", 10));

    let settings = SyncSettings {
        max_event_refreshes: 1,
        edit_timeout: Duration::from_secs(1),
        ..fast_settings()
    };
    let sync = build_sync_with(
        players,
        SlowMessenger {
            delay: Duration::from_millis(100),
        },
        Arc::new(BotData::in_memory()),
        settings,
    );
    sync.registry().put(guild(1), message(1), stale_panel());
    sync.registry().put(guild(2), message(2), stale_panel());

    let first = sync.request_refresh(guild(1)).expect("first refresh scheduled");
    assert!(sync.request_refresh(guild(2)).is_none());

    assert_eq!(first.await.unwrap(), RefreshOutcome::Updated);
    let second = sync.request_refresh(guild(2)).expect("permit available again");
    assert_eq!(second.await.unwrap(), RefreshOutcome::Updated);
}
