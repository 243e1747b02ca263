//! Integration tests for the connection lifecycle controller.

mod helpers;

use chrono::{Duration, Utc};

use gamehub_core::events::{ChatChannel, ChatMessage, EventKind, GameEvent, LogLine, PlayerRef};
use gamehub_core::types::game_server::GameServerKind;
use gamehub_core::types::id::GameServerId;

use helpers::{dialed_server, generic_server, harness, settle};

#[tokio::test]
async fn test_add_connects_and_populates_registry() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;

    app.manager.add(domain.id, id).await;

    assert_eq!(app.factory.create_count().await, 1);
    assert_eq!(app.factory.created_kinds().await, vec![GameServerKind::Rust]);

    let streams = app.factory.streams_for(id).await;
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].start_count(), 1);

    let registry = app.manager.registry();
    assert!(registry.contains(&id));
    assert_eq!(registry.domain_of(&id), Some(domain.id));
    assert!(registry.last_event_at(&id).is_some());
}

#[tokio::test]
async fn test_add_skips_disabled_server() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, false, true))
        .await;

    app.manager.add(domain.id, id).await;

    // The policy gate short-circuits before the adapter factory.
    assert_eq!(app.factory.create_count().await, 0);
    assert!(!app.manager.registry().contains(&id));
}

#[tokio::test]
async fn test_add_skips_unreachable_dialed_server() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, false))
        .await;

    app.manager.add(domain.id, id).await;

    assert_eq!(app.factory.create_count().await, 0);
    assert!(!app.manager.registry().contains(&id));
}

#[tokio::test]
async fn test_add_connects_unreachable_self_registering_server() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    // Reachability is meaningless for self-registering servers until they
    // identify, so the gate does not apply.
    app.control_plane
        .put_server(domain.id, generic_server(id, false))
        .await;

    app.manager.add(domain.id, id).await;

    assert_eq!(app.factory.create_count().await, 1);
    assert_eq!(
        app.factory.created_kinds().await,
        vec![GameServerKind::Generic]
    );
    assert!(app.manager.registry().contains(&id));
}

#[tokio::test]
async fn test_re_add_stops_first_emitter() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;

    app.manager.add(domain.id, id).await;
    app.manager.add(domain.id, id).await;

    let streams = app.factory.streams_for(id).await;
    assert_eq!(streams.len(), 2);
    // The first connection was torn down before the second was dialed.
    assert_eq!(streams[0].stop_count(), 1);
    assert_eq!(streams[1].start_count(), 1);
    assert_eq!(streams[1].stop_count(), 0);

    assert_eq!(app.manager.registry().len(), 1);
}

#[tokio::test]
async fn test_remove_leaves_no_trace() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;

    app.manager.add(domain.id, id).await;
    app.manager.remove(id).await;

    let streams = app.factory.streams_for(id).await;
    assert_eq!(streams[0].stop_count(), 1);

    let registry = app.manager.registry();
    assert!(!registry.contains(&id));
    assert_eq!(registry.domain_of(&id), None);
    assert_eq!(registry.last_event_at(&id), None);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_remove_of_untracked_server_is_noop() {
    let app = harness();

    // Must not panic or error.
    app.manager.remove(GameServerId::new()).await;

    assert!(app.manager.registry().is_empty());
}

#[tokio::test]
async fn test_update_reconnects() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;

    app.manager.add(domain.id, id).await;
    app.manager.update(domain.id, id).await;

    let streams = app.factory.streams_for(id).await;
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].stop_count(), 1);
    assert_eq!(streams[1].start_count(), 1);
    assert!(app.manager.registry().contains(&id));
}

#[tokio::test]
async fn test_adapter_create_failure_leaves_no_entry() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;
    app.factory.fail_create();

    // Must not panic; the failure is logged and swallowed.
    app.manager.add(domain.id, id).await;

    assert!(!app.manager.registry().contains(&id));
    assert!(app.manager.registry().is_empty());
}

#[tokio::test]
async fn test_emitter_start_failure_leaves_no_entry() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;
    app.factory.fail_start();

    app.manager.add(domain.id, id).await;

    assert!(!app.manager.registry().contains(&id));
}

#[tokio::test]
async fn test_forwarded_event_enqueues_and_refreshes_liveness() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;
    app.manager.add(domain.id, id).await;

    let registry = app.manager.registry();
    let before = Utc::now() - Duration::seconds(30);
    registry.record_event_at(&id, before);

    let streams = app.factory.streams_for(id).await;
    streams[0].emit(GameEvent::LogLine(LogLine {
        line: "player spawned".to_string(),
    }));
    settle().await;

    let envelopes = app.queue.drain().await;
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].kind, EventKind::LogLine);
    assert_eq!(envelopes[0].domain_id, domain.id);
    assert_eq!(envelopes[0].game_server_id, id);

    let after = registry.last_event_at(&id).expect("timestamp");
    assert!(after > before);
}

#[tokio::test]
async fn test_every_event_kind_flows_through_the_forwarder() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;
    app.manager.add(domain.id, id).await;

    let player = PlayerRef {
        game_id: "p1".to_string(),
        name: "steve".to_string(),
        platform_id: None,
    };

    let events = vec![
        GameEvent::LogLine(LogLine {
            line: "boot".to_string(),
        }),
        GameEvent::PlayerConnected(gamehub_core::events::PlayerConnected {
            player: player.clone(),
        }),
        GameEvent::PlayerDisconnected(gamehub_core::events::PlayerDisconnected {
            player: player.clone(),
        }),
        GameEvent::ChatMessage(ChatMessage {
            player: Some(player.clone()),
            channel: ChatChannel::Global,
            message: "gg".to_string(),
        }),
        GameEvent::PlayerDeath(gamehub_core::events::PlayerDeath {
            player: player.clone(),
            attacker: None,
            position: None,
        }),
        GameEvent::EntityKilled(gamehub_core::events::EntityKilled {
            player,
            entity: "zombie".to_string(),
            weapon: Some("bow".to_string()),
        }),
    ];

    let streams = app.factory.streams_for(id).await;
    for event in events {
        streams[0].emit(event);
    }
    settle().await;

    let kinds: Vec<EventKind> = app.queue.drain().await.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, EventKind::ALL.to_vec());
}

#[tokio::test]
async fn test_connection_error_is_not_enqueued_and_does_not_disconnect() {
    let app = harness();
    let domain = helpers::active_domain();
    let id = GameServerId::new();

    app.control_plane
        .put_server(domain.id, dialed_server(id, true, true))
        .await;
    app.manager.add(domain.id, id).await;

    let streams = app.factory.streams_for(id).await;
    streams[0].emit_error("protocol hiccup");
    settle().await;

    // Errors are logged only; recovery belongs to the watchdog.
    assert!(app.queue.is_empty().await);
    assert!(app.manager.registry().contains(&id));
    assert_eq!(streams[0].stop_count(), 0);
}

#[tokio::test]
async fn test_identify_creates_and_connects_new_server() {
    let app = harness();
    let domain = helpers::active_domain();

    app.control_plane
        .add_registration_token("reg-token", domain.clone())
        .await;

    let id = app
        .manager
        .handle_identify("identity-1", "reg-token", Some("My Server"))
        .await
        .expect("identify");

    assert_eq!(app.control_plane.server_count().await, 1);
    assert!(app.manager.registry().contains(&id));
    assert_eq!(
        app.factory.created_kinds().await,
        vec![GameServerKind::Generic]
    );
}

#[tokio::test]
async fn test_identify_is_idempotent() {
    let app = harness();
    let domain = helpers::active_domain();

    app.control_plane
        .add_registration_token("reg-token", domain.clone())
        .await;

    let first = app
        .manager
        .handle_identify("identity-1", "reg-token", None)
        .await
        .expect("first identify");
    let second = app
        .manager
        .handle_identify("identity-1", "reg-token", None)
        .await
        .expect("second identify");

    assert_eq!(first, second);
    // The second identify found the existing record instead of creating
    // a duplicate.
    assert_eq!(app.control_plane.server_count().await, 1);
}

#[tokio::test]
async fn test_identify_with_unknown_registration_token_fails() {
    let app = harness();

    let result = app
        .manager
        .handle_identify("identity-1", "bogus-token", None)
        .await;

    assert!(result.is_err());
    assert!(app.manager.registry().is_empty());
}
