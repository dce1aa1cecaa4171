use kinship::application_port::RelationshipService;
use kinship::domain_model::*;
use kinship::domain_port::{NotificationSender, PushGateway};
use kinship::infra_memory::RecordingPushGateway;
use kinship::server::{NotificationPump, Server, notification_channel};
use kinship::settings::{Cache, Log, Notify, Settings, Store};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn memory_settings() -> Settings {
    Settings {
        store: Store {
            backend: "memory".to_owned(),
            mysql_dsn: None,
        },
        cache: Cache {
            roster_ttl_secs: 120,
            members_ttl_secs: 300,
            profile_ttl_secs: 300,
        },
        notify: Notify { queue_depth: 16 },
        log: Log {
            filter: "info".to_owned(),
        },
    }
}

#[tokio::test]
async fn wired_server_runs_the_friend_flow() {
    let server = Server::try_new(&memory_settings()).await.unwrap();
    let directory = server.memory_profiles().unwrap();

    let a = UserId::random();
    let b = UserId::random();
    for (id, name) in [(a, "a"), (b, "b")] {
        directory.upsert(UserProfile {
            id,
            display_name: name.to_owned(),
            email: format!("{name}@example.com"),
            avatar: None,
            last_seen: None,
        });
    }

    server
        .relationship_service
        .send_friend_request(a, b)
        .await
        .unwrap();
    server
        .relationship_service
        .accept_friend_request(a, b)
        .await
        .unwrap();

    let friends = server.relationship_service.get_friends(b, false).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, a);

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    let mut settings = memory_settings();
    settings.store.backend = "postgres".to_owned();
    assert!(Server::try_new(&settings).await.is_err());
}

#[tokio::test]
async fn pump_delivers_queued_notifications() {
    let gateway = Arc::new(RecordingPushGateway::new());
    let cancel = CancellationToken::new();
    let (sender, rx) = notification_channel(16);
    let pump = NotificationPump::new(rx, gateway.clone(), cancel.clone());
    let handle = tokio::spawn(pump.run());

    let recipient = UserId::random();
    sender
        .notify(Notification::friend_request(recipient, UserId::random(), "a"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let pushed = gateway.pushed();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].recipient, recipient);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn pump_survives_gateway_failures() {
    let gateway = Arc::new(RecordingPushGateway::new());
    gateway.set_failing(true);
    let cancel = CancellationToken::new();
    let (sender, rx) = notification_channel(16);
    let pump = NotificationPump::new(rx, gateway.clone(), cancel.clone());
    let handle = tokio::spawn(pump.run());

    sender
        .notify(Notification::friend_request(
            UserId::random(),
            UserId::random(),
            "a",
        ))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(gateway.pushed().is_empty());

    // a later success still flows through the same pump
    gateway.set_failing(false);
    sender
        .notify(Notification::friend_request(
            UserId::random(),
            UserId::random(),
            "b",
        ))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(gateway.pushed().len(), 1);

    cancel.cancel();
    handle.await.unwrap();
}

// keep the trait objects honest about thread safety
#[test]
fn ports_are_object_safe_and_sync() {
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}
    assert_send_sync::<dyn NotificationSender>();
    assert_send_sync::<dyn PushGateway>();
}
