//! RemoteStore and SyncController against a live server on an ephemeral port.

use std::time::Duration;

use datebook_core::{
    AppointmentId, AppointmentKind, AppointmentStore, ApplyMode, DateKey, DatebookError,
    FetchOutcome, LocalStore, NewAppointment, RemoteStore, SyncController, SyncState, YearMonth,
};
use datebook_server::{AppState, app};

async fn serve(store: LocalStore) -> RemoteStore {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(AppState::with_store(store)))
            .await
            .unwrap();
    });
    RemoteStore::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
}

fn date(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn april() -> YearMonth {
    YearMonth::from_month(2025, 4).unwrap()
}

#[tokio::test]
async fn health_check() {
    let remote = serve(LocalStore::new()).await;
    let health = remote.health().await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn create_list_and_delete_round_trip() {
    let backing = LocalStore::new();
    let remote = serve(backing.clone()).await;
    assert_eq!(remote.apply_mode(), ApplyMode::ConfirmThenApply);

    let created = remote
        .create(
            NewAppointment::on(date("2025-04-10"))
                .title("Checkup")
                .time("10:00 AM")
                .kind(AppointmentKind::Medical),
        )
        .await
        .unwrap();
    assert_eq!(created.label(), "10:00 AM: Checkup");
    assert_eq!(backing.len(), 1);

    let defaults = remote
        .create(NewAppointment::on(date("2025-05-02")))
        .await
        .unwrap();
    assert_eq!(defaults.title, "Appointment");
    assert_eq!(defaults.time, "12:00 PM");
    assert_eq!(defaults.kind, AppointmentKind::General);

    let listed = remote.list(april()).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    remote.delete(&created.id).await.unwrap();
    assert!(remote.list(april()).await.unwrap().is_empty());
    assert_eq!(backing.len(), 1);
}

#[tokio::test]
async fn server_validation_reaches_client() {
    let remote = serve(LocalStore::new()).await;

    let err = remote.create(NewAppointment::default()).await.unwrap_err();
    assert!(matches!(err, DatebookError::Validation(ref m) if m == "Date is required"));
}

#[tokio::test]
async fn deleting_unknown_id_is_not_found() {
    let remote = serve(LocalStore::new()).await;

    let err = remote
        .delete(&AppointmentId::new("no-such-id"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatebookError::NotFound(ref id) if id == "no-such-id"));
}

#[tokio::test]
async fn unreachable_server_is_store_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = RemoteStore::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let controller = SyncController::new(remote, april());

    let err = controller.load().await.unwrap_err();
    assert!(matches!(err, DatebookError::Store(_)));
    assert_eq!(controller.state().await, SyncState::Error);
}

#[tokio::test]
async fn controller_navigates_over_http() {
    let backing = LocalStore::new();
    backing
        .create_now(&NewAppointment::on(date("2025-04-15")).title("Dentist"))
        .unwrap();
    backing
        .create_now(&NewAppointment::on(date("2025-05-20")).title("Lecture"))
        .unwrap();

    let controller =
        SyncController::new(serve(backing).await, april()).with_today(date("2025-04-01"));

    let FetchOutcome::Applied(view) = controller.load().await.unwrap() else {
        panic!("load was superseded");
    };
    assert_eq!(view.cells.len(), 42);
    assert!(
        view.cells
            .iter()
            .any(|c| c.date == Some(date("2025-04-15")) && c.has_appointment)
    );
    assert_eq!(controller.state().await, SyncState::Idle);

    controller.navigate(1).await.unwrap();
    assert_eq!(
        controller.displayed_month().await,
        YearMonth::from_month(2025, 5).unwrap()
    );
    assert_eq!(
        controller.labels_on(date("2025-05-20")).await,
        "12:00 PM: Lecture"
    );
    assert!(controller.appointments_on(date("2025-04-15")).await.is_empty());

    let created = controller
        .create(NewAppointment::on(date("2025-05-21")).title("Lab"))
        .await
        .unwrap();
    assert_eq!(controller.appointments().await.len(), 2);

    controller.delete(&created.id).await.unwrap();
    assert_eq!(controller.appointments().await.len(), 1);
}

#[tokio::test]
async fn delete_id_with_slash_is_not_found() {
    let backing = LocalStore::new();
    backing
        .create_now(&NewAppointment::on(date("2025-04-10")))
        .unwrap();
    let controller = SyncController::new(serve(backing.clone()).await, april());
    controller.load().await.unwrap();

    let err = controller
        .delete(&AppointmentId::new("a/b"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatebookError::NotFound(ref id) if id == "a/b"));
    assert_eq!(backing.len(), 1);
    assert_eq!(controller.appointments().await.len(), 1);
    assert_eq!(controller.state().await, SyncState::Idle);
}

#[tokio::test]
async fn delete_id_with_fragment_leaves_the_prefix_record_alone() {
    let backing = LocalStore::new();
    let keep = backing
        .create_now(&NewAppointment::on(date("2025-04-10")))
        .unwrap();
    let controller = SyncController::new(serve(backing.clone()).await, april());
    controller.load().await.unwrap();

    let lookalike = AppointmentId::new(format!("{}#x", keep.id));
    let err = controller.delete(&lookalike).await.unwrap_err();
    assert!(matches!(err, DatebookError::NotFound(_)));
    assert_eq!(backing.len(), 1);
    assert_eq!(controller.appointments_on(date("2025-04-10")).await, vec![keep]);
    assert_eq!(controller.state().await, SyncState::Idle);
}

#[tokio::test]
async fn delete_id_needing_escapes_reaches_the_record() {
    let keep = NewAppointment::on(date("2025-04-10"))
        .validate()
        .unwrap()
        .with_id(AppointmentId::new("team sync #3/4"));
    let backing = LocalStore::with_records(vec![keep.clone()]);
    let remote = serve(backing.clone()).await;

    remote.delete(&keep.id).await.unwrap();
    assert!(backing.is_empty());
}
