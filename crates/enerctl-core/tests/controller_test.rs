#![allow(clippy::unwrap_used)]

use std::time::Duration;

use enerctl_api::ApiClient;
use enerctl_core::{
    AccountType, ConsoleConfig, Console, Device, DeviceField, EntityId, Outcome, PowerStatus,
    ResourceController, StatusKind, User, UserField,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

fn api(server: &MockServer) -> ApiClient {
    ApiClient::with_client(&server.uri(), reqwest::Client::new()).unwrap()
}

fn users(server: &MockServer) -> ResourceController<User> {
    ResourceController::new(api(server), CancellationToken::new())
}

fn devices(server: &MockServer) -> ResourceController<Device> {
    ResourceController::new(api(server), CancellationToken::new())
}

fn ana() -> serde_json::Value {
    json!({"id": 1, "nome": "Ana", "email": "ana@example.com", "tipoConta": "RESIDENCIAL"})
}

fn fill_user(ctrl: &ResourceController<User>, name: &str, email: &str, kind: &str) {
    ctrl.update_draft_field(UserField::Name, name).unwrap();
    ctrl.update_draft_field(UserField::Email, email).unwrap();
    ctrl.update_draft_field(UserField::AccountType, kind).unwrap();
}

async fn mount_user_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn activate_loads_hal_collection() {
    let server = MockServer::start().await;
    mount_user_list(&server, json!({"_embedded": {"usuarioList": [ana()]}})).await;

    let ctrl = users(&server);
    assert_eq!(ctrl.activate().await, Outcome::Done);

    let state = ctrl.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Ana");
    assert_eq!(state.items[0].account_type, Some(AccountType::Residential));
    assert!(!state.loading);
    assert_eq!(state.status, None);
}

#[tokio::test]
async fn failed_load_clears_list_and_reports() {
    let server = MockServer::start().await;
    mount_user_list(&server, json!([ana()])).await;

    let ctrl = users(&server);
    assert_eq!(ctrl.refresh().await, Outcome::Done);
    assert_eq!(ctrl.snapshot().items.len(), 1);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/usuarios"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert_eq!(ctrl.refresh().await, Outcome::Failed);
    let state = ctrl.snapshot();
    assert!(state.items.is_empty());
    let status = state.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Failed to load users.");
    assert!(!state.loading);
}

#[tokio::test]
async fn unexpected_list_shape_is_empty_not_an_error() {
    let server = MockServer::start().await;
    mount_user_list(&server, json!({"_links": {}})).await;

    let ctrl = users(&server);
    assert_eq!(ctrl.refresh().await, Outcome::Done);
    assert!(ctrl.snapshot().items.is_empty());
    assert_eq!(ctrl.snapshot().status, None);
}

// ── Submit ──────────────────────────────────────────────────────────

#[tokio::test]
async fn incomplete_draft_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = users(&server);
    ctrl.open_create_editor();
    ctrl.update_draft_field(UserField::Name, "Ana").unwrap();

    assert_eq!(ctrl.submit().await, Outcome::Invalid);
    let state = ctrl.snapshot();
    assert!(state.editor_open);
    assert!(!state.loading);
    assert_eq!(
        state.status.as_ref().unwrap().text,
        "Fill in all required fields: Email, Account type."
    );
}

#[tokio::test]
async fn create_posts_draft_then_refetches_and_closes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuarios"))
        .and(body_json(json!({
            "nome": "Ana",
            "email": "ana@example.com",
            "tipoConta": "RESIDENCIAL"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ana()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ana()])))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = users(&server);
    ctrl.open_create_editor();
    fill_user(&ctrl, "Ana", "ana@example.com", "residential");

    assert_eq!(ctrl.submit().await, Outcome::Done);

    let state = ctrl.snapshot();
    assert!(!state.editor_open);
    assert_eq!(state.editing_id, None);
    assert_eq!(state.draft, User::default());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.status.as_ref().unwrap().text, "User created successfully.");
    assert_eq!(state.status.as_ref().unwrap().kind, StatusKind::Success);
}

#[tokio::test]
async fn edit_puts_full_record_to_item_path() {
    let server = MockServer::start().await;
    let stored = json!({
        "id": 3,
        "nomeDispositivo": "Ar condicionado",
        "tipoDispositivo": "Climatização",
        "localizacao": "Quarto",
        "consumoEnergiaKwh": 150,
        "status": "DESLIGADO",
        "usuarioId": 1
    });
    Mock::given(method("GET"))
        .and(path("/dispositivos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_embedded": {"dispositivoList": [stored]}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/dispositivos/3"))
        .and(body_json(json!({
            "id": 3,
            "nomeDispositivo": "Ar condicionado",
            "tipoDispositivo": "Climatização",
            "localizacao": "Quarto",
            "consumoEnergiaKwh": 150,
            "status": "LIGADO",
            "usuarioId": 1
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = devices(&server);
    assert_eq!(ctrl.activate().await, Outcome::Done);

    let existing = ctrl.find(&EntityId::Numeric(3)).unwrap();
    ctrl.open_edit_editor(&existing);
    assert_eq!(ctrl.snapshot().editing_id, Some(EntityId::Numeric(3)));

    ctrl.update_draft_field(DeviceField::Status, "on").unwrap();
    // Draft edits stay local until submit.
    assert_eq!(ctrl.snapshot().items[0].status, PowerStatus::Off);

    assert_eq!(ctrl.submit().await, Outcome::Done);
    assert_eq!(
        ctrl.snapshot().status.as_ref().unwrap().text,
        "Device updated successfully."
    );
}

#[tokio::test]
async fn rejected_save_keeps_editor_and_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuarios"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Email already registered"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = users(&server);
    ctrl.open_create_editor();
    fill_user(&ctrl, "Ana", "ana@example.com", "EMPRESARIAL");

    assert_eq!(ctrl.submit().await, Outcome::Failed);

    let state = ctrl.snapshot();
    assert!(state.editor_open);
    assert!(!state.loading);
    assert_eq!(state.draft.name, "Ana");
    assert_eq!(state.draft.account_type, Some(AccountType::Business));
    assert_eq!(state.status.as_ref().unwrap().text, "Email already registered");
}

#[tokio::test]
async fn save_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let ctrl = devices(&server);
    ctrl.open_create_editor();
    for (field, value) in [
        (DeviceField::Name, "TV"),
        (DeviceField::DeviceType, "Eletrônico"),
        (DeviceField::Location, "Sala"),
        (DeviceField::EnergyConsumptionKwh, "120"),
        (DeviceField::OwnerUserId, "1"),
    ] {
        ctrl.update_draft_field(field, value).unwrap();
    }

    assert_eq!(ctrl.submit().await, Outcome::Failed);
    assert_eq!(
        ctrl.snapshot().status.as_ref().unwrap().text,
        "Failed to save device."
    );
}

// ── Remove ──────────────────────────────────────────────────────────

fn device(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nomeDispositivo": name,
        "tipoDispositivo": "Eletrônico",
        "localizacao": "Sala",
        "consumoEnergiaKwh": 100,
        "status": "LIGADO",
        "usuarioId": 1
    })
}

async fn mount_device_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/dispositivos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Controller whose list already holds devices 5 and 6.
async fn seeded_devices(server: &MockServer) -> ResourceController<Device> {
    mount_device_list(server, json!([device(5, "TV"), device(6, "Geladeira")])).await;
    let ctrl = devices(server);
    assert_eq!(ctrl.refresh().await, Outcome::Done);
    assert!(ctrl.find(&EntityId::Numeric(5)).is_some());
    server.reset().await;
    ctrl
}

#[tokio::test]
async fn remove_deletes_then_refetches() {
    let server = MockServer::start().await;
    let ctrl = seeded_devices(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/dispositivos/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dispositivos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([device(6, "Geladeira")])))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(ctrl.remove(&EntityId::Numeric(5)).await, Outcome::Done);

    let state = ctrl.snapshot();
    assert!(ctrl.find(&EntityId::Numeric(5)).is_none());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, Some(EntityId::Numeric(6)));
    assert_eq!(state.status.as_ref().unwrap().kind, StatusKind::Success);
    assert_eq!(state.status.as_ref().unwrap().text, "Device deleted successfully.");
}

#[tokio::test]
async fn failed_remove_reports_and_keeps_the_item() {
    let server = MockServer::start().await;
    let ctrl = seeded_devices(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/dispositivos/5"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(ctrl.remove(&EntityId::Numeric(5)).await, Outcome::Failed);

    let state = ctrl.snapshot();
    assert!(ctrl.find(&EntityId::Numeric(5)).is_some());
    assert_eq!(state.items.len(), 2);
    let status = state.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Failed to delete device.");
}

#[tokio::test]
async fn text_ids_stay_inside_the_item_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    mount_user_list(&server, json!([])).await;

    let ctrl = users(&server);
    for id in ["../dispositivos/5", "a/b", "a?b", "x#y"] {
        assert_eq!(ctrl.remove(&EntityId::from(id)).await, Outcome::Done);
    }

    let deleted: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(
        deleted,
        vec![
            "/usuarios/..%2Fdispositivos%2F5",
            "/usuarios/a%2Fb",
            "/usuarios/a%3Fb",
            "/usuarios/x%23y",
        ]
    );
}

#[tokio::test]
async fn dot_ids_are_refused_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = users(&server);
    for id in [".", ".."] {
        assert_eq!(ctrl.remove(&EntityId::from(id)).await, Outcome::Failed);
        let status = ctrl.snapshot().status.clone().unwrap();
        assert_eq!(status.text, "Failed to delete user.");
    }
    assert!(!ctrl.snapshot().loading);
}

// ── Editor ──────────────────────────────────────────────────────────

#[tokio::test]
async fn close_editor_discards_draft() {
    let server = MockServer::start().await;
    let ctrl = users(&server);

    ctrl.open_create_editor();
    fill_user(&ctrl, "Ana", "ana@example.com", "residential");
    ctrl.close_editor();

    let state = ctrl.snapshot();
    assert!(!state.editor_open);
    assert_eq!(state.draft, User::default());
}

#[tokio::test]
async fn opening_editor_replaces_previous_draft() {
    let server = MockServer::start().await;
    let ctrl = users(&server);

    ctrl.open_create_editor();
    ctrl.update_draft_field(UserField::Name, "half typed").unwrap();

    let existing: User = serde_json::from_value(ana()).unwrap();
    ctrl.open_edit_editor(&existing);
    assert_eq!(ctrl.snapshot().draft, existing);

    ctrl.open_create_editor();
    let state = ctrl.snapshot();
    assert_eq!(state.draft, User::default());
    assert_eq!(state.editing_id, None);
}

#[tokio::test]
async fn bad_enum_value_leaves_draft_untouched() {
    let server = MockServer::start().await;
    let ctrl = users(&server);
    ctrl.open_create_editor();
    ctrl.update_draft_field(UserField::AccountType, "residential").unwrap();

    assert!(ctrl.update_draft_field(UserField::AccountType, "gov").is_err());
    assert_eq!(
        ctrl.snapshot().draft.account_type,
        Some(AccountType::Residential)
    );
}

#[tokio::test]
async fn dismiss_clears_status() {
    let server = MockServer::start().await;
    let ctrl = users(&server);
    ctrl.open_create_editor();
    assert_eq!(ctrl.submit().await, Outcome::Invalid);
    assert!(ctrl.snapshot().status.is_some());

    ctrl.dismiss_status();
    assert_eq!(ctrl.snapshot().status, None);
}

// ── Single-flight & cancellation ────────────────────────────────────

async fn mount_slow_list(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/usuarios"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([ana()]))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn second_operation_while_in_flight_is_busy() {
    let server = MockServer::start().await;
    mount_slow_list(&server, Duration::from_millis(300)).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = users(&server);
    let mut rx = ctrl.subscribe();

    let first = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    rx.wait_for(|s| s.loading).await.unwrap();

    assert_eq!(ctrl.refresh().await, Outcome::Busy);
    assert_eq!(ctrl.remove(&EntityId::Numeric(1)).await, Outcome::Busy);
    assert_eq!(ctrl.snapshot().status, None);

    assert_eq!(first.await.unwrap(), Outcome::Done);
    assert!(!ctrl.snapshot().loading);
    assert_eq!(ctrl.snapshot().items.len(), 1);
}

#[tokio::test]
async fn shutdown_discards_late_response() {
    let server = MockServer::start().await;
    mount_slow_list(&server, Duration::from_millis(500)).await;

    let ctrl = users(&server);
    let mut rx = ctrl.subscribe();

    let pending = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    rx.wait_for(|s| s.loading).await.unwrap();

    ctrl.shutdown();
    assert_eq!(pending.await.unwrap(), Outcome::Cancelled);

    let state = ctrl.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.status, None);

    // Later calls never leave the process.
    assert_eq!(ctrl.refresh().await, Outcome::Cancelled);
}

#[tokio::test]
async fn loading_flag_tracks_request() {
    let server = MockServer::start().await;
    mount_slow_list(&server, Duration::from_millis(200)).await;

    let ctrl = users(&server);
    assert!(!ctrl.snapshot().loading);

    let mut rx = ctrl.subscribe();
    let task = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    rx.wait_for(|s| s.loading).await.unwrap();
    rx.wait_for(|s| !s.loading).await.unwrap();

    assert_eq!(task.await.unwrap(), Outcome::Done);
    assert_eq!(ctrl.snapshot().items.len(), 1);
}

// ── Console ─────────────────────────────────────────────────────────

#[tokio::test]
async fn console_activates_both_collections() {
    let server = MockServer::start().await;
    mount_user_list(&server, json!([ana()])).await;
    Mock::given(method("GET"))
        .and(path("/dispositivos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dispositivoList": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConsoleConfig::new(server.uri().parse().unwrap());
    let console = Console::new(config).unwrap();

    assert_eq!(console.activate().await, (Outcome::Done, Outcome::Done));
    assert_eq!(console.users().snapshot().items.len(), 1);
    assert!(console.devices().snapshot().items.is_empty());

    console.shutdown();
    assert!(console.users().is_shut_down());
    assert!(console.devices().is_shut_down());
}
