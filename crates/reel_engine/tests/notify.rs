use pretty_assertions::assert_eq;
use reel_engine::{
    FailureKind, FetchSettings, NotificationUpdate, NotifyError, RecordSettings, RecordUpdater,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn updater_for(server: &MockServer) -> RecordUpdater {
    RecordUpdater::new(RecordSettings {
        api_base: format!("{}/v0", server.uri()),
        base_id: "appBase".to_string(),
        api_key: Some("records-key".to_string()),
        transport: FetchSettings::default(),
    })
    .unwrap()
}

fn full_update() -> NotificationUpdate {
    NotificationUpdate {
        record_id: Some("rec1".to_string()),
        status: Some("sent".to_string()),
        table_id: Some("tblJobs".to_string()),
    }
}

#[tokio::test]
async fn missing_fields_are_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let updater = updater_for(&server);

    for update in [
        NotificationUpdate::default(),
        NotificationUpdate {
            status: None,
            ..full_update()
        },
        NotificationUpdate {
            table_id: Some(String::new()),
            ..full_update()
        },
    ] {
        let err = updater.update_notification_status(&update).await.unwrap_err();
        assert_eq!(err, NotifyError::MissingFields);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Missing required fields");
    }
}

#[tokio::test]
async fn patches_status_field_and_returns_first_record() {
    let server = MockServer::start().await;
    let record = json!({ "id": "rec1", "fields": { "email_notification_status": "sent" } });
    Mock::given(method("PATCH"))
        .and(path("/v0/appBase/tblJobs"))
        .and(header("authorization", "Bearer records-key"))
        .and(body_json(json!({
            "records": [{ "id": "rec1", "fields": { "email_notification_status": "sent" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [record] })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = updater_for(&server)
        .update_notification_status(&full_update())
        .await
        .unwrap();
    assert_eq!(updated, record);
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v0/appBase/tblJobs"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let err = updater_for(&server)
        .update_notification_status(&full_update())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(matches!(
        err,
        NotifyError::Upstream(failure) if failure.kind == FailureKind::HttpStatus(422)
    ));
}
