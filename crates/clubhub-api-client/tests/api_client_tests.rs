use std::time::Duration;

use chrono::{TimeZone, Utc};
use clubhub_api_client::{ApiClient, ApiError, Auth};
use clubhub_core::models::{
    ArticlePayload, ArticleRecord, BoardMemberRecord, DisplaySettings, EntityKind, EventRecord,
    ListQuery,
};
use mockito::Matcher;

fn client(server: &mockito::ServerGuard, auth: Auth) -> ApiClient {
    ApiClient::new(server.url(), "/api/v1", auth, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_sends_filters_and_api_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/board-members")
        .match_header("x-api-key", "secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("generation".into(), "Gen 6".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":[{"id":"m1","name":"Ada","role":"President","generation":"Gen 6"}],"page":2,"limit":5,"total":6}"#,
        )
        .create_async()
        .await;

    let api = client(&server, Auth::XApiKey("secret".to_string()));
    let page = api
        .list::<BoardMemberRecord>(&ListQuery::page(2, 5).with_generation("Gen 6"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.total, 6);
    assert_eq!(page.data[0].name, "Ada");
    assert_eq!(page.data[0].generation, "Gen 6");
}

#[tokio::test]
async fn create_posts_camel_case_body_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/articles")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "title": "Rust at the club",
            "coverUrl": "https://cdn.example.org/articles/cover.png",
            "documentUrl": null
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"a1","title":"Rust at the club","coverUrl":"https://cdn.example.org/articles/cover.png"}"#,
        )
        .create_async()
        .await;

    let api = client(&server, Auth::Bearer("tok".to_string()));
    let payload = ArticlePayload {
        title: "Rust at the club".to_string(),
        summary: "Notes".to_string(),
        labels: vec!["rust".to_string()],
        authors: vec!["Ada".to_string()],
        cover_url: Some("https://cdn.example.org/articles/cover.png".to_string()),
        document_url: None,
    };
    let record: ArticleRecord = api.create(EntityKind::Articles, &payload).await.unwrap();

    mock.assert_async().await;
    assert_eq!(record.id, "a1");
}

#[tokio::test]
async fn server_error_message_is_kept_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/api/v1/events/e1")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Event date must be in the future"}"#)
        .create_async()
        .await;

    let api = client(&server, Auth::XApiKey("k".to_string()));
    let err = api
        .update::<_, EventRecord>(EntityKind::Events, "e1", &serde_json::json!({"title": "x"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.server_message(), Some("Event date must be in the future"));
}

#[tokio::test]
async fn empty_error_body_falls_back_to_reason() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/api/v1/reels/r1")
        .with_status(404)
        .create_async()
        .await;

    let api = client(&server, Auth::XApiKey("k".to_string()));
    let err = api.remove(EntityKind::Reels, "r1").await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn event_dates_parse_as_utc() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/events/e1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"e1","title":"Hack night","date":"2026-03-01T18:00:00Z","mode":"offline","status":"upcoming"}"#,
        )
        .create_async()
        .await;

    let api = client(&server, Auth::XApiKey("k".to_string()));
    let event: EventRecord = api.fetch("e1").await.unwrap();
    assert_eq!(event.date, Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap());
}

#[tokio::test]
async fn generations_and_settings_round_trip() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/honorees/generations")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"generations":["Gen 5","Gen 6"]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/settings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"visible_generation":"Gen 5"}"#)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/api/v1/settings")
        .match_body(Matcher::Json(serde_json::json!({"visibleGeneration": "Gen 6"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"visibleGeneration":"Gen 6"}"#)
        .create_async()
        .await;

    let api = client(&server, Auth::XApiKey("k".to_string()));
    assert_eq!(
        api.generations(EntityKind::Honorees).await.unwrap(),
        vec!["Gen 5".to_string(), "Gen 6".to_string()]
    );
    assert_eq!(
        api.settings().await.unwrap().visible_generation.as_deref(),
        Some("Gen 5")
    );

    let stored = api
        .save_settings(&DisplaySettings {
            visible_generation: Some("Gen 6".to_string()),
        })
        .await
        .unwrap();
    save.assert_async().await;
    assert_eq!(stored.visible_generation.as_deref(), Some("Gen 6"));
}
