mod helpers;

use std::sync::Arc;

use clubhub_admin::forms::{ArticleForm, BoardMemberForm, ReelForm};
use clubhub_admin::{AssetField, GenerationCatalog, SubmitError, SubmitMode, SubmitPhase};
use clubhub_core::models::EntityKind;
use clubhub_core::ErrorMetadata;
use helpers::*;
use serde_json::json;
use tokio::sync::Notify;

const OLD_COVER: &str = "https://cdn.test/articles/old-cover.png";
const OLD_DOC: &str = "https://cdn.test/article-documents/old.pdf";

fn article(cover: AssetField, document: AssetField) -> ArticleForm {
    ArticleForm {
        title: "Rust at the club".to_string(),
        summary: "Notes from the first workshop".to_string(),
        labels: vec!["rust".to_string()],
        authors: vec!["Ada".to_string()],
        cover,
        document,
    }
}

#[tokio::test]
async fn no_pending_files_means_no_uploads_and_unchanged_urls() {
    let journal = Journal::default();
    let (sink, seen) = recorder();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    )
    .with_progress_sink(sink);

    let form = article(AssetField::stored(OLD_COVER), AssetField::Empty);
    let outcome = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap();

    assert_eq!(journal.uploads(), 0);
    assert!(seen.lock().unwrap().is_empty());
    let body = journal.saved_body().unwrap();
    assert_eq!(body["coverUrl"], json!(OLD_COVER));
    assert_eq!(body["documentUrl"], json!(null));
    assert_eq!(outcome.record.cover_url.as_deref(), Some(OLD_COVER));
    assert!(outcome.uploaded.is_empty());
    assert!(journal.deletes().is_empty());
    assert_eq!(orchestrator.phase(), SubmitPhase::Idle);
}

#[tokio::test]
async fn aggregate_progress_reaches_100_once_all_uploads_finish() {
    let journal = Journal::default();
    let (sink, seen) = recorder();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    )
    .with_progress_sink(sink);

    let form = article(
        AssetField::pending(png("cover.png"), None),
        AssetField::pending(pdf("talk.pdf"), None),
    );
    let outcome = orchestrator.submit(&form, SubmitMode::Create).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert!(seen.windows(2).all(|w| w[0] < w[1]), "{seen:?}");
    assert_eq!(seen.last().copied(), Some(100.0));
    assert_eq!(seen.iter().filter(|p| **p == 100.0).count(), 1);
    assert_eq!(outcome.uploaded.len(), 2);

    let body = journal.saved_body().unwrap();
    assert_eq!(body["coverUrl"], json!("https://cdn.test/articles/cover.png"));
    assert_eq!(
        body["documentUrl"],
        json!("https://cdn.test/article-documents/talk.pdf")
    );
}

#[tokio::test]
async fn aggregate_progress_stays_below_100_when_an_upload_fails() {
    let journal = Journal::default();
    let (sink, seen) = recorder();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal).failing_on("talk.pdf"),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    )
    .with_progress_sink(sink);

    let form = article(
        AssetField::pending(png("cover.png"), None),
        AssetField::pending(pdf("talk.pdf"), None),
    );
    orchestrator
        .submit(&form, SubmitMode::Create)
        .await
        .unwrap_err();

    let seen = seen.lock().unwrap().clone();
    assert!(seen.iter().all(|p| *p < 100.0), "{seen:?}");
}

#[tokio::test]
async fn replaced_asset_is_deleted_once_after_its_replacement_is_stored() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(
        AssetField::pending(png("new-cover.png"), Some(OLD_COVER.to_string())),
        AssetField::stored(OLD_DOC),
    );
    let outcome = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap();

    assert_eq!(journal.deletes(), vec![OLD_COVER.to_string()]);
    assert_eq!(outcome.superseded, vec![OLD_COVER.to_string()]);

    let resolved = journal
        .position(&Event::UploadResolved(
            "https://cdn.test/articles/new-cover.png".to_string(),
        ))
        .unwrap();
    let deleted = journal
        .position(&Event::Deleted(OLD_COVER.to_string()))
        .unwrap();
    let saved = journal
        .events()
        .iter()
        .position(|e| matches!(e, Event::Updated(..)))
        .unwrap();
    assert!(resolved < saved && saved < deleted);
}

#[tokio::test]
async fn unchanged_asset_is_never_deleted() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(AssetField::stored(OLD_COVER), AssetField::stored(OLD_DOC));
    let outcome = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap();

    assert!(journal.deletes().is_empty());
    assert!(outcome.superseded.is_empty());
}

#[tokio::test]
async fn creates_never_delete_previous_assets() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(
        AssetField::pending(png("cover.png"), Some(OLD_COVER.to_string())),
        AssetField::Empty,
    );
    orchestrator.submit(&form, SubmitMode::Create).await.unwrap();
    assert!(journal.deletes().is_empty());
}

#[tokio::test]
async fn upload_failure_blocks_save_and_cleanup() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal).failing_on("talk.pdf"),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(
        AssetField::pending(png("cover.png"), Some(OLD_COVER.to_string())),
        AssetField::pending(pdf("talk.pdf"), Some(OLD_DOC.to_string())),
    );
    let err = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Upload { field: "document", .. }));
    assert_eq!(err.error_code(), "UPLOAD_FAILED");
    assert_eq!(journal.saves(), 0);
    assert!(journal.deletes().is_empty());
    assert!(matches!(
        orchestrator.phase(),
        SubmitPhase::Failed {
            code: "UPLOAD_FAILED",
            ..
        }
    ));
}

#[tokio::test]
async fn save_failure_keeps_uploads_and_surfaces_server_message() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal).rejecting(422, "Title already exists"),
    );

    let form = article(
        AssetField::pending(png("cover.png"), Some(OLD_COVER.to_string())),
        AssetField::Empty,
    );
    let err = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Persist { .. }));
    assert_eq!(err.user_message(), "Title already exists");
    assert_eq!(journal.uploads(), 1);
    assert!(journal.deletes().is_empty());
    assert!(!orchestrator.is_busy());
}

#[tokio::test]
async fn failed_cleanup_does_not_fail_the_submission() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal).failing_on(OLD_COVER),
        FakeGateway::new(&journal),
    );

    let form = article(
        AssetField::pending(png("cover.png"), Some(OLD_COVER.to_string())),
        AssetField::pending(pdf("talk.pdf"), Some(OLD_DOC.to_string())),
    );
    let outcome = orchestrator
        .submit(&form, SubmitMode::update("a1"))
        .await
        .unwrap();

    let mut deleted = journal.deletes();
    deleted.sort();
    assert_eq!(deleted, vec![OLD_DOC.to_string(), OLD_COVER.to_string()]);
    assert_eq!(outcome.cleanup_failures.len(), 1);
    assert_eq!(outcome.cleanup_failures[0].url, OLD_COVER);
    assert_eq!(orchestrator.phase(), SubmitPhase::Idle);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_network() {
    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = ReelForm {
        title: String::new(),
        video_url: "https://vimeo.com/1234".to_string(),
        thumbnail: AssetField::pending(png("thumb.png"), None),
    };
    let err = orchestrator
        .submit(&form, SubmitMode::Create)
        .await
        .unwrap_err();

    match err {
        SubmitError::Validation(errors) => {
            assert!(errors.contains("title"));
            assert!(errors.contains("video_url"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(journal.events().is_empty());
    assert_eq!(orchestrator.phase(), SubmitPhase::Idle);
}

#[tokio::test]
async fn unreadable_pending_file_is_a_field_error() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.png");
    tokio::fs::write(&empty, b"").await.unwrap();

    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(
        AssetField::from_path(&empty, None),
        AssetField::from_path(dir.path().join("missing.pdf"), None),
    );
    let err = orchestrator
        .submit(&form, SubmitMode::Create)
        .await
        .unwrap_err();

    match err {
        SubmitError::Validation(errors) => {
            assert!(errors.contains("cover"));
            assert!(errors.contains("document"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(journal.events().is_empty());
}

#[tokio::test]
async fn oversized_file_on_disk_is_refused_before_upload() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    tokio::fs::write(&cover, vec![1u8; 32]).await.unwrap();

    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    )
    .with_max_file_size(16);

    let form = article(AssetField::from_path(&cover, None), AssetField::Empty);
    let err = orchestrator
        .submit(&form, SubmitMode::Create)
        .await
        .unwrap_err();

    match err {
        SubmitError::Validation(errors) => {
            let messages = errors.get("cover");
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("the limit is 16 bytes"), "{messages:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(journal.events().is_empty());
}

#[tokio::test]
async fn files_on_disk_are_read_and_uploaded() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    tokio::fs::write(&cover, b"png").await.unwrap();

    let journal = Journal::default();
    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );

    let form = article(AssetField::from_path(&cover, None), AssetField::Empty);
    let outcome = orchestrator.submit(&form, SubmitMode::Create).await.unwrap();
    assert_eq!(
        outcome.record.cover_url.as_deref(),
        Some("https://cdn.test/articles/cover.png")
    );
}

#[tokio::test]
async fn overlapping_submission_is_refused() {
    let journal = Journal::default();
    let gate = Arc::new(Notify::new());
    let orchestrator = orchestrator(
        FakeUploader::new(&journal).gated(gate.clone()),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    );
    let form = article(AssetField::pending(png("cover.png"), None), AssetField::Empty);

    let first = orchestrator.submit(&form, SubmitMode::Create);
    let second = async {
        tokio::task::yield_now().await;
        assert!(orchestrator.is_busy());
        assert!(orchestrator.phase().is_busy());
        let result = orchestrator.submit(&form, SubmitMode::Create).await;
        gate.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(second, Err(SubmitError::Busy)));
    assert_eq!(journal.saves(), 1);
    assert!(!orchestrator.is_busy());
}

#[tokio::test]
async fn new_generation_is_known_before_it_is_selected() {
    let journal = Journal::default();
    let catalog = Arc::new(GenerationCatalog::new(FakeGenerations::new(&[
        &["Gen 5", "Gen 6"],
        &["Gen 5", "Gen 6", "Gen 7"],
    ])));
    catalog.refresh(EntityKind::BoardMembers).await.unwrap();

    let orchestrator = orchestrator(
        FakeUploader::new(&journal),
        FakeRemover::new(&journal),
        FakeGateway::new(&journal),
    )
    .with_generation_catalog(catalog.clone());

    let form = BoardMemberForm {
        name: "Ada Lovelace".to_string(),
        role: "President".to_string(),
        generation: "Gen 7".to_string(),
        linkedin_url: None,
        avatar: AssetField::pending(png("ada.png"), None),
    };
    assert!(catalog
        .select(EntityKind::BoardMembers, "Gen 7")
        .await
        .is_err());

    let outcome = orchestrator.submit(&form, SubmitMode::Create).await.unwrap();

    assert_eq!(outcome.record.generation, "Gen 7");
    assert!(catalog.contains(EntityKind::BoardMembers, "Gen 7").await);
    catalog
        .select(EntityKind::BoardMembers, "Gen 7")
        .await
        .unwrap();
}
