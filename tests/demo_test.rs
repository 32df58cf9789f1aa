//! デモ実行テスト
//!
//! 認証情報の欠落・サンプル欠落時の挙動を検証

mod support;

use gemini_vision::config::{Config, Credentials};
use gemini_vision::demo::{run_demo, DemoPlan};
use gemini_vision::error::VisionError;
use std::cell::Cell;
use support::{write_files, StubClient};
use tempfile::tempdir;

fn plan_in(dir: &std::path::Path) -> DemoPlan {
    DemoPlan {
        sample_image: dir.join("sample_image.jpg"),
        image_dir: dir.join("images"),
        ..Default::default()
    }
}

/// APIキーが無ければクライアントを作らず、解析も呼ばれない
#[tokio::test]
async fn test_missing_credentials_is_fatal() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("sample_image.jpg"), b"img").unwrap();

    let client = StubClient::always("never");
    let connects = Cell::new(0);

    let credentials = Config::default().credentials_with(|_| None);
    let result = run_demo(
        credentials,
        |_| {
            connects.set(connects.get() + 1);
            Ok(&client)
        },
        &plan_in(dir.path()),
    )
    .await;

    assert!(matches!(result, Err(VisionError::MissingApiKey)));
    assert_eq!(connects.get(), 0);
    assert_eq!(client.calls(), 0);
}

/// サンプルが無い例はスキップされる
#[tokio::test]
async fn test_missing_samples_are_skipped() {
    let dir = tempdir().unwrap();
    let client = StubClient::always("ok");

    let summary = run_demo(
        Credentials::new("key"),
        |_| Ok(&client),
        &plan_in(dir.path()),
    )
    .await
    .unwrap();

    assert!(summary.single_result.is_none());
    assert!(summary.batch_results.is_none());
    assert_eq!(summary.skipped.len(), 2);
    assert_eq!(client.calls(), 0);
}

/// サンプル画像とフォルダがあれば両方の例が実行される
#[tokio::test]
async fn test_demo_runs_both_examples() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("sample_image.jpg"), b"img").unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    write_files(&images, &["x.jpg", "y.png", "notes.md"]);

    let client = StubClient::always("説明");
    let summary = run_demo(Credentials::new("key"), |_| Ok(&client), &plan_in(dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.single_result.as_deref(), Some("説明"));
    let batch = summary.batch_results.unwrap();
    assert_eq!(batch.len(), 2);
    assert!(summary.skipped.is_empty());
    assert_eq!(client.calls(), 3);
}

/// 例1が失敗しても例2は実行される
#[tokio::test]
async fn test_single_failure_does_not_abort_demo() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("sample_image.jpg"), b"img").unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    write_files(&images, &["x.jpg"]);

    let client = StubClient::failing();
    let summary = run_demo(Credentials::new("key"), |_| Ok(&client), &plan_in(dir.path()))
        .await
        .unwrap();

    assert!(summary.single_result.is_none());
    assert_eq!(summary.batch_results.map(|m| m.len()), Some(0));
    assert_eq!(client.calls(), 2);
}

/// クライアント生成の失敗はそのまま返す
#[tokio::test]
async fn test_connect_error_propagates() {
    let dir = tempdir().unwrap();
    let result = run_demo::<&StubClient, _>(
        Credentials::new("key"),
        |_| Err(VisionError::Config("bad endpoint".into())),
        &plan_in(dir.path()),
    )
    .await;

    assert!(matches!(result, Err(VisionError::Config(_))));
}
