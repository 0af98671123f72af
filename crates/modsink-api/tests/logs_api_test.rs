//! Log-browsing API tests: listing order, record fetch, and the
//! filename validation that guards the log directory.

use std::time::{Duration, SystemTime};

use axum::http::StatusCode;
use modsink_testing::{fixtures, TestEnv};
use serde_json::json;

#[tokio::test]
async fn listing_reports_count_and_file_metadata() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    env.post_json(&app, "/callback/audio/results", &fixtures::audio_payload("a1"))
        .await
        .expect("post audio");
    env.post_json(&app, "/callback/video/results", &fixtures::video_payload("v1"))
        .await
        .expect("post video");

    let (status, body) = env.get(&app, "/api/logs").await.expect("list records");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(2));

    let files = body["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2);
    for file in files {
        assert!(file["filename"].as_str().expect("filename").ends_with(".json"));
        assert!(file["size"].as_u64().expect("size") > 0);
        assert!(file["created"].is_string());
        assert!(file["modified"].is_string());
    }
}

#[tokio::test]
async fn empty_archive_lists_zero_files() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    let (status, body) = env.get(&app, "/api/logs").await.expect("list records");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["files"], json!([]));
}

#[tokio::test]
async fn listing_sorts_by_modification_time_descending() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    for id in ["r1", "r2", "r3"] {
        env.post_json(&app, "/callback/video/results", &fixtures::video_payload(id))
            .await
            .expect("post video");
    }

    // Force distinct mtimes: r2 newest, r3 middle, r1 oldest.
    let base = SystemTime::now();
    for (id, age_secs) in [("r1", 30u64), ("r2", 10), ("r3", 20)] {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(env.log_path().join(format!("video_{id}.json")))
            .expect("open record");
        file.set_modified(base - Duration::from_secs(age_secs)).expect("set mtime");
    }

    let (_, body) = env.get(&app, "/api/logs").await.expect("list records");

    let names: Vec<&str> = body["files"]
        .as_array()
        .expect("files array")
        .iter()
        .map(|f| f["filename"].as_str().expect("filename"))
        .collect();
    assert_eq!(names, ["video_r2.json", "video_r3.json", "video_r1.json"]);
}

#[tokio::test]
async fn fetch_returns_the_full_record() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    let payload = fixtures::audio_payload("a9");
    env.post_json(&app, "/callback/audio/results", &payload).await.expect("post audio");

    let (status, record) = env.get(&app, "/api/logs/audio_a9.json").await.expect("fetch record");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["type"], json!("audio"));
    assert_eq!(record["requestId"], json!("a9"));
    assert_eq!(record["data"], payload);
}

#[tokio::test]
async fn missing_record_returns_not_found() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    let (status, body) =
        env.get(&app, "/api/logs/audio_absent.json").await.expect("fetch record");

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Log file not found"));
}

#[tokio::test]
async fn traversal_names_are_rejected_before_the_filesystem() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    for uri in ["/api/logs/..", "/api/logs/%2E%2E", "/api/logs/a%2Fb.json", "/api/logs/a%5Cb.json"]
    {
        let (status, body) = env.get(&app, uri).await.expect("fetch record");

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body["error"], json!("Invalid filename"), "uri {uri}");
    }
}

#[tokio::test]
async fn interior_dots_are_legal_record_names() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    // Valid name, merely absent: 404 rather than a validation reject.
    let (status, body) =
        env.get(&app, "/api/logs/video_a..b.json").await.expect("fetch record");

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Log file not found"));
}

#[tokio::test]
async fn log_routes_are_not_mounted_outside_file_mode() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.console_router();

    let (status, _) = env.get(&app, "/api/logs").await.expect("list request");
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = env.get(&app, "/api/logs/audio_r1.json").await.expect("fetch request");
    assert_eq!(status, StatusCode::NOT_FOUND);
}
