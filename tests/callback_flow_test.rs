//! End-to-end callback flow over the file archive.
//!
//! Drives the public router exactly as the moderation provider would:
//! deliver audio and video results, browse the archived records, read
//! them back, and poll health along the way.

use std::time::Duration;

use axum::http::StatusCode;
use modsink_testing::{fixtures, CallbackBuilder, TestEnv};
use serde_json::json;

#[tokio::test]
async fn provider_flow_archives_and_serves_records() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    let audio = fixtures::audio_payload("aud-7");
    let (status, body) =
        env.post_json(&app, "/callback/audio/results", &audio).await.expect("post audio");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["savedToFile"], json!("audio_aud-7.json"));

    let video = fixtures::video_payload("vid-7");
    let (status, body) =
        env.post_json(&app, "/callback/video/results", &video).await.expect("post video");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["savedToFile"], json!("video_vid-7.json"));

    let (status, listing) = env.get(&app, "/api/logs").await.expect("list records");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["count"], json!(2));

    let (_, audio_record) =
        env.get(&app, "/api/logs/audio_aud-7.json").await.expect("fetch audio record");
    assert_eq!(audio_record["type"], json!("audio"));
    assert_eq!(audio_record["data"], audio);

    let (_, video_record) =
        env.get(&app, "/api/logs/video_vid-7.json").await.expect("fetch video record");
    assert_eq!(video_record["type"], json!("video"));
    assert_eq!(video_record["data"], video);

    let (status, health) = env.get(&app, "/health").await.expect("health request");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], json!("ok"));
}

#[tokio::test]
async fn redelivered_callback_replaces_the_archived_record() {
    let env = TestEnv::new().expect("test env setup");
    let app = env.file_router().await.expect("file router");

    let first = CallbackBuilder::video().request_id("vid-9").field("riskLevel", json!("REVIEW"));
    env.post_json(&app, "/callback/video/results", &first.build())
        .await
        .expect("post first delivery");

    env.clock.advance(Duration::from_secs(30));

    let second = CallbackBuilder::video().request_id("vid-9").field("riskLevel", json!("REJECT"));
    let second_payload = second.build();
    env.post_json(&app, "/callback/video/results", &second_payload)
        .await
        .expect("post redelivery");

    let (_, listing) = env.get(&app, "/api/logs").await.expect("list records");
    assert_eq!(listing["count"], json!(1));

    let (_, record) = env.get(&app, "/api/logs/video_vid-9.json").await.expect("fetch record");
    assert_eq!(record["data"], second_payload);
    assert_eq!(record["data"]["riskLevel"], json!("REJECT"));
}
