//! HTTP-level gateway tests against a mock server.

use httpmock::prelude::*;
use serde_json::json;

use super::HttpGateway;
use crate::client::CommunityGateway;
use crate::envelope::{GatewayError, CODE_ALREADY_CLAIMED};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.base_url(), "token-abc", 5_000).expect("build gateway")
}

#[tokio::test]
async fn task_status_forwards_credential_and_decodes_pack() {
    let server = MockServer::start_async().await;
    let pack = json!({
        "tasks": [
            {"id": "t1", "kind": "like_post", "name": "Like 5 posts",
             "required": 5, "progress": 2, "status": 0}
        ],
        "coins": 40
    })
    .to_string();
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/task/status")
                .header("authorization", "Bearer token-abc");
            then.status(200)
                .json_body(json!({"returnCode": 0, "errorMessage": "", "data": pack}));
        })
        .await;

    let status = gateway(&server)
        .fetch_task_status()
        .await
        .expect("fetch status");
    mock.assert_async().await;
    assert_eq!(status.tasks.len(), 1);
    assert_eq!(status.tasks[0].required, 5);
    assert_eq!(status.coins, 40);
}

#[tokio::test]
async fn domain_failure_surfaces_code_and_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/post/view");
            then.status(200).json_body(json!({
                "returnCode": 21,
                "errorMessage": "post not found",
                "data": null
            }));
        })
        .await;

    let err = gateway(&server)
        .view_post("missing")
        .await
        .expect_err("domain error");
    match err {
        GatewayError::Domain { code, message, .. } => {
            assert_eq!(code, 21);
            assert_eq!(message, "post not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn like_toggle_sends_apply_flag() {
    let server = MockServer::start_async().await;
    let unlike = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/post/like")
                .json_body(json!({"post_id": "p7", "apply": false}));
            then.status(200)
                .json_body(json!({"returnCode": 0, "errorMessage": "", "data": null}));
        })
        .await;

    gateway(&server)
        .set_post_like("p7", false)
        .await
        .expect("unlike");
    unlike.assert_async().await;
}

#[tokio::test]
async fn post_page_passes_cursor_through() {
    let server = MockServer::start_async().await;
    let pack = json!({
        "posts": [{"id": "p3", "title": "patch notes", "liked": false}],
        "last_id": "p3"
    })
    .to_string();
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/post/list")
                .json_body(json!({"last_id": "p2"}));
            then.status(200)
                .json_body(json!({"returnCode": 0, "errorMessage": "", "data": pack}));
        })
        .await;

    let page = gateway(&server)
        .fetch_post_page(Some("p2"))
        .await
        .expect("fetch page");
    mock.assert_async().await;
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.next_cursor(), Some("p3"));
}

#[tokio::test]
async fn malformed_pack_on_success_envelope_is_local_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/task/status");
            then.status(200).json_body(json!({
                "returnCode": 0,
                "errorMessage": "",
                "data": "{broken"
            }));
        })
        .await;

    let err = gateway(&server)
        .fetch_task_status()
        .await
        .expect_err("malformed pack");
    assert!(matches!(err, GatewayError::Pack { .. }));
}

#[tokio::test]
async fn claim_day_reward_tolerates_missing_pack() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/reward/day")
                .json_body(json!({"day": 14}));
            then.status(200)
                .json_body(json!({"returnCode": 0, "errorMessage": "", "data": null}));
        })
        .await;

    let outcome = gateway(&server)
        .claim_day_reward(14)
        .await
        .expect("claim succeeds without a pack");
    assert_eq!(outcome.coins, 0);
}

#[tokio::test]
async fn already_claimed_reward_is_recognizable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/reward/day");
            then.status(200).json_body(json!({
                "returnCode": CODE_ALREADY_CLAIMED,
                "errorMessage": "reward already collected",
                "data": null
            }));
        })
        .await;

    let err = gateway(&server)
        .claim_day_reward(1)
        .await
        .expect_err("already claimed");
    assert!(err.is_already_claimed());
}

#[tokio::test]
async fn http_error_status_is_transport_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/task/status");
            then.status(503);
        })
        .await;

    let err = gateway(&server)
        .fetch_task_status()
        .await
        .expect_err("http failure");
    assert!(matches!(err, GatewayError::Transport { .. }));
}
