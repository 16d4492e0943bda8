//! `reqwest`-backed implementation of [`CommunityGateway`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::CommunityGateway;
use crate::envelope::{Envelope, GatewayError};
use crate::types::{ClaimOutcome, PostPage, TaskStatusPack};

#[derive(Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    credential: String,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        credential: &str,
        request_timeout_ms: u64,
    ) -> Result<Self, GatewayError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("perk-bot"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .map_err(|source| GatewayError::Transport {
                operation: "client_build",
                source,
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: credential.trim().to_string(),
        })
    }

    /// Single funnel every operation goes through: POST the body, check the
    /// HTTP status, decode the envelope, check the return code.
    async fn post_envelope(
        &self,
        operation: &'static str,
        path: &str,
        body: Value,
    ) -> Result<Envelope, GatewayError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.credential)
            .json(&body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?
            .error_for_status()
            .map_err(|source| GatewayError::Transport { operation, source })?;

        let raw = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;
        let envelope: Envelope =
            serde_json::from_str(&raw).map_err(|err| GatewayError::Shape {
                operation,
                detail: err.to_string(),
            })?;
        envelope.ensure_success(operation)?;
        Ok(envelope)
    }
}

#[async_trait]
impl CommunityGateway for HttpGateway {
    async fn fetch_task_status(&self) -> Result<TaskStatusPack, GatewayError> {
        let envelope = self
            .post_envelope("fetch_task_status", "task/status", json!({}))
            .await?;
        envelope.pack("fetch_task_status")
    }

    async fn fetch_post_page(&self, last_id: Option<&str>) -> Result<PostPage, GatewayError> {
        let body = match last_id {
            Some(last_id) => json!({ "last_id": last_id }),
            None => json!({}),
        };
        let envelope = self
            .post_envelope("fetch_post_page", "post/list", body)
            .await?;
        envelope.pack("fetch_post_page")
    }

    async fn view_post(&self, post_id: &str) -> Result<(), GatewayError> {
        self.post_envelope("view_post", "post/view", json!({ "post_id": post_id }))
            .await?;
        Ok(())
    }

    async fn share_post(&self, post_id: &str) -> Result<(), GatewayError> {
        self.post_envelope("share_post", "post/share", json!({ "post_id": post_id }))
            .await?;
        Ok(())
    }

    async fn set_post_like(&self, post_id: &str, apply: bool) -> Result<(), GatewayError> {
        self.post_envelope(
            "set_post_like",
            "post/like",
            json!({ "post_id": post_id, "apply": apply }),
        )
        .await?;
        Ok(())
    }

    async fn claim_day_reward(&self, day: u32) -> Result<ClaimOutcome, GatewayError> {
        let envelope = self
            .post_envelope("claim_day_reward", "reward/day", json!({ "day": day }))
            .await?;
        // The claim pack only carries statistics; a missing or malformed pack
        // degrades to a zero outcome instead of failing the claim.
        Ok(envelope.pack("claim_day_reward").unwrap_or_default())
    }

    async fn claim_task_reward(&self, task_id: &str) -> Result<ClaimOutcome, GatewayError> {
        let envelope = self
            .post_envelope(
                "claim_task_reward",
                "reward/task",
                json!({ "task_id": task_id }),
            )
            .await?;
        Ok(envelope.pack("claim_task_reward").unwrap_or_default())
    }
}

#[cfg(test)]
mod tests;
