//! Remote build service client
//!
//! Thin HTTP wrapper: upload a project archive, submit a sanitized job.
//! No retry logic lives here; failures propagate to the caller.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AirliftError, AirliftResult};
use crate::job::Job;

const DEFAULT_BASE_URL: &str = "https://api.airlift.dev";

/// Env var overriding the build service endpoint.
pub const BASE_URL_ENV: &str = "AIRLIFT_API_URL";

pub struct BuildServiceClient {
    agent: ureq::Agent,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadReply {
    archive_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitReply {
    build_id: String,
}

impl BuildServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_connect(Some(Duration::from_secs(30)))
                .timeout_global(Some(Duration::from_secs(600)))
                .build(),
        );
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    /// Client pointed at `AIRLIFT_API_URL`, or the public endpoint.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Upload a project archive; returns the URL the job references.
    pub fn upload_archive(&self, archive: &Path) -> AirliftResult<String> {
        let bytes = std::fs::read(archive)?;
        let mut response = self
            .agent
            .post(format!("{}/v1/uploads", self.base_url))
            .header("content-type", "application/gzip")
            .send(&bytes[..])
            .map_err(|err| AirliftError::BuildService(err.to_string()))?;
        let reply: UploadReply = response
            .body_mut()
            .read_json()
            .map_err(|err| AirliftError::BuildService(err.to_string()))?;
        Ok(reply.archive_url)
    }

    /// Submit a sanitized job; returns the build identifier.
    pub fn submit(&self, job: &Job) -> AirliftResult<String> {
        let mut response = self
            .agent
            .post(format!("{}/v1/builds", self.base_url))
            .send_json(job)
            .map_err(|err| AirliftError::BuildService(err.to_string()))?;
        let reply: SubmitReply = response
            .body_mut()
            .read_json()
            .map_err(|err| AirliftError::BuildService(err.to_string()))?;
        Ok(reply.build_id)
    }
}
