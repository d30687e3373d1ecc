//! Remote-first generation with a local fallback.
//!
//! A failed remote call of any kind is logged and answered by running the
//! engine in-process.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{PlannerError, Result};
use crate::schedule::{plan_week, GeneratedSchedule, GenerationResponse, PlanOutcome, ScheduleRequest};

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Remote,
    /// The remote call failed and the local engine answered instead
    LocalFallback,
}

pub struct EngineClient {
    http: Client,
    remote_url: Option<String>,
}

impl EngineClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(EngineClient {
            http,
            remote_url: config.remote_url.clone(),
        })
    }

    /// Generates a schedule, preferring the remote engine when one is configured
    pub async fn generate(&self, request: &ScheduleRequest) -> (PlanOutcome, Source) {
        let Some(url) = self.remote_url.as_deref() else {
            return (plan_week(request), Source::Local);
        };

        match self.request_remote(url, request).await {
            Ok(generated) => (PlanOutcome::Scheduled(generated), Source::Remote),
            Err(e) => {
                warn!(error = %e, url, "remote engine failed, falling back to local generation");
                (plan_week(request), Source::LocalFallback)
            }
        }
    }

    async fn request_remote(&self, url: &str, request: &ScheduleRequest) -> Result<GeneratedSchedule> {
        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        debug!(%status, url, "remote engine responded");

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(PlannerError::Remote("Server returned non-JSON response".to_string()));
        }

        let body: GenerationResponse = response.json().await?;
        if !status.is_success() {
            return Err(PlannerError::Remote(
                body.error.unwrap_or_else(|| format!("Server error ({})", status)),
            ));
        }

        let error = body.error.clone();
        body.into_generated().ok_or_else(|| {
            PlannerError::Remote(error.unwrap_or_else(|| "Schedule generation failed".to_string()))
        })
    }
}
