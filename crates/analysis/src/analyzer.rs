//! Segment analyzers — turn an [`AnalysisRequest`] into descriptive text.

use async_trait::async_trait;
use segment_core::config::AnalysisConfig;
use segment_core::{SegmentError, SegmentResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::request::{AnalysisOutput, AnalysisRequest};

#[async_trait]
pub trait SegmentAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> SegmentResult<AnalysisOutput>;
}

#[derive(Serialize)]
struct PromptBody<'a> {
    prompt: String,
    #[serde(flatten)]
    input: &'a AnalysisRequest,
}

/// Posts the rendered prompt (plus the raw request fields) as JSON to a
/// text-generation endpoint that answers with `{ "analysis": "..." }`.
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzer {
    pub fn new(config: &AnalysisConfig) -> SegmentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SegmentError::Analysis(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SegmentAnalyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> SegmentResult<AnalysisOutput> {
        let body = PromptBody {
            prompt: request.render_prompt(),
            input: request,
        };
        debug!(endpoint = %self.endpoint, segment = %request.segment_name, "Requesting segment analysis");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SegmentError::Analysis(e.to_string()))?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Analysis endpoint returned an error");
            return Err(SegmentError::Analysis(format!("HTTP {}", resp.status())));
        }

        resp.json::<AnalysisOutput>()
            .await
            .map_err(|e| SegmentError::Analysis(format!("invalid analysis response: {e}")))
    }
}
