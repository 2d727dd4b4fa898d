//! Client for the order-parsing service.
//!
//! Callers treat the parser as best effort: any failure is logged and turned
//! into an empty item list so the ordering flow can carry on.

use crate::config::Settings;
use crate::dto::{ParseRequest, ParseResponse};
use crate::error::{AppError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct NluClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl NluClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.service_url.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Ask the parser for the items in `text`. Never fails; an unreachable
    /// or misbehaving service yields an empty response.
    pub async fn parse_order(&self, text: &str, product_keywords: &[String]) -> ParseResponse {
        match self.try_parse_order(text, product_keywords).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%e, "nlu service call failed, continuing without items");
                ParseResponse::default()
            }
        }
    }

    async fn try_parse_order(
        &self,
        text: &str,
        product_keywords: &[String],
    ) -> Result<ParseResponse> {
        let url = format!("{}/parse", self.base_url.trim_end_matches('/'));
        let req = ParseRequest {
            text: text.to_string(),
            product_keywords: product_keywords.to_vec(),
        };
        debug!(%url, keywords = product_keywords.len(), "\u{2192} nlu request");
        let res = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&req)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = res.status();
        debug!(%status, "\u{2190} nlu response");
        if !status.is_success() {
            return Err(AppError::Upstream(format!("http status {status}")));
        }
        res.json::<ParseResponse>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid body: {e}")))
    }
}

/// One-shot helper mirroring [`NluClient::parse_order`] for callers that do
/// not keep a client around.
pub async fn call_nlu_service(settings: &Settings, text: &str, product_keywords: &[String]) -> ParseResponse {
    NluClient::from_settings(settings)
        .parse_order(text, product_keywords)
        .await
}
