use super::backend::GenerativeBackend;
use super::error::EnrichError;
use super::parse::{parse_details, parse_summary};
use super::prompts::{details_prompt, summary_prompt, DETAILS_SYSTEM, SUMMARY_SYSTEM};
use super::retry::RetryPolicy;
use crate::domain::{Category, Details, SummaryPatch};
use std::sync::Arc;
use tracing::{debug, warn};

/// Summary and details requests sharing one backend and retry policy
#[derive(Clone)]
pub struct EnrichmentClient {
    backend: Arc<dyn GenerativeBackend>,
    policy: RetryPolicy,
}

impl EnrichmentClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, EnrichError> {
        self.policy
            .run(|| self.backend.generate(system, user))
            .await
    }

    /// Short card fields for a place
    pub async fn fetch_summary(
        &self,
        name: &str,
        category: Category,
    ) -> Result<SummaryPatch, EnrichError> {
        let prompt = summary_prompt(name, category);
        let result = self
            .generate(SUMMARY_SYSTEM, &prompt)
            .await
            .and_then(|text| parse_summary(&text));

        match &result {
            Ok(_) => debug!(%name, "summary generated"),
            Err(e) => warn!(%name, "summary request failed: {}", e),
        }
        result
    }

    /// Long-form details for a place
    pub async fn fetch_details(
        &self,
        name: &str,
        category: Category,
    ) -> Result<Details, EnrichError> {
        let prompt = details_prompt(name, category);
        let result = self
            .generate(DETAILS_SYSTEM, &prompt)
            .await
            .and_then(|text| parse_details(&text));

        match &result {
            Ok(_) => debug!(%name, "details generated"),
            Err(e) => warn!(%name, "details request failed: {}", e),
        }
        result
    }
}
