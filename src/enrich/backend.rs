use super::error::EnrichError;
use async_trait::async_trait;

/// A text-generation service. One call is one request attempt; retries live above this seam.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for a system instruction and a user prompt
    async fn generate(&self, system: &str, user: &str) -> Result<String, EnrichError>;
}
