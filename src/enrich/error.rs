use thiserror::Error;

/// Why an enrichment request produced nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// No API key configured
    #[error("no API key configured for the generative endpoint")]
    MissingApiKey,

    /// Transport failure before a status was received
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error {code}: {message}")]
    Status { code: u16, message: String },

    /// The service answered without any generated text
    #[error("response contained no generated text")]
    EmptyResponse,

    /// Generated text did not hold the expected JSON
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Every attempt hit a retryable status
    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },
}

impl EnrichError {
    /// Rate limiting and server-side failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            EnrichError::Status { code, .. } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}
