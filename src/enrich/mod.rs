//! AI enrichment of schedule items through a generative-text service.
//!
//! Every failure is reported as an [`EnrichError`] and treated by callers as
//! "nothing changed for this item".

pub mod backend;
pub mod batch;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompts;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::GenerativeBackend;
pub use batch::{fetch_details_batch, select_batch_targets, BatchSummary, BatchTarget};
pub use client::EnrichmentClient;
pub use dispatch::{Enricher, EnrichmentEvent};
pub use error::EnrichError;
pub use gemini::GeminiBackend;
pub use retry::RetryPolicy;
