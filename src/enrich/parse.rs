use super::error::EnrichError;
use crate::domain::{Category, Details, Summary, SummaryPatch};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Cut the text down to the span between the first `{` and the last `}`
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Parse a JSON object that may be wrapped in prose or code fences
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T, EnrichError> {
    serde_json::from_str(extract_json_object(text)).map_err(|e| EnrichError::Malformed(e.to_string()))
}

/// Nested wrapper some responses use around category and summary
#[derive(Debug, Default, Deserialize)]
struct NestedSummary {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    summary: Option<Summary>,
}

/// Body of a summary request
#[derive(Debug, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, alias = "jp_name")]
    pub search_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default, rename = "ai_data", alias = "aiData")]
    nested: Option<NestedSummary>,
}

impl SummaryResponse {
    /// Flatten into a patch; unknown category tags are dropped
    pub fn into_patch(self) -> SummaryPatch {
        let nested = self.nested.unwrap_or_default();
        let category = self
            .category
            .or(nested.category)
            .and_then(|tag| Category::from_tag(&tag));

        SummaryPatch {
            short_description: self.desc,
            search_name: self.search_name,
            category,
            summary: self.summary.or(nested.summary).unwrap_or_default(),
        }
    }
}

/// Body of a details request
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub details: Details,
}

pub fn parse_summary(text: &str) -> Result<SummaryPatch, EnrichError> {
    parse_payload::<SummaryResponse>(text).map(SummaryResponse::into_patch)
}

pub fn parse_details(text: &str) -> Result<Details, EnrichError> {
    parse_payload::<DetailsResponse>(text).map(|r| r.details)
}
