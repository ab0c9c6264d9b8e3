use super::client::EnrichmentClient;
use super::error::EnrichError;
use crate::domain::{Category, Details, ScheduleItem};
use futures::future::join_all;
use tracing::info;
use uuid::Uuid;

/// An item queued for a details request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTarget {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
}

/// Counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Items of an eligible category whose details content is still empty
pub fn select_batch_targets(items: &[ScheduleItem]) -> Vec<BatchTarget> {
    items
        .iter()
        .filter(|i| i.needs_details())
        .map(|i| BatchTarget {
            id: i.id,
            name: i.name.clone(),
            category: i.category,
        })
        .collect()
}

/// Fire every details request at once and wait for all of them.
///
/// `on_result` is called for each item as its own request settles, so callers can
/// merge into the live store immediately. One failure never cancels its siblings.
pub async fn fetch_details_batch<F>(
    client: &EnrichmentClient,
    targets: Vec<BatchTarget>,
    on_result: F,
) -> BatchSummary
where
    F: Fn(Uuid, Result<Details, EnrichError>),
{
    let on_result = &on_result;
    let requests = targets.into_iter().map(|target| async move {
        let result = client.fetch_details(&target.name, target.category).await;
        let ok = result.is_ok();
        on_result(target.id, result);
        ok
    });

    let outcomes = join_all(requests).await;
    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    let summary = BatchSummary {
        succeeded,
        failed: outcomes.len() - succeeded,
    };
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch details finished"
    );
    summary
}
