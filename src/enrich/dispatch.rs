use super::batch::{fetch_details_batch, BatchSummary, BatchTarget};
use super::client::EnrichmentClient;
use super::error::EnrichError;
use crate::domain::{Category, Details, SummaryPatch};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

/// A settled request, delivered back to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentEvent {
    /// Autofill result for the add/edit form identified by `token`
    Summary {
        token: u64,
        result: Result<SummaryPatch, EnrichError>,
    },
    /// Details for one item, from a single request or a batch
    Details {
        id: Uuid,
        result: Result<Details, EnrichError>,
    },
    BatchFinished(BatchSummary),
}

/// Runs enrichment requests on the async runtime and queues their results
pub struct Enricher {
    handle: Handle,
    client: EnrichmentClient,
    tx: UnboundedSender<EnrichmentEvent>,
    rx: UnboundedReceiver<EnrichmentEvent>,
}

impl Enricher {
    pub fn new(handle: Handle, client: EnrichmentClient) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            handle,
            client,
            tx,
            rx,
        }
    }

    fn send(tx: &UnboundedSender<EnrichmentEvent>, event: EnrichmentEvent) {
        if tx.send(event).is_err() {
            warn!("enrichment result dropped, receiver is gone");
        }
    }

    pub fn request_summary(&self, token: u64, name: String, category: Category) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(token, %name, "dispatching summary request");
        self.handle.spawn(async move {
            let result = client.fetch_summary(&name, category).await;
            Self::send(&tx, EnrichmentEvent::Summary { token, result });
        });
    }

    pub fn request_details(&self, id: Uuid, name: String, category: Category) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(%id, %name, "dispatching details request");
        self.handle.spawn(async move {
            let result = client.fetch_details(&name, category).await;
            Self::send(&tx, EnrichmentEvent::Details { id, result });
        });
    }

    /// Start a batch; each item's event arrives as it settles, then `BatchFinished`
    pub fn start_batch(&self, targets: Vec<BatchTarget>) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(count = targets.len(), "dispatching batch details");
        self.handle.spawn(async move {
            let item_tx = tx.clone();
            let summary = fetch_details_batch(&client, targets, move |id, result| {
                Self::send(&item_tx, EnrichmentEvent::Details { id, result });
            })
            .await;
            Self::send(&tx, EnrichmentEvent::BatchFinished(summary));
        });
    }

    /// Everything that settled since the last call, without blocking
    pub fn drain(&mut self) -> Vec<EnrichmentEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
