//! Render-cache revalidation
//!
//! Catalog writes publish a [`CatalogEvent`]; every stale page path it
//! implies is logged, broadcast to in-process subscribers, and forwarded to
//! NATS when a client is configured.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::events::CatalogEvent;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revalidation {
    pub path: String,
    #[serde(flatten)]
    pub cause: CatalogEvent,
}

#[derive(Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<Revalidation>,
    nats: Option<async_nats::Client>,
    subject: String,
}

impl Revalidator {
    pub fn new(subject: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx, nats: None, subject: subject.into() }
    }

    pub fn with_nats(mut self, client: async_nats::Client) -> Self {
        self.nats = Some(client);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Revalidation> {
        self.tx.subscribe()
    }

    pub async fn publish(&self, event: CatalogEvent) {
        for path in event.stale_paths() {
            let signal = Revalidation { path, cause: event.clone() };
            tracing::info!(path = %signal.path, "revalidating");
            // No subscribers is fine.
            let _ = self.tx.send(signal.clone());

            if let Some(nats) = &self.nats {
                match serde_json::to_vec(&signal) {
                    Ok(payload) => {
                        if let Err(e) = nats.publish(self.subject.clone(), payload.into()).await {
                            tracing::warn!(error = %e, path = %signal.path, "failed to publish revalidation");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to encode revalidation"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_publish_fans_out_each_path() {
        let revalidator = Revalidator::new("test.revalidate");
        let mut rx = revalidator.subscribe();
        let event = CatalogEvent::ProductUpdated { product_id: Uuid::nil(), slug: "desk-lamp".into() };
        revalidator.publish(event.clone()).await;

        assert_eq!(rx.recv().await.unwrap(), Revalidation { path: "/admin/products".into(), cause: event.clone() });
        assert_eq!(rx.recv().await.unwrap().path, "/products/desk-lamp");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        Revalidator::new("test.revalidate").publish(CatalogEvent::CategoryCreated { category_id: Uuid::nil() }).await;
    }

    #[test]
    fn test_wire_format() {
        let signal = Revalidation { path: "/admin/categories".into(), cause: CatalogEvent::CategoryDeleted { category_id: Uuid::nil() } };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["path"], "/admin/categories");
        assert_eq!(json["event"], "category_deleted");
    }
}
