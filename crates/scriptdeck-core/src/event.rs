//! Catalog events over `tokio::sync::broadcast`

use tokio::sync::broadcast;

/// Events emitted by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataEvent {
    /// Metadata reload started
    MetadataLoading,
    /// Metadata reload succeeded
    MetadataLoaded { entries: usize },
    /// Metadata reload failed (the previous index is still served)
    MetadataFailed(String),
    /// A script's text entered the cache
    ContentCached(String),
    /// A script fetch failed
    ContentFailed { path: String, reason: String },
}

/// Backlog a slow subscriber may fall behind by before it sees `Lagged`
const CAPACITY: usize = 64;

/// Fan-out of catalog events; the TUI drains its receiver every frame
pub struct EventBus {
    sender: broadcast::Sender<DataEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Send to every current receiver; dropped when nobody listens
    pub fn publish(&self, event: DataEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(DataEvent::MetadataLoading);
        bus.publish(DataEvent::ContentCached("sapp/Core/foo.lua".to_string()));

        assert_eq!(rx.recv().await.unwrap(), DataEvent::MetadataLoading);
        assert!(
            matches!(rx.recv().await.unwrap(), DataEvent::ContentCached(p) if p == "sapp/Core/foo.lua")
        );
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DataEvent::MetadataLoaded { entries: 3 });

        assert_eq!(rx1.recv().await.unwrap(), DataEvent::MetadataLoaded { entries: 3 });
        assert_eq!(rx2.recv().await.unwrap(), DataEvent::MetadataLoaded { entries: 3 });
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::new();
        bus.publish(DataEvent::MetadataFailed("HTTP 404".to_string()));
    }
}
