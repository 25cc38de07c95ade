//! Event bus built on tokio broadcast channels.

use tokio::sync::broadcast;

use crate::types::EventEnvelope;

/// Buffered events per subscriber; a slow observer loses old events rather
/// than stalling the game loop.
const DEFAULT_CAPACITY: usize = 1000;

/// Publish/subscribe fan-out for game events. Cloning is cheap and every
/// clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers. Returns how many subscribers
    /// received it; with no subscribers the event is dropped.
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameEvent;

    fn move_event() -> EventEnvelope {
        EventEnvelope::new(GameEvent::MovePlayed {
            file: "ab12cd34".to_string(),
            move_num: 1,
            side: "black".to_string(),
            text: "Q16".to_string(),
        })
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let envelope = move_event();
        let id = envelope.id;
        assert_eq!(bus.publish(envelope), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, id);
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let envelope = move_event();
        let id = envelope.id;
        assert_eq!(bus.publish(envelope), 2);

        assert_eq!(rx1.recv().await.unwrap().id, id);
        assert_eq!(rx2.recv().await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_dropped_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(move_event()), 0);
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let mut rx = bus.subscribe();

        clone.publish(move_event());
        assert!(rx.recv().await.is_ok());
        assert_eq!(bus.subscriber_count(), 1);
    }
}
