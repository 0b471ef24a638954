use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::{Outbound, RoomPublisher};

const ROOM_CHANNEL_CAPACITY: usize = 100;

/// In-process event fan-out: one broadcast channel per room. Transports
/// subscribe to the rooms their connection cares about and filter on
/// `Outbound::recipient` before forwarding.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<Outbound>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a room's events, creating its channel if needed.
    pub async fn subscribe_to_room(&self, room_code: &str) -> broadcast::Receiver<Outbound> {
        self.sender(room_code).await.subscribe()
    }

    async fn sender(&self, room_code: &str) -> broadcast::Sender<Outbound> {
        {
            let channels = self.room_channels.read().await;
            if let Some(sender) = channels.get(room_code) {
                return sender.clone();
            }
        }

        let mut channels = self.room_channels.write().await;
        channels
            .entry(room_code.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl RoomPublisher for EventBus {
    async fn publish(&self, room_code: &str, events: Vec<Outbound>) {
        let sender = self.sender(room_code).await;
        for event in events {
            if sender.send(event).is_err() {
                debug!(room_code = %room_code, "room event emitted with no receivers");
            }
        }
    }

    async fn close_room(&self, room_code: &str) {
        let mut channels = self.room_channels.write().await;
        if channels.remove(room_code).is_some() {
            debug!(room_code = %room_code, "room channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerId;
    use crate::protocol::ServerEvent;

    #[tokio::test]
    async fn test_subscribers_receive_room_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_to_room("AB12C").await;

        bus.publish(
            "AB12C",
            vec![Outbound::all(ServerEvent::RoomCreated {
                code: "AB12C".to_string(),
            })],
        )
        .await;

        let received = rx.recv().await.unwrap();
        assert_eq!(
            received.event,
            ServerEvent::RoomCreated {
                code: "AB12C".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let bus = EventBus::new();
        let mut rx_other = bus.subscribe_to_room("OTHER").await;

        bus.publish(
            "AB12C",
            vec![Outbound::all(ServerEvent::RoomCreated {
                code: "AB12C".to_string(),
            })],
        )
        .await;

        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(
            "EMPTY",
            vec![Outbound::to(
                PlayerId::new(),
                ServerEvent::HandReveal { cards: vec![] },
            )],
        )
        .await;
    }

    #[tokio::test]
    async fn test_close_room_drops_the_channel() {
        let bus = EventBus::new();
        let _rx = bus.subscribe_to_room("AB12C").await;
        bus.close_room("AB12C").await;

        let channels = bus.room_channels.read().await;
        assert!(!channels.contains_key("AB12C"));
    }
}
