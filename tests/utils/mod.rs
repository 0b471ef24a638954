#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use presidents::{
    Card, Outbound, PlayerId, Recipient, RoomPublisher, RoomRegistry, RoomService, ServerEvent,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Publisher that records everything the engine emits, per room.
#[derive(Default)]
pub struct CapturePublisher {
    records: Mutex<Vec<(String, Outbound)>>,
    closed: Mutex<Vec<String>>,
}

impl CapturePublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn events_for(&self, code: &str) -> Vec<Outbound> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|(room, _)| room == code)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub async fn event_count(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn closed_rooms(&self) -> Vec<String> {
        self.closed.lock().await.clone()
    }
}

#[async_trait]
impl RoomPublisher for CapturePublisher {
    async fn publish(&self, room_code: &str, events: Vec<Outbound>) {
        let mut records = self.records.lock().await;
        for event in events {
            records.push((room_code.to_string(), event));
        }
    }

    async fn close_room(&self, room_code: &str) {
        self.closed.lock().await.push(room_code.to_string());
    }
}

pub struct TestSetup {
    pub registry: Arc<RoomRegistry>,
    pub publisher: Arc<CapturePublisher>,
    pub service: RoomService,
}

/// Service wired to a capture publisher, with the registry kept reachable
/// so tests can inspect (or script) room state directly.
pub fn setup() -> TestSetup {
    init_tracing();
    let registry = Arc::new(RoomRegistry::new());
    let publisher = CapturePublisher::new();
    let service = RoomService::new(Arc::clone(&registry), publisher.clone());
    TestSetup {
        registry,
        publisher,
        service,
    }
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

// ============================================================================
// Card And Event Helpers
// ============================================================================

pub fn c(code: &str) -> Card {
    code.parse().unwrap()
}

pub fn hand(codes: &[&str]) -> Vec<Card> {
    let mut cards: Vec<Card> = codes.iter().map(|code| c(code)).collect();
    cards.sort();
    cards
}

/// Events visible to `player`: broadcasts plus their private messages.
pub fn visible_to(events: &[Outbound], player: PlayerId) -> Vec<ServerEvent> {
    events
        .iter()
        .filter(|outbound| outbound.is_for(player))
        .map(|outbound| outbound.event.clone())
        .collect()
}

pub fn broadcasts(events: &[Outbound]) -> Vec<ServerEvent> {
    events
        .iter()
        .filter(|outbound| outbound.recipient == Recipient::All)
        .map(|outbound| outbound.event.clone())
        .collect()
}

/// The most recent broadcast room snapshot.
pub fn last_state(events: &[Outbound]) -> presidents::RoomSnapshot {
    events
        .iter()
        .rev()
        .find_map(|outbound| match &outbound.event {
            ServerEvent::State(snapshot) => Some(snapshot.clone()),
            _ => None,
        })
        .expect("no state snapshot was broadcast")
}
