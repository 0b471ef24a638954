// Room engine for the Presidents card game.
//
// The crate is the authoritative game core a transport embeds: client
// intents come in through `RoomService`, rooms validate and apply them,
// and the resulting events leave through a `RoomPublisher`. Nothing here
// opens sockets or persists state.

pub mod error;
pub mod event;
pub mod game;
pub mod protocol;
pub mod registry;
pub mod service;

// Re-export commonly used types for embedders and integration tests
pub use error::GameError;
pub use event::{EventBus, Outbound, Recipient, RoomPublisher};
pub use game::{Card, Player, PlayerId, Rank, Role, Room, Suit};
pub use protocol::{ClientIntent, RoomSnapshot, ServerEvent};
pub use registry::RoomRegistry;
pub use service::{Joined, RoomService, SPIN_COMMIT_DELAY};
