// Public API
pub use cards::{Card, CardSet, Rank, SetError, Suit};
pub use player::{Player, PlayerId};
pub use roles::Role;
pub use room::{Room, Spin, SpinToken, MIN_PLAYERS};
pub use trick::{Play, Trick};

// Internal modules
pub mod cards;
pub mod player;
pub mod roles;
pub mod room;
pub mod trick;
