use thiserror::Error;

use crate::game::cards::{Card, SetError};

/// Everything a client intent can be rejected with. None of these are
/// fatal: a rejected intent leaves its room untouched, and the message
/// goes back to the acting player only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room code is already taken")]
    RoomCodeTaken,
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("at least 2 players are required")]
    NotEnoughPlayers,
    #[error("only the host may do that")]
    NotHost,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("you have already finished this round")]
    PlayerFinished,
    #[error("you do not own {0}")]
    CardNotOwned(Card),
    #[error("invalid card set: {0}")]
    InvalidCardSet(#[from] SetError),
    #[error("at least {required} card(s) are required to beat the trick")]
    BelowRequiredCount { required: usize },
    #[error("play must match or beat the trick's top rank")]
    BelowRequiredRank,
}
