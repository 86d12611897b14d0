//! The closed error taxonomy of the engine boundary.
//!
//! Every failure travels inside the response of the request that caused
//! it; nothing is thrown across a batch. Only [`EngineError::Io`] can
//! surface synchronously, from engine construction.

use thiserror::Error;

use crate::engine::store::GameId;
use crate::game::GameError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game with the given ID was not found: {0}")]
    GameNotFound(GameId),
    #[error("engine is closed")]
    EngineClosed,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("engine I/O failure")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::GameNotFound(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, EngineError::EngineClosed)
    }

    /// True for operations on a game whose deck has run out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, EngineError::Game(GameError::DeckExhausted))
    }
}
