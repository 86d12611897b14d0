//! A batched rules engine for the Carcassonne base game.
//!
//! Many independent games live behind one [`engine::GameEngine`]: callers
//! submit heterogeneous batches of requests (play a turn, enumerate legal
//! moves, query remaining-tile probabilities, project scores) and get one
//! response per request, with per-request failure isolation. The engine is
//! an in-process concurrent service; transport and persistence belong to
//! the embedding application.
//!
//! ```no_run
//! use carcassonne_engine::engine::{GameEngine, PlayTurnRequest};
//! use carcassonne_engine::tileset::standard_tile_set;
//!
//! let engine = GameEngine::start(4, None)?;
//! let game = engine.generate_game(standard_tile_set())?;
//! let mv = game.game.valid_placements[0].clone();
//! let responses = engine.send_play_turn_batch(vec![PlayTurnRequest {
//!     game_id: game.id,
//!     mv,
//! }]);
//! assert!(responses[0].result.is_ok());
//! # Ok::<(), carcassonne_engine::engine::EngineError>(())
//! ```

pub mod deck;
pub mod engine;
pub mod game;
pub mod logger;
pub mod tile;
pub mod tileset;
