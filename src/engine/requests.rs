//! Request and response types of the batch API, and their execution
//! against a stored game.
//!
//! Each response carries the game id it was submitted for and either a
//! success payload or an error, never both. Read-only requests may target
//! the live game or a what-if snapshot resolved on top of it.

use std::collections::{BTreeMap, HashMap};

use crate::engine::error::EngineError;
use crate::engine::store::{GameId, GameSlot};
use crate::game::{Game, GameError, PlacedTile, PlayerId, SerializedGame};
use crate::tile::Tile;

/// What a read-only request evaluates against: the live game, or an
/// explicit snapshot layered on top of it.
#[derive(Debug, Clone)]
pub enum Target {
    Live(GameId),
    WhatIf {
        game_id: GameId,
        snapshot: SnapshotState,
    },
}

impl Target {
    pub fn game_id(&self) -> GameId {
        match self {
            Target::Live(id) => *id,
            Target::WhatIf { game_id, .. } => *game_id,
        }
    }

    fn snapshot(&self) -> Option<&SnapshotState> {
        match self {
            Target::Live(_) => None,
            Target::WhatIf { snapshot, .. } => Some(snapshot),
        }
    }
}

/// A what-if game state: the serialized state it describes plus the moves
/// that produce it from the base game. Resolution replays the moves onto a
/// swappable-tile clone, so the live game is never touched.
#[derive(Debug, Clone)]
pub struct SnapshotState {
    serialized: SerializedGame,
    simulated_moves: Vec<PlacedTile>,
}

impl SnapshotState {
    pub fn new(serialized: SerializedGame, simulated_moves: Vec<PlacedTile>) -> SnapshotState {
        SnapshotState {
            serialized,
            simulated_moves,
        }
    }

    pub fn serialized(&self) -> &SerializedGame {
        &self.serialized
    }

    fn with(
        previous: Option<&SnapshotState>,
        serialized: SerializedGame,
        mv: PlacedTile,
    ) -> SnapshotState {
        let mut simulated_moves = previous.map_or_else(Vec::new, |p| p.simulated_moves.clone());
        simulated_moves.push(mv);
        SnapshotState {
            serialized,
            simulated_moves,
        }
    }

    fn resolve(&self, base: &Game) -> Result<Game, EngineError> {
        let mut game = base.deep_clone_with_swappable_tiles();
        for mv in &self.simulated_moves {
            game.swap_current_tile(&mv.to_tile())?;
            game.play_turn(mv.clone())?;
        }
        Ok(game)
    }
}

// --- Request payloads ---

#[derive(Debug, Clone)]
pub struct PlayTurnRequest {
    pub game_id: GameId,
    /// The chosen placement of the current tile, including any meeple.
    pub mv: PlacedTile,
}

#[derive(Debug, Clone)]
pub struct GetLegalMovesRequest {
    pub target: Target,
    pub tile_to_place: Tile,
}

#[derive(Debug, Clone)]
pub struct GetRemainingTilesRequest {
    pub target: Target,
}

#[derive(Debug, Clone)]
pub struct GetMidGameScoreRequest {
    pub target: Target,
}

#[derive(Debug)]
pub enum Request {
    PlayTurn(PlayTurnRequest),
    GetLegalMoves(GetLegalMovesRequest),
    GetRemainingTiles(GetRemainingTilesRequest),
    GetMidGameScore(GetMidGameScoreRequest),
}

impl Request {
    pub fn game_id(&self) -> GameId {
        match self {
            Request::PlayTurn(r) => r.game_id,
            Request::GetLegalMoves(r) => r.target.game_id(),
            Request::GetRemainingTiles(r) => r.target.game_id(),
            Request::GetMidGameScore(r) => r.target.game_id(),
        }
    }

    /// Builds the matching failed response without executing anything.
    pub(crate) fn fail(self, err: EngineError) -> Response {
        let game_id = self.game_id();
        match self {
            Request::PlayTurn(_) => Response::PlayTurn(PlayTurnResponse {
                game_id,
                result: Err(err),
            }),
            Request::GetLegalMoves(_) => Response::GetLegalMoves(GetLegalMovesResponse {
                game_id,
                result: Err(err),
            }),
            Request::GetRemainingTiles(_) => {
                Response::GetRemainingTiles(GetRemainingTilesResponse {
                    game_id,
                    result: Err(err),
                })
            }
            Request::GetMidGameScore(_) => Response::GetMidGameScore(GetMidGameScoreResponse {
                game_id,
                result: Err(err),
            }),
        }
    }

    /// Executes against the stored game, taking the per-game lock in the
    /// mode the request needs.
    pub(crate) fn execute(self, slot: &GameSlot) -> Response {
        match self {
            Request::PlayTurn(r) => Response::PlayTurn(execute_play_turn(slot, r)),
            Request::GetLegalMoves(r) => Response::GetLegalMoves(execute_get_legal_moves(slot, r)),
            Request::GetRemainingTiles(r) => {
                Response::GetRemainingTiles(execute_get_remaining_tiles(slot, r))
            }
            Request::GetMidGameScore(r) => {
                Response::GetMidGameScore(execute_get_mid_game_score(slot, r))
            }
        }
    }
}

// --- Response payloads ---

#[derive(Debug)]
pub struct PlayTurnOutcome {
    pub game: SerializedGame,
    /// Present exactly on the turn that exhausts the deck: every player's
    /// final score, farms and unfinished features included.
    pub final_scores: Option<HashMap<PlayerId, u32>>,
}

#[derive(Debug)]
pub struct PlayTurnResponse {
    pub game_id: GameId,
    pub result: Result<PlayTurnOutcome, EngineError>,
}

/// A legal move paired with the snapshot of the state it produces, ready
/// to be fed back as a what-if target.
#[derive(Debug, Clone)]
pub struct MoveWithState {
    pub mv: PlacedTile,
    pub state: SnapshotState,
}

#[derive(Debug)]
pub struct GetLegalMovesResponse {
    pub game_id: GameId,
    pub result: Result<Vec<MoveWithState>, EngineError>,
}

/// A tile paired with its probability of being the next draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TileProbability {
    pub tile: Tile,
    pub probability: f32,
}

#[derive(Debug)]
pub struct GetRemainingTilesResponse {
    pub game_id: GameId,
    pub result: Result<Vec<TileProbability>, EngineError>,
}

#[derive(Debug)]
pub struct GetMidGameScoreResponse {
    pub game_id: GameId,
    pub result: Result<HashMap<PlayerId, u32>, EngineError>,
}

#[derive(Debug)]
pub enum Response {
    PlayTurn(PlayTurnResponse),
    GetLegalMoves(GetLegalMovesResponse),
    GetRemainingTiles(GetRemainingTilesResponse),
    GetMidGameScore(GetMidGameScoreResponse),
}

impl Response {
    pub fn game_id(&self) -> GameId {
        match self {
            Response::PlayTurn(r) => r.game_id,
            Response::GetLegalMoves(r) => r.game_id,
            Response::GetRemainingTiles(r) => r.game_id,
            Response::GetMidGameScore(r) => r.game_id,
        }
    }

    pub fn err(&self) -> Option<&EngineError> {
        match self {
            Response::PlayTurn(r) => r.result.as_ref().err(),
            Response::GetLegalMoves(r) => r.result.as_ref().err(),
            Response::GetRemainingTiles(r) => r.result.as_ref().err(),
            Response::GetMidGameScore(r) => r.result.as_ref().err(),
        }
    }
}

// --- Execution ---

fn execute_play_turn(slot: &GameSlot, request: PlayTurnRequest) -> PlayTurnResponse {
    let game_id = request.game_id;
    let mut game = slot.game.write().expect("game lock poisoned");

    if let Err(err) = game.play_turn(request.mv) {
        return PlayTurnResponse {
            game_id,
            result: Err(err.into()),
        };
    }

    let final_scores = match game.finalize() {
        Ok(report) => Some(report.received_points),
        Err(GameError::GameNotFinished) => None,
        Err(err) => {
            return PlayTurnResponse {
                game_id,
                result: Err(err.into()),
            }
        }
    };

    PlayTurnResponse {
        game_id,
        result: Ok(PlayTurnOutcome {
            game: game.serialized(),
            final_scores,
        }),
    }
}

/// Runs `body` against the request target: the live game as-is, or the
/// snapshot resolved on top of it.
fn with_target<T>(
    slot: &GameSlot,
    target: &Target,
    body: impl FnOnce(&Game, Option<&SnapshotState>) -> Result<T, EngineError>,
) -> Result<T, EngineError> {
    let game = slot.game.read().expect("game lock poisoned");
    match target.snapshot() {
        None => body(&game, None),
        Some(snapshot) => {
            let resolved = snapshot.resolve(&game)?;
            body(&resolved, Some(snapshot))
        }
    }
}

fn execute_get_legal_moves(slot: &GameSlot, request: GetLegalMovesRequest) -> GetLegalMovesResponse {
    let game_id = request.target.game_id();
    let result = with_target(slot, &request.target, |game, snapshot| {
        let mut moves = Vec::new();
        for placement in game.get_tile_placements_for(&request.tile_to_place) {
            for mv in game.get_legal_moves_for(&placement) {
                let mut sim = game.deep_clone_with_swappable_tiles();
                sim.swap_current_tile(&mv.to_tile())?;
                sim.play_turn(mv.clone())?;
                moves.push(MoveWithState {
                    state: SnapshotState::with(snapshot, sim.serialized(), mv.clone()),
                    mv,
                });
            }
        }
        Ok(moves)
    });
    GetLegalMovesResponse { game_id, result }
}

fn execute_get_remaining_tiles(
    slot: &GameSlot,
    request: GetRemainingTilesRequest,
) -> GetRemainingTilesResponse {
    let game_id = request.target.game_id();
    let result = with_target(slot, &request.target, |game, _| {
        let remaining = game.remaining_tiles();
        let total = remaining.len() as f32;
        let mut counts: BTreeMap<Tile, u32> = BTreeMap::new();
        for tile in remaining {
            *counts.entry(tile).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(tile, count)| TileProbability {
                tile,
                probability: count as f32 / total,
            })
            .collect())
    });
    GetRemainingTilesResponse { game_id, result }
}

fn execute_get_mid_game_score(
    slot: &GameSlot,
    request: GetMidGameScoreRequest,
) -> GetMidGameScoreResponse {
    let game_id = request.target.game_id();
    let result = with_target(slot, &request.target, |game, _| {
        Ok(game.mid_game_score().received_points)
    });
    GetMidGameScoreResponse { game_id, result }
}
