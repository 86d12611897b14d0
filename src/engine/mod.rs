//! The dispatch engine: a fixed worker pool over all live games, driven by
//! batched request/response calls with per-request failure isolation.
//!
//! Requests for different games execute in parallel; requests for the same
//! game serialize on its lock. A batch call blocks until every one of its
//! items reaches a terminal state and returns the responses in submission
//! order. `close()` is one-way: in-flight work drains, then every further
//! call fails with [`EngineError::EngineClosed`].

pub mod error;
pub mod requests;
pub mod store;
mod worker;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Sender};

use crate::deck::{Deck, TileStack};
use crate::game::{Game, SerializedGame, DEFAULT_PLAYER_COUNT};
use crate::logger::GameLog;
use crate::tileset::TileSet;

pub use error::EngineError;
pub use requests::{
    GetLegalMovesRequest, GetLegalMovesResponse, GetMidGameScoreRequest, GetMidGameScoreResponse,
    GetRemainingTilesRequest, GetRemainingTilesResponse, MoveWithState, PlayTurnOutcome,
    PlayTurnRequest, PlayTurnResponse, Request, Response, SnapshotState, Target, TileProbability,
};
pub use store::{GameId, GameStore};

use worker::{Task, TaskOutcome, WorkerInput, WorkerOutput};

#[derive(Debug)]
pub struct SerializedGameWithId {
    pub id: GameId,
    pub game: SerializedGame,
}

pub struct GameEngine {
    store: Arc<GameStore>,
    sender: Mutex<Option<Sender<WorkerInput>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
    log_dir: Option<PathBuf>,
}

impl GameEngine {
    /// Starts the engine with `worker_count` worker threads. When
    /// `log_dir` is given the directory is created and every game writes a
    /// `<id>.jsonl` event log into it; directory creation is the only
    /// fatal, synchronous error path.
    pub fn start(worker_count: usize, log_dir: Option<PathBuf>) -> Result<GameEngine, EngineError> {
        if let Some(dir) = &log_dir {
            std::fs::create_dir_all(dir)?;
        }

        let store = Arc::new(GameStore::new());
        let (sender, receiver) = unbounded::<WorkerInput>();

        let mut handles = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let receiver = receiver.clone();
            let store = Arc::clone(&store);
            let handle = std::thread::Builder::new()
                .name(format!("game-worker-{i}"))
                .spawn(move || worker::worker_loop(receiver, store))?;
            handles.push(handle);
        }
        tracing::info!(worker_count, log_dir = ?log_dir, "game engine started");

        Ok(GameEngine {
            store,
            sender: Mutex::new(Some(sender)),
            handles: Mutex::new(handles),
            closed: AtomicBool::new(false),
            log_dir,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// One-way shutdown: stops accepting work, lets in-flight requests
    /// drain and joins the workers. Safe to call more than once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.sender
            .lock()
            .expect("engine sender lock poisoned")
            .take();
        let handles = std::mem::take(
            &mut *self.handles.lock().expect("engine handle lock poisoned"),
        );
        for handle in handles {
            let _ = handle.join();
        }
        tracing::info!("game engine closed");
    }

    // --- Game creation ---

    /// New game over a randomly shuffled deck.
    pub fn generate_game(&self, tile_set: TileSet) -> Result<SerializedGameWithId, EngineError> {
        let stack = TileStack::new(tile_set.tiles.clone());
        self.generate_from_deck(Deck::new(stack, tile_set.starting_tile))
    }

    /// New game shuffled with an explicit seed.
    pub fn generate_seeded_game(
        &self,
        tile_set: TileSet,
        seed: u64,
    ) -> Result<SerializedGameWithId, EngineError> {
        let stack = TileStack::new_seeded(tile_set.tiles.clone(), seed);
        self.generate_from_deck(Deck::new(stack, tile_set.starting_tile))
    }

    /// New game drawing tiles in the tile set's declared order. The
    /// serialized state reveals the deck, so this variant is meant for
    /// deterministic testing, not for play against an agent.
    pub fn generate_ordered_game(
        &self,
        tile_set: TileSet,
    ) -> Result<SerializedGameWithId, EngineError> {
        let stack = TileStack::new_ordered(tile_set.tiles.clone());
        self.generate_from_deck(Deck::new(stack, tile_set.starting_tile))
    }

    fn generate_from_deck(&self, deck: Deck) -> Result<SerializedGameWithId, EngineError> {
        if self.is_closed() {
            return Err(EngineError::EngineClosed);
        }
        let id = self.store.reserve_ids(1)[0];
        let log = match &self.log_dir {
            Some(dir) => GameLog::to_file(dir.join(format!("{id}.jsonl")))?,
            None => GameLog::discard(),
        };
        let game = Game::new_from_deck(deck, log, DEFAULT_PLAYER_COUNT)?;
        let serialized = game.serialized();
        self.store.insert_with_id(id, game);
        tracing::debug!(game_id = id, "game created");
        Ok(SerializedGameWithId {
            id,
            game: serialized,
        })
    }

    // --- Batch API ---

    /// Submits a heterogeneous batch and blocks until every item is done.
    /// Responses come back in submission order; one item failing never
    /// affects its siblings.
    pub fn send_batch(&self, requests: Vec<Request>) -> Vec<Response> {
        if self.is_closed() {
            return requests
                .into_iter()
                .map(|r| r.fail(EngineError::EngineClosed))
                .collect();
        }

        let total = requests.len();
        let mut responses: Vec<Option<Response>> = Vec::with_capacity(total);
        responses.resize_with(total, || None);

        let (reply_tx, reply_rx) = bounded::<WorkerOutput>(total.max(1));
        let mut in_flight = 0usize;

        {
            let sender = self.sender.lock().expect("engine sender lock poisoned");
            for (index, request) in requests.into_iter().enumerate() {
                let game_id = request.game_id();
                let Some(slot) = self.store.get(game_id) else {
                    responses[index] = Some(request.fail(EngineError::GameNotFound(game_id)));
                    continue;
                };
                let Some(tx) = sender.as_ref() else {
                    responses[index] = Some(request.fail(EngineError::EngineClosed));
                    continue;
                };
                let input = WorkerInput {
                    index,
                    slot,
                    task: Task::Request(request),
                    reply: reply_tx.clone(),
                };
                match tx.send(input) {
                    Ok(()) => in_flight += 1,
                    Err(crossbeam_channel::SendError(input)) => {
                        let Task::Request(request) = input.task else {
                            unreachable!("batch items are always requests");
                        };
                        responses[input.index] =
                            Some(request.fail(EngineError::EngineClosed));
                    }
                }
            }
        }
        drop(reply_tx);

        for _ in 0..in_flight {
            let output = reply_rx
                .recv()
                .expect("worker reply channel closed with items in flight");
            let TaskOutcome::Response(response) = output.outcome else {
                unreachable!("batch items are always requests");
            };
            responses[output.index] = Some(response);
        }

        let responses: Vec<Response> = responses
            .into_iter()
            .map(|r| r.expect("every batch item produces a response"))
            .collect();

        // a successful turn on a sub-clone parent invalidates its children
        for response in &responses {
            if let Response::PlayTurn(r) = response {
                if r.result.is_ok() {
                    let cleared = self.store.clear_children(r.game_id);
                    if cleared > 0 {
                        tracing::warn!(
                            game_id = r.game_id,
                            children = cleared,
                            "turn played on a game with live sub-clones; child tracking dropped"
                        );
                    }
                }
            }
        }
        responses
    }

    pub fn send_play_turn_batch(&self, requests: Vec<PlayTurnRequest>) -> Vec<PlayTurnResponse> {
        self.send_batch(requests.into_iter().map(Request::PlayTurn).collect())
            .into_iter()
            .map(|response| match response {
                Response::PlayTurn(r) => r,
                _ => unreachable!("send_batch preserves request kinds"),
            })
            .collect()
    }

    pub fn send_get_legal_moves_batch(
        &self,
        requests: Vec<GetLegalMovesRequest>,
    ) -> Vec<GetLegalMovesResponse> {
        self.send_batch(requests.into_iter().map(Request::GetLegalMoves).collect())
            .into_iter()
            .map(|response| match response {
                Response::GetLegalMoves(r) => r,
                _ => unreachable!("send_batch preserves request kinds"),
            })
            .collect()
    }

    pub fn send_get_remaining_tiles_batch(
        &self,
        requests: Vec<GetRemainingTilesRequest>,
    ) -> Vec<GetRemainingTilesResponse> {
        self.send_batch(
            requests
                .into_iter()
                .map(Request::GetRemainingTiles)
                .collect(),
        )
        .into_iter()
        .map(|response| match response {
            Response::GetRemainingTiles(r) => r,
            _ => unreachable!("send_batch preserves request kinds"),
        })
        .collect()
    }

    pub fn send_get_mid_game_score_batch(
        &self,
        requests: Vec<GetMidGameScoreRequest>,
    ) -> Vec<GetMidGameScoreResponse> {
        self.send_batch(
            requests
                .into_iter()
                .map(Request::GetMidGameScore)
                .collect(),
        )
        .into_iter()
        .map(|response| match response {
            Response::GetMidGameScore(r) => r,
            _ => unreachable!("send_batch preserves request kinds"),
        })
        .collect()
    }

    // --- Cloning and deletion ---

    /// Fully clones a game `count` times, log history included, returning
    /// the new ids. Meant for fanning a scenario out to several agents.
    pub fn clone_game(&self, game_id: GameId, count: usize) -> Result<Vec<GameId>, EngineError> {
        self.clone_game_internal(game_id, count, true)
    }

    /// Like [`GameEngine::clone_game`] but skips per-clone log duplication
    /// and tracks the clones as children of the source game: the cheap
    /// variant for expanding a what-if tree. Children should be deleted
    /// before the parent plays its next turn; a turn on the parent drops
    /// the tracking with a warning.
    pub fn sub_clone_game(
        &self,
        game_id: GameId,
        count: usize,
    ) -> Result<Vec<GameId>, EngineError> {
        let ids = self.clone_game_internal(game_id, count, false)?;
        self.store.track_children(game_id, &ids);
        Ok(ids)
    }

    fn clone_game_internal(
        &self,
        game_id: GameId,
        count: usize,
        full: bool,
    ) -> Result<Vec<GameId>, EngineError> {
        if self.is_closed() {
            return Err(EngineError::EngineClosed);
        }
        let slot = self
            .store
            .get(game_id)
            .ok_or(EngineError::GameNotFound(game_id))?;
        let reserved = self.store.reserve_ids(count);

        let (reply_tx, reply_rx) = bounded(1);
        let input = WorkerInput {
            index: 0,
            slot,
            task: Task::Clone {
                reserved: reserved.clone(),
                log_dir: if full { self.log_dir.clone() } else { None },
            },
            reply: reply_tx,
        };
        {
            let sender = self.sender.lock().expect("engine sender lock poisoned");
            let Some(tx) = sender.as_ref() else {
                return Err(EngineError::EngineClosed);
            };
            tx.send(input).map_err(|_| EngineError::EngineClosed)?;
        }

        let output = reply_rx.recv().map_err(|_| EngineError::EngineClosed)?;
        match output.outcome {
            TaskOutcome::Clone(Ok(())) => Ok(reserved),
            TaskOutcome::Clone(Err(err)) => Err(err),
            TaskOutcome::Response(_) => unreachable!("clone tasks produce clone outcomes"),
        }
    }

    /// Best-effort removal; unknown ids are ignored. Deleted games fail
    /// all later requests with a not-found error.
    pub fn delete_games(&self, game_ids: &[GameId]) {
        if self.is_closed() {
            return;
        }
        self.store.remove(game_ids);
        tracing::debug!(count = game_ids.len(), "games deleted");
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        self.close();
    }
}
