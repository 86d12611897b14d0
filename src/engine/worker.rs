//! The worker side of the dispatch engine: long-lived threads pulling
//! individual work items off one shared queue.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::engine::error::EngineError;
use crate::engine::requests::{Request, Response};
use crate::engine::store::{GameId, GameSlot, GameStore};
use crate::logger::GameLog;

#[derive(Debug)]
pub(crate) enum Task {
    Request(Request),
    /// Clone the slot's game into the reserved ids. With a log directory,
    /// each clone gets the source's log history in its own file; without
    /// one the clones log to a discard sink (the sub-clone path).
    Clone {
        reserved: Vec<GameId>,
        log_dir: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub(crate) enum TaskOutcome {
    Response(Response),
    Clone(Result<(), EngineError>),
}

pub(crate) struct WorkerInput {
    pub index: usize,
    pub slot: Arc<GameSlot>,
    pub task: Task,
    pub reply: Sender<WorkerOutput>,
}

pub(crate) struct WorkerOutput {
    pub index: usize,
    pub outcome: TaskOutcome,
}

/// Runs until the input channel is closed and drained.
pub(crate) fn worker_loop(receiver: Receiver<WorkerInput>, store: Arc<GameStore>) {
    for input in receiver {
        let outcome = match input.task {
            Task::Request(request) => TaskOutcome::Response(request.execute(&input.slot)),
            Task::Clone { reserved, log_dir } => {
                TaskOutcome::Clone(execute_clone(&input.slot, &store, reserved, log_dir))
            }
        };
        if input
            .reply
            .send(WorkerOutput {
                index: input.index,
                outcome,
            })
            .is_err()
        {
            tracing::warn!("batch reply channel dropped before completion");
        }
    }
}

/// Clones under a shared read lock; the store only sees the new games once
/// every copy succeeded.
fn execute_clone(
    slot: &GameSlot,
    store: &GameStore,
    reserved: Vec<GameId>,
    log_dir: Option<PathBuf>,
) -> Result<(), EngineError> {
    let game = slot.game.read().expect("game lock poisoned");

    let mut clones = Vec::with_capacity(reserved.len());
    for &id in &reserved {
        let clone = match &log_dir {
            Some(dir) => {
                let log = GameLog::to_file(dir.join(format!("{id}.jsonl")))?;
                game.deep_clone_with_log(log)?
            }
            None => game.deep_clone(),
        };
        clones.push((id, clone));
    }
    for (id, clone) in clones {
        store.insert_with_id(id, clone);
    }
    Ok(())
}
