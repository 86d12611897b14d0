//! The game store: opaque integer handles mapped to owned games behind a
//! single coarse lock, plus per-game read/write locks and the parent/child
//! bookkeeping used by sub-clones.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use crate::game::Game;

pub type GameId = u64;

/// One stored game. Writers (play-turn) take the lock exclusively, readers
/// (queries, clones) share it, so requests targeting the same game
/// serialize while different games run fully in parallel.
#[derive(Debug)]
pub struct GameSlot {
    pub game: RwLock<Game>,
}

#[derive(Debug, Default)]
struct StoreInner {
    games: HashMap<GameId, Arc<GameSlot>>,
    next_game_id: GameId,
    /// Sub-clone children per parent, cleared when the parent plays a turn.
    child_games: HashMap<GameId, HashSet<GameId>>,
    parent_games: HashMap<GameId, GameId>,
}

#[derive(Debug)]
pub struct GameStore {
    inner: Mutex<StoreInner>,
}

impl GameStore {
    pub fn new() -> GameStore {
        GameStore {
            inner: Mutex::new(StoreInner {
                next_game_id: 1,
                ..StoreInner::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("game store lock poisoned")
    }

    /// Hands out `count` fresh ids. Reserved ids stay unused if the
    /// operation that reserved them fails.
    pub fn reserve_ids(&self, count: usize) -> Vec<GameId> {
        let mut inner = self.lock();
        let first = inner.next_game_id;
        inner.next_game_id += count as GameId;
        (first..first + count as GameId).collect()
    }

    pub fn insert_with_id(&self, id: GameId, game: Game) {
        let slot = Arc::new(GameSlot {
            game: RwLock::new(game),
        });
        self.lock().games.insert(id, slot);
    }

    pub fn get(&self, id: GameId) -> Option<Arc<GameSlot>> {
        self.lock().games.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes games and any child/parent bookkeeping attached to them.
    pub fn remove(&self, ids: &[GameId]) {
        let mut inner = self.lock();
        for &id in ids {
            inner.games.remove(&id);
            inner.child_games.remove(&id);
            if let Some(parent) = inner.parent_games.remove(&id) {
                if let Some(children) = inner.child_games.get_mut(&parent) {
                    children.remove(&id);
                }
            }
        }
    }

    /// Records `children` as sub-clones of `parent`.
    pub fn track_children(&self, parent: GameId, children: &[GameId]) {
        let mut inner = self.lock();
        inner
            .child_games
            .entry(parent)
            .or_default()
            .extend(children.iter().copied());
        for &child in children {
            inner.parent_games.insert(child, parent);
        }
    }

    /// Drops the child bookkeeping of `parent` (the games stay), returning
    /// how many children were still tracked.
    pub fn clear_children(&self, parent: GameId) -> usize {
        let mut inner = self.lock();
        let Some(children) = inner.child_games.remove(&parent) else {
            return 0;
        };
        for child in &children {
            inner.parent_games.remove(child);
        }
        children.len()
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}
