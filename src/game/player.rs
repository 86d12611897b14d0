//! Player state: identity, score and the meeple pool.

use serde::{Deserialize, Serialize};

use crate::game::board::Board;
use crate::game::score::ScoreReport;
use crate::game::types::{MeepleKind, PlacedTile, PlayerId, SerializedPlayer};
use crate::game::GameError;

pub const STARTING_MEEPLES: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    /// Indexed by meeple kind.
    meeple_counts: [u8; MeepleKind::COUNT],
    score: u32,
}

impl Player {
    pub fn new(id: PlayerId) -> Player {
        let mut meeple_counts = [0; MeepleKind::COUNT];
        meeple_counts[MeepleKind::Normal.index()] = STARTING_MEEPLES;
        Player {
            id,
            meeple_counts,
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn meeple_count(&self, kind: MeepleKind) -> u8 {
        self.meeple_counts[kind.index()]
    }

    pub fn set_meeple_count(&mut self, kind: MeepleKind, value: u8) {
        self.meeple_counts[kind.index()] = value;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn set_score(&mut self, value: u32) {
        self.score = value;
    }

    /// True if the player has the meeples the move requires.
    pub fn is_eligible_for(&self, mv: &PlacedTile) -> bool {
        mv.features
            .iter()
            .filter_map(|pf| pf.meeple)
            .all(|meeple| self.meeple_count(meeple.kind) > 0)
    }

    /// Places the move on the board on this player's behalf, spending the
    /// meeple it carries.
    pub fn place_tile(&mut self, board: &mut Board, mv: PlacedTile) -> Result<ScoreReport, GameError> {
        if !self.is_eligible_for(&mv) {
            return Err(GameError::NoMeepleAvailable);
        }
        let spent: Vec<MeepleKind> = mv
            .features
            .iter()
            .filter_map(|pf| pf.meeple.map(|m| m.kind))
            .collect();

        let report = board.place_tile(mv)?;

        for kind in spent {
            let count = self.meeple_count(kind);
            self.set_meeple_count(kind, count - 1);
        }
        Ok(report)
    }

    pub fn serialized(&self) -> SerializedPlayer {
        SerializedPlayer {
            id: self.id,
            meeple_counts: self.meeple_counts.to_vec(),
            score: self.score,
        }
    }
}
