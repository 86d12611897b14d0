//! Score reports: points received per player plus the meeples a scoring
//! event sends back to their owners.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::types::{MeepleWithPosition, PlayerId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub received_points: HashMap<PlayerId, u32>,
    pub returned_meeples: HashMap<PlayerId, Vec<MeepleWithPosition>>,
}

impl ScoreReport {
    pub fn new() -> ScoreReport {
        ScoreReport::default()
    }

    pub fn is_empty(&self) -> bool {
        self.received_points.is_empty() && self.returned_meeples.is_empty()
    }

    /// Adds the contents of `other` to this report.
    pub fn join(&mut self, other: ScoreReport) {
        for (player, points) in other.received_points {
            *self.received_points.entry(player).or_insert(0) += points;
        }
        for (player, meeples) in other.returned_meeples {
            self.returned_meeples
                .entry(player)
                .or_default()
                .extend(meeples);
        }
    }

    /// Builds the report for one scored feature instance: every meeple on
    /// it goes home, and each player holding the (strictly joint-)highest
    /// meeple count receives the full score. Ties are not split.
    ///
    /// No meeples means nobody scores.
    pub fn on_meeples(points: u32, meeples: &[MeepleWithPosition]) -> ScoreReport {
        let mut report = ScoreReport::new();
        if meeples.is_empty() {
            return report;
        }

        let mut per_player: HashMap<PlayerId, u32> = HashMap::new();
        for m in meeples {
            *per_player.entry(m.meeple.player).or_insert(0) += 1;
        }
        let most = per_player.values().copied().max().unwrap_or(0);

        for (&player, &count) in &per_player {
            if count == most {
                report.received_points.insert(player, points);
            }
        }
        for m in meeples {
            report
                .returned_meeples
                .entry(m.meeple.player)
                .or_default()
                .push(*m);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Meeple, Position};
    use crate::tile::{FeatureType, Side};

    fn meeple_at(player: PlayerId, x: i16, y: i16) -> MeepleWithPosition {
        MeepleWithPosition {
            meeple: Meeple::normal(player),
            position: Position::new(x, y),
            sides: Side::LEFT | Side::RIGHT,
            feature_type: FeatureType::Road,
        }
    }

    #[test]
    fn no_meeples_no_points() {
        let report = ScoreReport::on_meeples(10, &[]);
        assert!(report.is_empty());
    }

    #[test]
    fn sole_owner_takes_the_score() {
        let report = ScoreReport::on_meeples(5, &[meeple_at(1, 0, 0)]);
        assert_eq!(report.received_points.get(&1), Some(&5));
        assert_eq!(report.returned_meeples[&1].len(), 1);
    }

    #[test]
    fn majority_owner_wins_and_everyone_gets_meeples_back() {
        let meeples = [meeple_at(1, 0, 0), meeple_at(1, 1, 0), meeple_at(2, 2, 0)];
        let report = ScoreReport::on_meeples(7, &meeples);
        assert_eq!(report.received_points.get(&1), Some(&7));
        assert_eq!(report.received_points.get(&2), None);
        assert_eq!(report.returned_meeples[&1].len(), 2);
        assert_eq!(report.returned_meeples[&2].len(), 1);
    }

    #[test]
    fn ties_award_full_points_to_every_tied_player() {
        let meeples = [meeple_at(1, 0, 0), meeple_at(2, 1, 0)];
        let report = ScoreReport::on_meeples(6, &meeples);
        assert_eq!(report.received_points.get(&1), Some(&6));
        assert_eq!(report.received_points.get(&2), Some(&6));
    }

    #[test]
    fn join_accumulates_points() {
        let mut report = ScoreReport::on_meeples(3, &[meeple_at(1, 0, 0)]);
        report.join(ScoreReport::on_meeples(4, &[meeple_at(1, 1, 1)]));
        assert_eq!(report.received_points.get(&1), Some(&7));
        assert_eq!(report.returned_meeples[&1].len(), 2);
    }
}
