//! The board: a sparse grid of placed tiles with placement validation,
//! legal-move enumeration and scoring on completion.

use std::collections::HashMap;

use crate::game::features::{feature_edges, FeatureGraph, FeatureId};
use crate::game::score::ScoreReport;
use crate::game::types::{Meeple, MeepleKind, PlacedTile, Position};
use crate::game::GameError;
use crate::tile::{FeatureType, Side, Tile};
use crate::tileset::TileSet;

#[derive(Debug, Clone)]
pub struct Board {
    tile_set: TileSet,
    /// Placement slots: slot 0 is the starting tile, slot `i + 1`
    /// corresponds to tile `i` of the tile set. The fixed shape is what the
    /// serialized per-slot binary encoding is built from.
    slots: Vec<Option<PlacedTile>>,
    /// Position-keyed copy of the placed tiles for O(1) neighbour lookup.
    index: HashMap<Position, PlacedTile>,
    /// Empty positions adjacent to at least one placed tile.
    placeable_positions: Vec<Position>,
    features: FeatureGraph,
}

impl Board {
    pub fn new(tile_set: TileSet) -> Board {
        let starting = PlacedTile::new(tile_set.starting_tile.clone(), Position::ORIGIN);
        let mut slots = vec![None; tile_set.tiles.len() + 1];
        let mut index = HashMap::new();
        index.insert(Position::ORIGIN, starting.clone());

        let mut features = FeatureGraph::new();
        features.add_tile(&starting, &index);
        slots[0] = Some(starting);

        Board {
            tile_set,
            slots,
            index,
            placeable_positions: Position::ORIGIN.neighbours().to_vec(),
            features,
        }
    }

    pub fn tile_set(&self) -> &TileSet {
        &self.tile_set
    }

    pub fn tile_count(&self) -> usize {
        self.index.len()
    }

    /// Placed tiles in slot order.
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    /// The raw slot vector, `None` where the matching tile set entry has
    /// not been placed.
    pub fn slots(&self) -> &[Option<PlacedTile>] {
        &self.slots
    }

    pub fn get_tile_at(&self, position: Position) -> Option<&PlacedTile> {
        self.index.get(&position)
    }

    pub fn placeable_positions(&self) -> &[Position] {
        &self.placeable_positions
    }

    pub fn features(&self) -> &FeatureGraph {
        &self.features
    }

    /// Edge compatibility with every occupied neighbour. Does not check
    /// adjacency, occupancy or meeples.
    fn position_valid(&self, tile: &PlacedTile) -> bool {
        for side in Side::PRIMARY {
            let neighbour_pos = tile.position.add(Position::from_side(side));
            if let Some(neighbour) = self.index.get(&neighbour_pos) {
                if tile.edge_feature_type(side) != neighbour.edge_feature_type(side.mirror()) {
                    return false;
                }
            }
        }
        true
    }

    /// Every legal (position, rotation) placement of `tile`, rotations in
    /// rotation order, positions in discovery order. No meeples.
    pub fn get_tile_placements_for(&self, tile: &Tile) -> Vec<PlacedTile> {
        let mut valid = Vec::new();
        for rotated in tile.rotations() {
            for &position in &self.placeable_positions {
                let placement = PlacedTile::new(rotated.clone(), position);
                if self.position_valid(&placement) {
                    valid.push(placement);
                }
            }
        }
        valid
    }

    pub fn has_valid_placement(&self, tile: &Tile) -> bool {
        tile.rotations().iter().any(|rotated| {
            self.placeable_positions.iter().any(|&position| {
                self.position_valid(&PlacedTile::new(rotated.clone(), position))
            })
        })
    }

    /// Legal moves derivable from one valid placement: the placement as is,
    /// plus one variant per claimable feature. The placement itself is
    /// assumed to carry no meeple; meeple owner ids are filled in by the
    /// game layer.
    pub fn get_legal_moves_for(&self, placement: &PlacedTile) -> Vec<PlacedTile> {
        let mut moves = vec![placement.clone()];
        for idx in 0..placement.features.len() {
            for kind in [MeepleKind::Normal] {
                if self.can_claim_feature(placement, idx) {
                    let mut with_meeple = placement.clone();
                    with_meeple.features[idx].meeple = Some(Meeple { player: 0, kind });
                    moves.push(with_meeple);
                }
            }
        }
        moves
    }

    /// A meeple may claim a feature only if no instance the feature would
    /// merge into carries a meeple of any player.
    fn can_claim_feature(&self, tile: &PlacedTile, feature_index: usize) -> bool {
        let feature = &tile.features[feature_index].feature;
        if feature.feature_type == FeatureType::Monastery {
            return true;
        }
        for edge in feature_edges(feature.feature_type, feature.sides) {
            let neighbour_pos = tile.position.add(Position::from_side(edge));
            let Some(neighbour) = self.index.get(&neighbour_pos) else {
                continue;
            };
            let Some(id) = self
                .features
                .feature_at(neighbour, edge.mirror(), feature.feature_type)
            else {
                continue;
            };
            if self.features.instance(id).has_meeples() {
                return false;
            }
        }
        true
    }

    /// Full placement check: adjacency, edge compatibility and meeple
    /// legality (at most one meeple, only on a claimable feature).
    pub fn can_be_placed(&self, tile: &PlacedTile) -> bool {
        if !self.placeable_positions.contains(&tile.position) {
            return false;
        }
        if !self.position_valid(tile) {
            return false;
        }

        let claimed: Vec<usize> = (0..tile.features.len())
            .filter(|&i| tile.features[i].meeple.is_some())
            .collect();
        if claimed.len() > 1 {
            return false;
        }
        claimed.iter().all(|&i| self.can_claim_feature(tile, i))
    }

    /// Places the tile, merges features, and scores everything the
    /// placement closed. Returns the score report for the turn.
    pub fn place_tile(&mut self, tile: PlacedTile) -> Result<ScoreReport, GameError> {
        if !self.can_be_placed(&tile) {
            return Err(GameError::InvalidPosition);
        }
        let slot = self.find_free_slot(&tile)?;
        let position = tile.position;

        self.placeable_positions.retain(|&p| p != position);
        for neighbour in position.neighbours() {
            if !self.index.contains_key(&neighbour)
                && !self.placeable_positions.contains(&neighbour)
            {
                self.placeable_positions.push(neighbour);
            }
        }

        self.index.insert(position, tile.clone());
        let roots = self.features.add_tile(&tile, &self.index);
        self.slots[slot] = Some(tile);

        let mut report = ScoreReport::new();

        // roads and cities close when their last open edge pairs up
        for id in roots {
            let instance = self.features.instance(id);
            if !matches!(
                instance.feature_type,
                FeatureType::Road | FeatureType::City
            ) || instance.scored
            {
                continue;
            }
            if self.features.is_complete(id, &self.index) {
                report.join(self.score_completed(id));
            }
        }

        // a placement can complete monasteries on any surrounding tile
        for check in std::iter::once(position).chain(position.surrounding()) {
            for id in self.features.instances_at(check) {
                let instance = self.features.instance(id);
                if instance.feature_type == FeatureType::Monastery
                    && !instance.scored
                    && self.features.is_complete(id, &self.index)
                {
                    report.join(self.score_completed(id));
                }
            }
        }

        Ok(report)
    }

    fn score_completed(&mut self, id: FeatureId) -> ScoreReport {
        let points = self.features.completion_score(id);
        let meeples = self.features.instance(id).meeples.clone();
        self.features.mark_scored(id, true);
        tracing::debug!(feature = ?self.features.instance(id).feature_type, points, "feature completed");
        ScoreReport::on_meeples(points, &meeples)
    }

    /// Scores every unscored instance that carries meeples, at unfinished
    /// rates: the game-end pass, also used for mid-game projections.
    /// Read-only; meeple bookkeeping is applied by the caller.
    pub fn unfinished_score_report(&self) -> ScoreReport {
        let mut report = ScoreReport::new();
        let roots: Vec<FeatureId> = self.features.roots().collect();
        for id in roots {
            let instance = self.features.instance(id);
            if instance.scored || !instance.has_meeples() {
                continue;
            }
            let points = self.features.partial_score(id, &self.index);
            report.join(ScoreReport::on_meeples(points, &instance.meeples));
        }
        report
    }

    /// The slot for a newly placed tile: the first unoccupied slot whose
    /// tile set entry matches structurally.
    fn find_free_slot(&self, tile: &PlacedTile) -> Result<usize, GameError> {
        let as_tile = tile.to_tile();
        for (i, set_tile) in self.tile_set.tiles.iter().enumerate() {
            if self.slots[i + 1].is_none() && set_tile.equals(&as_tile) {
                return Ok(i + 1);
            }
        }
        Err(GameError::TileNotInDeck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::templates;
    use crate::tileset::standard_tile_set;

    fn custom_placed(tile: Tile, x: i16, y: i16) -> PlacedTile {
        PlacedTile::new(tile, Position::new(x, y))
    }

    fn claim(tile: &mut PlacedTile, side: Side, feature_type: FeatureType, player: u8) {
        tile.feature_at_mut(side, feature_type)
            .unwrap_or_else(|| panic!("no {feature_type:?} feature at {side:?}"))
            .meeple = Some(Meeple::normal(player));
    }

    #[test]
    fn starting_tile_opens_four_positions() {
        let board = Board::new(standard_tile_set());
        assert_eq!(board.tile_count(), 1);
        let open = board.placeable_positions();
        assert_eq!(open.len(), 4);
        for pos in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
            assert!(open.contains(&Position::new(pos.0, pos.1)));
        }
    }

    #[test]
    fn cannot_place_on_occupied_or_isolated_positions() {
        let board = Board::new(standard_tile_set());
        let occupied = custom_placed(templates::single_city_edge_no_roads(), 0, 0);
        assert!(!board.can_be_placed(&occupied));
        let isolated = custom_placed(templates::single_city_edge_no_roads(), 5, 5);
        assert!(!board.can_be_placed(&isolated));
    }

    #[test]
    fn edge_types_must_match_the_neighbour() {
        let board = Board::new(standard_tile_set());
        // starting tile has a city on top: a field edge may not face it
        let mismatched = custom_placed(templates::single_city_edge_no_roads(), 0, 1);
        assert!(!board.can_be_placed(&mismatched));
        // rotated so its city faces down, it fits
        let matched = custom_placed(templates::single_city_edge_no_roads().rotate(2), 0, 1);
        assert!(board.can_be_placed(&matched));
    }

    #[test]
    fn monastery_without_roads_has_one_position_and_three_moves() {
        let board = Board::new(standard_tile_set());
        let placements = board.get_tile_placements_for(&templates::monastery_without_roads());
        // fully symmetric tile, only the field edge below the start fits
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].position, Position::new(0, -1));

        let moves = board.get_legal_moves_for(&placements[0]);
        assert_eq!(moves.len(), 3);
        assert!(moves[0].meeple_count() == 0);
        assert!(moves[1].features[0].meeple.is_some()); // field
        assert!(moves[2].features[1].meeple.is_some()); // monastery
    }

    #[test]
    fn claimed_roads_reject_further_meeples() {
        let mut board = Board::new(standard_tile_set());
        let mut first = custom_placed(templates::straight_roads(), 1, 0);
        claim(&mut first, Side::RIGHT, FeatureType::Road, 1);
        board.place_tile(first).unwrap();

        // the road now runs through (0,0) and (1,0) with player 1's meeple
        let mut second = custom_placed(templates::straight_roads(), -1, 0);
        claim(&mut second, Side::RIGHT, FeatureType::Road, 2);
        assert!(!board.can_be_placed(&second));
        assert!(matches!(
            board.place_tile(second),
            Err(GameError::InvalidPosition)
        ));

        // without the meeple the same placement is fine
        let bare = custom_placed(templates::straight_roads(), -1, 0);
        assert!(board.can_be_placed(&bare));
    }

    /*
    Road loop closed through the starting tile, two players tied:

        2 - 0 - 5
        |       |
        3 - 1 - 4

    (0 is the starting tile; digits are placement order.)
    */
    #[test]
    fn road_loop_scores_both_tied_players_in_full() {
        let mut board = Board::new(standard_tile_set());

        let mut tiles = vec![
            custom_placed(templates::straight_roads(), 0, -1),
            custom_placed(templates::roads_turn().rotate(3), -1, 0),
            custom_placed(templates::roads_turn().rotate(2), -1, -1),
            custom_placed(templates::roads_turn().rotate(1), 1, -1),
            custom_placed(templates::roads_turn(), 1, 0),
        ];
        claim(&mut tiles[0], Side::RIGHT, FeatureType::Road, 1);
        claim(&mut tiles[1], Side::RIGHT, FeatureType::Road, 2);

        let mut reports = Vec::new();
        for tile in tiles {
            reports.push(board.place_tile(tile).unwrap());
        }

        for report in &reports[..4] {
            assert!(report.received_points.is_empty());
        }
        let closing = &reports[4];
        assert_eq!(closing.received_points.get(&1), Some(&6));
        assert_eq!(closing.received_points.get(&2), Some(&6));
        assert_eq!(closing.returned_meeples[&1].len(), 1);
        assert_eq!(closing.returned_meeples[&2].len(), 1);
    }

    /*
    Loop closed by a T-junction; the junction tile joins two of its own
    road stubs into the same loop but counts once:

      - 0 -
        1 - 2
        |   |
      - 4 - 3
    */
    #[test]
    fn crossroad_loop_counts_the_junction_tile_once() {
        let mut board = Board::new(standard_tile_set());

        let mut tiles = vec![
            custom_placed(templates::roads_turn().rotate(3), 0, -1),
            custom_placed(templates::roads_turn(), 1, -1),
            custom_placed(templates::roads_turn().rotate(1), 1, -2),
            custom_placed(templates::t_cross_road().rotate(2), 0, -2),
        ];
        claim(&mut tiles[0], Side::RIGHT, FeatureType::Road, 1);

        let mut reports = Vec::new();
        for tile in tiles {
            reports.push(board.place_tile(tile).unwrap());
        }

        for report in &reports[..3] {
            assert!(report.received_points.is_empty());
        }
        assert_eq!(reports[3].received_points.get(&1), Some(&4));
    }

    /*
    Road ending in monasteries on both sides of the starting tile:

        1 - 0 - 2
    */
    #[test]
    fn road_between_two_monasteries_scores_three() {
        let mut board = Board::new(standard_tile_set());

        let mut first = custom_placed(templates::monastery_with_single_road().rotate(3), -1, 0);
        claim(&mut first, Side::RIGHT, FeatureType::Road, 1);
        let second = custom_placed(templates::monastery_with_single_road().rotate(1), 1, 0);

        let report = board.place_tile(first).unwrap();
        assert!(report.received_points.is_empty());
        let report = board.place_tile(second).unwrap();
        assert_eq!(report.received_points.get(&1), Some(&3));
    }

    /*
    Five-tile road carrying two meeples of the same player, closed last:

        4 - 0 - 1
        |
        3 - 2
    */
    #[test]
    fn five_tile_road_with_two_own_meeples_scores_once() {
        let mut board = Board::new(standard_tile_set());

        let mut tiles = vec![
            custom_placed(templates::monastery_with_single_road().rotate(1), 1, 0),
            custom_placed(templates::monastery_with_single_road().rotate(1), 0, -1),
            custom_placed(templates::roads_turn().rotate(2), -1, -1),
            custom_placed(templates::roads_turn().rotate(3), -1, 0),
        ];
        claim(&mut tiles[0], Side::LEFT, FeatureType::Road, 1);
        claim(&mut tiles[1], Side::LEFT, FeatureType::Road, 1);

        let mut reports = Vec::new();
        for tile in tiles {
            reports.push(board.place_tile(tile).unwrap());
        }

        for report in &reports[..3] {
            assert!(report.received_points.is_empty());
        }
        let closing = &reports[3];
        assert_eq!(closing.received_points.get(&1), Some(&5));
        assert_eq!(closing.returned_meeples[&1].len(), 2);
    }

    #[test]
    fn shielded_city_scores_two_per_tile_plus_two_per_shield() {
        let mut board = Board::new(standard_tile_set());

        let mut middle = custom_placed(
            templates::two_city_edges_up_and_down_connected_shield(),
            0,
            1,
        );
        claim(&mut middle, Side::TOP, FeatureType::City, 1);
        let report = board.place_tile(middle).unwrap();
        assert!(report.received_points.is_empty());

        let cap = custom_placed(templates::single_city_edge_no_roads().rotate(2), 0, 2);
        let report = board.place_tile(cap).unwrap();
        assert_eq!(report.received_points.get(&1), Some(&8)); // 2*3 tiles + 2*1 shield
        assert_eq!(report.returned_meeples[&1].len(), 1);
    }

    #[test]
    fn surrounded_monastery_scores_nine() {
        let mut board = Board::new(standard_tile_set());

        let mut monastery = custom_placed(templates::monastery_without_roads(), 0, -1);
        monastery.features[1].meeple = Some(Meeple::normal(2));
        board.place_tile(monastery).unwrap();

        let ring = [
            custom_placed(templates::straight_roads(), -1, 0),
            custom_placed(templates::straight_roads(), 1, 0),
            custom_placed(templates::monastery_without_roads(), -1, -1),
            custom_placed(templates::monastery_without_roads(), 1, -1),
            custom_placed(templates::monastery_without_roads(), -1, -2),
            custom_placed(templates::monastery_without_roads(), 0, -2),
            custom_placed(templates::monastery_without_roads(), 1, -2),
        ];
        let mut reports = Vec::new();
        for tile in ring {
            reports.push(board.place_tile(tile).unwrap());
        }

        for report in &reports[..6] {
            assert!(report.received_points.is_empty());
        }
        let closing = reports.last().unwrap();
        assert_eq!(closing.received_points.get(&2), Some(&9));
        assert_eq!(closing.returned_meeples[&2].len(), 1);
    }

    #[test]
    fn farm_scores_three_per_adjacent_completed_city() {
        let mut board = Board::new(standard_tile_set());

        board
            .place_tile(custom_placed(
                templates::single_city_edge_no_roads().rotate(2),
                0,
                1,
            ))
            .unwrap();
        let mut farmer = custom_placed(templates::single_city_edge_straight_roads(), 1, 0);
        claim(&mut farmer, Side::LEFT_TOP_EDGE, FeatureType::Field, 1);
        board.place_tile(farmer).unwrap();
        board
            .place_tile(custom_placed(
                templates::single_city_edge_no_roads().rotate(2),
                1,
                1,
            ))
            .unwrap();

        let report = board.unfinished_score_report();
        assert_eq!(report.received_points.get(&1), Some(&6)); // 3 x 2 closed cities
    }

    #[test]
    fn farm_without_meeples_scores_nothing() {
        let mut board = Board::new(standard_tile_set());
        board
            .place_tile(custom_placed(
                templates::single_city_edge_no_roads().rotate(2),
                0,
                1,
            ))
            .unwrap();
        assert!(board.unfinished_score_report().is_empty());
    }

    #[test]
    fn unfinished_city_scores_one_per_tile_plus_one_per_shield() {
        let mut board = Board::new(standard_tile_set());
        let mut open_city = custom_placed(
            templates::two_city_edges_up_and_down_connected_shield(),
            0,
            1,
        );
        claim(&mut open_city, Side::TOP, FeatureType::City, 1);
        board.place_tile(open_city).unwrap();

        let report = board.unfinished_score_report();
        assert_eq!(report.received_points.get(&1), Some(&3)); // 2 tiles + 1 shield
    }
}
