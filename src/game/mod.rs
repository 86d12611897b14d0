//! One game: board, deck, players and turn application.

pub mod board;
pub mod features;
pub mod player;
pub mod score;
pub mod types;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::Deck;
use crate::logger::{EventKind, GameLog, PlaceTileContent, ScoreContent, StartContent};
use crate::tile::{BinaryTile, Tile};
use crate::tileset::TileSet;

pub use board::Board;
pub use player::Player;
pub use score::ScoreReport;
pub use types::{
    Meeple, MeepleKind, MeepleWithPosition, PlacedFeature, PlacedTile, PlayerId, Position,
    SerializedPlayer,
};

pub const DEFAULT_PLAYER_COUNT: usize = 2;

/// Rule-level failures. Everything except [`GameError::DeckExhausted`] and
/// the bookkeeping variants amounts to an invalid move.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no tiles left in the deck")]
    DeckExhausted,
    #[error("move does not match the current tile")]
    WrongTile,
    #[error("tile placement violates adjacency or meeple rules")]
    InvalidPosition,
    #[error("player has no meeple of the required kind")]
    NoMeepleAvailable,
    #[error("meeple on the move belongs to another player")]
    WrongMeepleOwner,
    #[error("tile not found in the deck")]
    TileNotInDeck,
    #[error("swapping tiles is only allowed in clones created with deep_clone_with_swappable_tiles")]
    CannotSwapTiles,
    #[error("the game is not finished")]
    GameNotFinished,
    #[error("unsupported player count")]
    InvalidPlayerCount,
    #[error("failed to write the game log")]
    Log(#[from] std::io::Error),
}

/// Full game state as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedGame {
    /// `None` once the deck is exhausted (or in swappable-tile clones,
    /// which must not leak the draw order).
    pub current_tile: Option<Tile>,
    pub valid_placements: Vec<PlacedTile>,
    pub current_player_id: PlayerId,
    pub players: Vec<SerializedPlayer>,
    /// Placed tiles, in board slot order.
    pub tiles: Vec<PlacedTile>,
    pub tile_set: TileSet,
    /// One packed word per board slot; an unfilled slot encodes as 0.
    pub binary_tiles: Vec<BinaryTile>,
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    deck: Deck,
    players: Vec<Player>,
    /// Index into `players`, not a player id.
    current_player: usize,
    log: GameLog,
    can_swap_tiles: bool,
}

impl Game {
    pub fn new_from_tile_set(
        tile_set: TileSet,
        log: GameLog,
        player_count: usize,
    ) -> Result<Game, GameError> {
        let stack = crate::deck::TileStack::new(tile_set.tiles.clone());
        let deck = Deck::new(stack, tile_set.starting_tile);
        Self::new_from_deck(deck, log, player_count)
    }

    pub fn new_from_deck(
        deck: Deck,
        mut log: GameLog,
        player_count: usize,
    ) -> Result<Game, GameError> {
        if !(2..=crate::tile::binary::MAX_PLAYERS as usize).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount);
        }

        log.log_event(
            EventKind::Start,
            &StartContent {
                starting_tile: &deck.starting_tile,
                deck: &deck.remaining(),
                player_count,
            },
        )?;

        let mut game = Game {
            board: Board::new(deck.tile_set()),
            deck,
            players: (1..=player_count as PlayerId).map(Player::new).collect(),
            current_player: 0,
            log,
            can_swap_tiles: false,
        };

        // Every base-game tile can be placed on the very first move, but
        // tiles from expansions may not be.
        game.ensure_current_tile_has_valid_placement()?;
        Ok(game)
    }

    /// Independent deep copy. The clone logs to a discard sink.
    pub fn deep_clone(&self) -> Game {
        Game {
            board: self.board.clone(),
            deck: self.deck.clone(),
            players: self.players.clone(),
            current_player: self.current_player,
            log: GameLog::discard(),
            can_swap_tiles: self.can_swap_tiles,
        }
    }

    /// Deep copy allowed to reorder its deck, for what-if simulation.
    pub fn deep_clone_with_swappable_tiles(&self) -> Game {
        let mut clone = self.deep_clone();
        clone.can_swap_tiles = true;
        clone
    }

    /// Deep copy carrying the full log history into `log`.
    pub fn deep_clone_with_log(&self, mut log: GameLog) -> Result<Game, GameError> {
        self.log.copy_to(&mut log)?;
        let mut clone = self.deep_clone();
        clone.log = log;
        Ok(clone)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn can_swap_tiles(&self) -> bool {
        self.can_swap_tiles
    }

    pub fn current_tile(&self) -> Result<Tile, GameError> {
        self.deck.peek().cloned()
    }

    pub fn remaining_tiles(&self) -> Vec<Tile> {
        self.deck.remaining()
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn get_tile_placements_for(&self, tile: &Tile) -> Vec<PlacedTile> {
        self.board.get_tile_placements_for(tile)
    }

    /// Legal moves from a valid placement, restricted to what the current
    /// player can afford and stamped with their id.
    pub fn get_legal_moves_for(&self, placement: &PlacedTile) -> Vec<PlacedTile> {
        let player = &self.players[self.current_player];
        let mut moves = Vec::new();
        'moves: for mut mv in self.board.get_legal_moves_for(placement) {
            for pf in &mut mv.features {
                if let Some(meeple) = &mut pf.meeple {
                    if player.meeple_count(meeple.kind) == 0 {
                        continue 'moves;
                    }
                    meeple.player = player.id();
                }
            }
            moves.push(mv);
        }
        moves
    }

    /// Only allowed on swappable clones: move the given tile to the top of
    /// the draw order, so a simulated move can be replayed.
    pub fn swap_current_tile(&mut self, tile: &Tile) -> Result<(), GameError> {
        if !self.can_swap_tiles {
            return Err(GameError::CannotSwapTiles);
        }
        self.deck.move_to_top(tile)
    }

    /// Applies one turn: places the move for the current player, scores
    /// whatever closed, returns completed-feature meeples, advances the
    /// turn and draws the next placeable tile.
    pub fn play_turn(&mut self, mv: PlacedTile) -> Result<(), GameError> {
        let current_tile = self.current_tile()?;
        if !mv.equals_tile(&current_tile) {
            return Err(GameError::WrongTile);
        }

        let player_id = self.players[self.current_player].id();
        for pf in &mv.features {
            if let Some(meeple) = pf.meeple {
                if meeple.player != player_id {
                    return Err(GameError::WrongMeepleOwner);
                }
            }
        }

        let report = self.players[self.current_player].place_tile(&mut self.board, mv.clone())?;
        // the board is committed; the turn passes whatever happens below
        self.current_player = (self.current_player + 1) % self.players.len();

        self.log.log_event(
            EventKind::PlaceTile,
            &PlaceTileContent {
                player: player_id,
                tile: &mv,
            },
        )?;

        self.apply_report(&report);
        if !report.is_empty() {
            self.log
                .log_event(EventKind::Score, &ScoreContent { report: &report })?;
        }

        self.deck.next()?;
        self.ensure_current_tile_has_valid_placement()?;
        Ok(())
    }

    /// Final scoring. Only valid once the deck is exhausted; returns every
    /// player's total including unfinished-feature and farm points.
    pub fn finalize(&mut self) -> Result<ScoreReport, GameError> {
        match self.current_tile() {
            Err(GameError::DeckExhausted) => {}
            _ => return Err(GameError::GameNotFinished),
        }

        let meeples_report = self.board.unfinished_score_report();
        self.log.log_event(
            EventKind::Score,
            &ScoreContent {
                report: &meeples_report,
            },
        )?;

        let mut totals = ScoreReport::new();
        for player in &self.players {
            totals.received_points.insert(player.id(), player.score());
        }
        totals.join(meeples_report);

        self.log.log_event(
            EventKind::FinalScore,
            &ScoreContent { report: &totals },
        )?;
        Ok(totals)
    }

    /// Every player's score as if the game ended on the current board,
    /// farms included. Mutates nothing and returns no meeples.
    pub fn mid_game_score(&self) -> ScoreReport {
        let mut report = ScoreReport::new();
        for player in &self.players {
            report.received_points.insert(player.id(), player.score());
        }
        report.join(self.board.unfinished_score_report());
        report
    }

    pub fn serialized(&self) -> SerializedGame {
        let players = self.players.iter().map(Player::serialized).collect();
        let tiles: Vec<PlacedTile> = self.board.tiles().cloned().collect();
        let binary_tiles = self
            .board
            .slots()
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .map(BinaryTile::from_placed_tile)
                    .unwrap_or_default()
            })
            .collect();

        let mut serialized = SerializedGame {
            current_tile: None,
            valid_placements: Vec::new(),
            current_player_id: self.current_player().id(),
            players,
            tiles,
            tile_set: self.board.tile_set().clone(),
            binary_tiles,
        };

        // swappable clones must not reveal what they would draw next
        if self.can_swap_tiles {
            return serialized;
        }

        if let Ok(tile) = self.current_tile() {
            serialized.valid_placements = self.board.get_tile_placements_for(&tile);
            serialized.current_tile = Some(tile);
        }
        serialized
    }

    fn apply_report(&mut self, report: &ScoreReport) {
        for (&player_id, &points) in &report.received_points {
            let player = &mut self.players[player_id as usize - 1];
            player.set_score(player.score() + points);
        }
        for (&player_id, meeples) in &report.returned_meeples {
            let player = &mut self.players[player_id as usize - 1];
            for returned in meeples {
                let kind = returned.meeple.kind;
                player.set_meeple_count(kind, player.meeple_count(kind) + 1);
            }
        }
    }

    /// Discards undrawn tiles until the top of the deck has at least one
    /// valid placement. An exhausted deck is fine: the game is simply over.
    fn ensure_current_tile_has_valid_placement(&mut self) -> Result<(), GameError> {
        loop {
            match self.deck.peek() {
                Err(GameError::DeckExhausted) => return Ok(()),
                Err(err) => return Err(err),
                Ok(tile) => {
                    if self.board.has_valid_placement(tile) {
                        return Ok(());
                    }
                }
            }
            let discarded = self.deck.next()?;
            tracing::debug!(?discarded, "discarding tile with no valid placement");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::TileStack;
    use crate::tile::{templates, FeatureType, Side};

    fn ordered_game(tiles: Vec<Tile>, players: usize) -> Game {
        let deck = Deck::new(
            TileStack::new_ordered(tiles),
            templates::single_city_edge_straight_roads(),
        );
        Game::new_from_deck(deck, GameLog::discard(), players).unwrap()
    }

    fn make_turn(game: &mut Game, x: i16, y: i16, meeple: Option<(Side, FeatureType)>) {
        let tile = game.current_tile().unwrap();
        let mut mv = PlacedTile::new(tile, Position::new(x, y));
        if let Some((side, feature_type)) = meeple {
            mv.feature_at_mut(side, feature_type)
                .unwrap_or_else(|| panic!("no {feature_type:?} at {side:?}"))
                .meeple = Some(Meeple::normal(game.current_player().id()));
        }
        game.play_turn(mv).unwrap();
    }

    fn scores(game: &Game) -> Vec<u32> {
        let report = game.mid_game_score();
        (1..=game.player_count() as PlayerId)
            .map(|id| report.received_points.get(&id).copied().unwrap_or(0))
            .collect()
    }

    #[test]
    fn play_turn_advances_player_and_draws() {
        let mut game = ordered_game(vec![templates::straight_roads(), templates::roads_turn()], 2);
        assert_eq!(game.current_player().id(), 1);
        make_turn(&mut game, 1, 0, None);
        assert_eq!(game.current_player().id(), 2);
        assert_eq!(game.remaining_tiles().len(), 1);
    }

    #[test]
    fn play_turn_rejects_the_wrong_tile() {
        let mut game = ordered_game(vec![templates::straight_roads()], 2);
        let mv = PlacedTile::new(templates::monastery_without_roads(), Position::new(0, -1));
        assert!(matches!(game.play_turn(mv), Err(GameError::WrongTile)));
    }

    #[test]
    fn play_turn_rejects_foreign_meeples() {
        let mut game = ordered_game(vec![templates::straight_roads()], 2);
        let mut mv = PlacedTile::new(templates::straight_roads(), Position::new(1, 0));
        mv.feature_at_mut(Side::RIGHT, FeatureType::Road).unwrap().meeple =
            Some(Meeple::normal(2));
        assert!(matches!(
            game.play_turn(mv),
            Err(GameError::WrongMeepleOwner)
        ));
    }

    #[test]
    fn exhausted_game_rejects_turns() {
        let mut game = ordered_game(vec![templates::straight_roads()], 2);
        make_turn(&mut game, 1, 0, None);
        assert!(matches!(game.current_tile(), Err(GameError::DeckExhausted)));
        let mv = PlacedTile::new(templates::straight_roads(), Position::new(-1, 0));
        assert!(matches!(game.play_turn(mv), Err(GameError::DeckExhausted)));
    }

    /// Mid-game projections after each of four scripted turns: a monastery
    /// claim, a road claim, a farm claim and a city claim, with the start
    /// tile's city closed by the last move.
    #[test]
    fn mid_game_scores_track_the_board() {
        let mut game = ordered_game(
            vec![
                templates::monastery_with_single_road().rotate(1),
                templates::straight_roads(),
                templates::t_cross_road(),
                templates::two_city_edges_up_and_down_not_connected(),
            ],
            2,
        );

        make_turn(&mut game, 1, 0, Some((Side::NONE, FeatureType::Monastery)));
        assert_eq!(scores(&game), vec![2, 0]);

        make_turn(&mut game, -1, 0, Some((Side::RIGHT, FeatureType::Road)));
        assert_eq!(scores(&game), vec![2, 3]);

        make_turn(&mut game, -2, 0, Some((Side::TOP, FeatureType::Field)));
        assert_eq!(scores(&game), vec![2, 4]);

        make_turn(&mut game, 0, 1, Some((Side::TOP, FeatureType::City)));
        assert_eq!(scores(&game), vec![6, 5]);

        // deck exhausted: finalize reports the same totals
        let finals = game.finalize().unwrap();
        assert_eq!(finals.received_points.get(&1), Some(&6));
        assert_eq!(finals.received_points.get(&2), Some(&5));
    }

    #[test]
    fn finalize_requires_an_exhausted_deck() {
        let mut game = ordered_game(vec![templates::straight_roads()], 2);
        assert!(matches!(
            game.finalize(),
            Err(GameError::GameNotFinished)
        ));
    }

    #[test]
    fn completed_features_return_meeples_and_score_immediately() {
        let mut game = ordered_game(vec![templates::single_city_edge_no_roads()], 2);
        // close the start city with a meeple on the closing tile
        let tile = game.current_tile().unwrap().rotate(2);
        let mut mv = PlacedTile::new(tile, Position::new(0, 1));
        mv.feature_at_mut(Side::BOTTOM, FeatureType::City).unwrap().meeple =
            Some(Meeple::normal(1));
        game.play_turn(mv).unwrap();

        let player = &game.players()[0];
        assert_eq!(player.score(), 4);
        assert_eq!(player.meeple_count(MeepleKind::Normal), 7);
    }

    #[test]
    fn clones_evolve_independently() {
        let mut game = ordered_game(
            vec![templates::straight_roads(), templates::roads_turn()],
            2,
        );
        let clone = game.deep_clone();
        assert_eq!(clone.serialized(), game.serialized());

        make_turn(&mut game, 1, 0, None);
        assert_eq!(game.board().tile_count(), 2);
        assert_eq!(clone.board().tile_count(), 1);
        assert_ne!(clone.serialized(), game.serialized());
    }

    #[test]
    fn swappable_clones_hide_the_current_tile() {
        let game = ordered_game(vec![templates::straight_roads()], 2);
        let clone = game.deep_clone_with_swappable_tiles();
        assert!(clone.serialized().current_tile.is_none());
        assert!(game.serialized().current_tile.is_some());
    }

    #[test]
    fn swap_current_tile_needs_a_swappable_clone() {
        let mut game = ordered_game(
            vec![templates::straight_roads(), templates::roads_turn()],
            2,
        );
        let turn = templates::roads_turn();
        assert!(matches!(
            game.swap_current_tile(&turn),
            Err(GameError::CannotSwapTiles)
        ));

        let mut clone = game.deep_clone_with_swappable_tiles();
        clone.swap_current_tile(&turn).unwrap();
        assert!(clone.current_tile().unwrap().equals(&turn));
    }

    #[test]
    fn unplaceable_tiles_are_discarded_on_draw() {
        // a full-city tile can never attach to the starting tile's field
        // and road edges once the city edge is capped
        let mut game = ordered_game(
            vec![
                templates::single_city_edge_no_roads().rotate(2),
                templates::four_city_edges_connected_shield(),
                templates::straight_roads(),
            ],
            2,
        );
        // cap the start city so no city edge remains open
        make_turn(&mut game, 0, 1, None);
        // the four-city tile is unplaceable and silently discarded
        assert!(game
            .current_tile()
            .unwrap()
            .equals(&templates::straight_roads()));
    }

    #[test]
    fn legal_moves_respect_the_meeple_pool() {
        let game = ordered_game(vec![templates::monastery_without_roads()], 2);
        let tile = game.current_tile().unwrap();
        let placements = game.get_tile_placements_for(&tile);
        assert_eq!(placements.len(), 1);
        assert_eq!(game.get_legal_moves_for(&placements[0]).len(), 3);

        let mut broke = ordered_game(vec![templates::monastery_without_roads()], 2);
        broke.players[0].set_meeple_count(MeepleKind::Normal, 0);
        let placements = broke.get_tile_placements_for(&tile);
        assert_eq!(broke.get_legal_moves_for(&placements[0]).len(), 1);
    }
}
