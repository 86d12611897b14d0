//! The draw pile: an immutable tile list plus a draw order over it.
//!
//! The order is a permutation of indices so that cloning a deck copies one
//! small vector and a cursor, never the tiles themselves.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game::GameError;
use crate::tile::Tile;
use crate::tileset::TileSet;

#[derive(Debug, Clone)]
pub struct TileStack {
    seed: u64,
    turn_no: usize,
    tiles: Vec<Tile>,
    order: Vec<u32>,
}

impl TileStack {
    /// Shuffled stack with a random seed.
    pub fn new(tiles: Vec<Tile>) -> TileStack {
        Self::new_seeded(tiles, rand::random())
    }

    /// Shuffled stack with the given seed; the same seed always produces
    /// the same draw order.
    pub fn new_seeded(tiles: Vec<Tile>, seed: u64) -> TileStack {
        let mut stack = Self::new_ordered(tiles);
        stack.seed = seed;
        let mut rng = StdRng::seed_from_u64(seed);
        stack.order.shuffle(&mut rng);
        stack
    }

    /// Stack that draws tiles in their declared order. Primarily for
    /// deterministic tests.
    pub fn new_ordered(tiles: Vec<Tile>) -> TileStack {
        let order = (0..tiles.len() as u32).collect();
        TileStack {
            seed: 0,
            turn_no: 0,
            tiles,
            order,
        }
    }

    /// Tiles still to be drawn, in draw order.
    pub fn remaining(&self) -> Vec<Tile> {
        self.order[self.turn_no..]
            .iter()
            .map(|&i| self.tiles[i as usize].clone())
            .collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.tiles.len() - self.turn_no
    }

    pub fn total_count(&self) -> usize {
        self.tiles.len()
    }

    /// The original tile list (constructor input), not the draw order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn get(&self, n: usize) -> Result<&Tile, GameError> {
        if n >= self.tiles.len() {
            return Err(GameError::DeckExhausted);
        }
        Ok(&self.tiles[self.order[n] as usize])
    }

    pub fn peek(&self) -> Result<&Tile, GameError> {
        self.get(self.turn_no)
    }

    pub fn next(&mut self) -> Result<Tile, GameError> {
        let tile = self.get(self.turn_no)?.clone();
        self.turn_no += 1;
        Ok(tile)
    }

    /// Moves the first undrawn tile structurally equal to `tile` to the top
    /// of the draw order. Only meaningful on swappable clones.
    pub fn move_to_top(&mut self, tile: &Tile) -> Result<(), GameError> {
        let order = &mut self.order[self.turn_no..];
        for i in 0..order.len() {
            if self.tiles[order[i] as usize].equals(tile) {
                order.swap(0, i);
                return Ok(());
            }
        }
        Err(GameError::TileNotInDeck)
    }
}

/// A tile stack together with the tile that starts on the board.
#[derive(Debug, Clone)]
pub struct Deck {
    pub stack: TileStack,
    pub starting_tile: Tile,
}

impl Deck {
    pub fn new(stack: TileStack, starting_tile: Tile) -> Deck {
        Deck {
            stack,
            starting_tile,
        }
    }

    pub fn tile_set(&self) -> TileSet {
        TileSet {
            tiles: self.stack.tiles().to_vec(),
            starting_tile: self.starting_tile.clone(),
        }
    }

    pub fn peek(&self) -> Result<&Tile, GameError> {
        self.stack.peek()
    }

    pub fn next(&mut self) -> Result<Tile, GameError> {
        self.stack.next()
    }

    pub fn remaining(&self) -> Vec<Tile> {
        self.stack.remaining()
    }

    pub fn remaining_count(&self) -> usize {
        self.stack.remaining_count()
    }

    pub fn move_to_top(&mut self, tile: &Tile) -> Result<(), GameError> {
        self.stack.move_to_top(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::templates;

    fn four_tiles() -> Vec<Tile> {
        vec![
            templates::monastery_without_roads(),
            templates::straight_roads(),
            templates::roads_turn(),
            templates::t_cross_road(),
        ]
    }

    #[test]
    fn ordered_stack_draws_in_declared_order() {
        let tiles = four_tiles();
        let mut stack = TileStack::new_ordered(tiles.clone());
        for expected in &tiles {
            assert_eq!(&stack.next().unwrap(), expected);
        }
    }

    #[test]
    fn peek_matches_next() {
        let mut stack = TileStack::new_ordered(four_tiles());
        for _ in 0..4 {
            let peeked = stack.peek().unwrap().clone();
            assert_eq!(stack.next().unwrap(), peeked);
        }
    }

    #[test]
    fn exhausted_stack_errors() {
        let mut stack = TileStack::new_ordered(vec![templates::straight_roads()]);
        assert!(stack.next().is_ok());
        assert!(matches!(stack.peek(), Err(GameError::DeckExhausted)));
        assert!(matches!(stack.next(), Err(GameError::DeckExhausted)));
    }

    #[test]
    fn seeded_stacks_are_reproducible() {
        let a: Vec<Tile> = {
            let mut s = TileStack::new_seeded(four_tiles(), 42);
            (0..4).map(|_| s.next().unwrap()).collect()
        };
        let b: Vec<Tile> = {
            let mut s = TileStack::new_seeded(four_tiles(), 42);
            (0..4).map(|_| s.next().unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn clone_draws_independently() {
        let original = TileStack::new_ordered(four_tiles());
        let mut clone = original.clone();
        clone.next().unwrap();
        assert_eq!(clone.remaining_count(), 3);
        assert_eq!(original.remaining_count(), 4);
    }

    #[test]
    fn move_to_top_uses_structural_equality() {
        let mut stack = TileStack::new_ordered(four_tiles());
        let rotated_turn = templates::roads_turn().rotate(2);
        stack.move_to_top(&rotated_turn).unwrap();
        assert!(stack.peek().unwrap().equals(&templates::roads_turn()));

        let missing = templates::four_city_edges_connected_shield();
        assert!(matches!(
            stack.move_to_top(&missing),
            Err(GameError::TileNotInDeck)
        ));
    }
}
