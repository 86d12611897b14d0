//! Tile sets: an ordered list of drawable tiles plus the designated
//! starting tile.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::tile::{templates, Tile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSet {
    pub tiles: Vec<Tile>,
    pub starting_tile: Tile,
}

impl TileSet {
    pub fn new(tiles: Vec<Tile>, starting_tile: Tile) -> TileSet {
        TileSet {
            tiles,
            starting_tile,
        }
    }
}

/// The 71 drawable tiles of the base game, column by column of the
/// terrain-tile table. One copy of the starting tile is not in the list —
/// it sits on the board before the first draw.
static STANDARD_TILES: Lazy<Vec<Tile>> = Lazy::new(|| {
    let counts: [(fn() -> Tile, usize); 24] = [
        (templates::monastery_without_roads, 4),
        (templates::monastery_with_single_road, 2),
        (templates::straight_roads, 8),
        (templates::roads_turn, 9),
        (templates::t_cross_road, 4),
        (templates::x_cross_road, 1),
        (templates::single_city_edge_no_roads, 5),
        // the fourth copy is the starting tile itself
        (templates::single_city_edge_straight_roads, 3),
        (templates::single_city_edge_left_road_turn, 3),
        (templates::single_city_edge_right_road_turn, 3),
        (templates::single_city_edge_cross_road, 3),
        (templates::two_city_edges_up_and_down_not_connected, 3),
        (templates::two_city_edges_corner_not_connected, 2),
        (templates::two_city_edges_up_and_down_connected, 1),
        (templates::two_city_edges_up_and_down_connected_shield, 2),
        (templates::two_city_edges_corner_connected, 3),
        (templates::two_city_edges_corner_connected_shield, 2),
        (templates::two_city_edges_corner_connected_road_turn, 3),
        (templates::two_city_edges_corner_connected_road_turn_shield, 2),
        (templates::three_city_edges_connected, 3),
        (templates::three_city_edges_connected_shield, 1),
        (templates::three_city_edges_connected_road, 1),
        (templates::three_city_edges_connected_road_shield, 2),
        (templates::four_city_edges_connected_shield, 1),
    ];

    let mut tiles = Vec::with_capacity(71);
    for (template, count) in counts {
        for _ in 0..count {
            tiles.push(template());
        }
    }
    tiles
});

/// The standard base-game tile set: 71 drawable tiles and the
/// city-with-straight-road starting tile.
pub fn standard_tile_set() -> TileSet {
    TileSet {
        tiles: STANDARD_TILES.clone(),
        starting_tile: templates::single_city_edge_straight_roads(),
    }
}

/// One copy of each of the 24 tile shapes. Handy for deterministic tests
/// that want every shape to show up exactly once.
pub fn every_tile_once_tile_set() -> TileSet {
    let tiles = vec![
        templates::monastery_without_roads(),
        templates::monastery_with_single_road(),
        templates::straight_roads(),
        templates::roads_turn(),
        templates::t_cross_road(),
        templates::x_cross_road(),
        templates::single_city_edge_no_roads(),
        templates::single_city_edge_straight_roads(),
        templates::single_city_edge_left_road_turn(),
        templates::single_city_edge_right_road_turn(),
        templates::single_city_edge_cross_road(),
        templates::two_city_edges_up_and_down_not_connected(),
        templates::two_city_edges_corner_not_connected(),
        templates::two_city_edges_up_and_down_connected(),
        templates::two_city_edges_up_and_down_connected_shield(),
        templates::two_city_edges_corner_connected(),
        templates::two_city_edges_corner_connected_shield(),
        templates::two_city_edges_corner_connected_road_turn(),
        templates::two_city_edges_corner_connected_road_turn_shield(),
        templates::three_city_edges_connected(),
        templates::three_city_edges_connected_shield(),
        templates::three_city_edges_connected_road(),
        templates::three_city_edges_connected_road_shield(),
        templates::four_city_edges_connected_shield(),
    ];
    TileSet {
        tiles,
        starting_tile: templates::single_city_edge_straight_roads(),
    }
}
