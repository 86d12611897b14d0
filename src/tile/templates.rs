//! Constructors for the 24 tile shapes of the base game.
//!
//! Tile counts and layouts follow the non-river terrain tile table of the
//! base game. Fields are described per half-edge so that the two field
//! patches separated by a road stay distinct features.

use super::side::Side;
use super::FeatureType::{City, Field, Monastery, Road};
use super::{Feature, Tile};

/// Monastery surrounded by fields on all sides.
pub fn monastery_without_roads() -> Tile {
    Tile::new(vec![
        Feature::new(Field, Side::ALL),
        Feature::new(Monastery, Side::NONE),
    ])
}

/// Monastery with a road leaving through the bottom edge.
pub fn monastery_with_single_road() -> Tile {
    Tile::new(vec![
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Field, Side::ALL),
        Feature::new(Monastery, Side::NONE),
    ])
}

/// Road running from left to right.
pub fn straight_roads() -> Tile {
    Tile::new(vec![
        Feature::new(Road, Side::LEFT | Side::RIGHT),
        Feature::new(
            Field,
            Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE
                | Side::BOTTOM_RIGHT_EDGE
                | Side::RIGHT_BOTTOM_EDGE,
        ),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::TOP_LEFT_EDGE
                | Side::TOP_RIGHT_EDGE
                | Side::RIGHT_TOP_EDGE,
        ),
    ])
}

/// Road turning from left to bottom.
pub fn roads_turn() -> Tile {
    Tile::new(vec![
        Feature::new(Road, Side::LEFT | Side::BOTTOM),
        Feature::new(Field, Side::LEFT_BOTTOM_EDGE | Side::BOTTOM_LEFT_EDGE),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::TOP_LEFT_EDGE
                | Side::TOP_RIGHT_EDGE
                | Side::RIGHT_TOP_EDGE
                | Side::RIGHT_BOTTOM_EDGE
                | Side::BOTTOM_RIGHT_EDGE,
        ),
    ])
}

/// Three road stubs (left, right, bottom) meeting at a junction.
pub fn t_cross_road() -> Tile {
    Tile::new(vec![
        Feature::new(Road, Side::LEFT),
        Feature::new(Road, Side::RIGHT),
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Field, Side::LEFT_BOTTOM_EDGE | Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::RIGHT_BOTTOM_EDGE | Side::BOTTOM_RIGHT_EDGE),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::TOP_LEFT_EDGE
                | Side::TOP_RIGHT_EDGE
                | Side::RIGHT_TOP_EDGE,
        ),
    ])
}

/// Four road stubs meeting at a crossroads.
pub fn x_cross_road() -> Tile {
    Tile::new(vec![
        Feature::new(Road, Side::LEFT),
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Road, Side::RIGHT),
        Feature::new(Road, Side::TOP),
        Feature::new(Field, Side::LEFT_BOTTOM_EDGE | Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::RIGHT_BOTTOM_EDGE | Side::BOTTOM_RIGHT_EDGE),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::TOP_LEFT_EDGE),
        Feature::new(Field, Side::TOP_RIGHT_EDGE | Side::RIGHT_TOP_EDGE),
    ])
}

/// Single city edge on top, no roads.
pub fn single_city_edge_no_roads() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::RIGHT_TOP_EDGE
                | Side::RIGHT_BOTTOM_EDGE
                | Side::BOTTOM_RIGHT_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE,
        ),
    ])
}

/// Single city edge on top, road from left to right. The starting tile.
pub fn single_city_edge_straight_roads() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(Road, Side::RIGHT | Side::LEFT),
        Feature::new(
            Field,
            Side::RIGHT_BOTTOM_EDGE
                | Side::BOTTOM_RIGHT_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE,
        ),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::RIGHT_TOP_EDGE),
    ])
}

/// Single city edge on top, road turning from left to bottom.
pub fn single_city_edge_left_road_turn() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(Road, Side::LEFT | Side::BOTTOM),
        Feature::new(
            Field,
            Side::RIGHT_BOTTOM_EDGE
                | Side::BOTTOM_RIGHT_EDGE
                | Side::LEFT_TOP_EDGE
                | Side::RIGHT_TOP_EDGE,
        ),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE | Side::LEFT_BOTTOM_EDGE),
    ])
}

/// Single city edge on top, road turning from right to bottom.
pub fn single_city_edge_right_road_turn() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(Road, Side::RIGHT | Side::BOTTOM),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::RIGHT_TOP_EDGE
                | Side::BOTTOM_LEFT_EDGE
                | Side::LEFT_BOTTOM_EDGE,
        ),
        Feature::new(Field, Side::RIGHT_BOTTOM_EDGE | Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// Single city edge on top, road stubs on the other three edges.
pub fn single_city_edge_cross_road() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(Road, Side::RIGHT),
        Feature::new(Road, Side::LEFT),
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::RIGHT_TOP_EDGE),
        Feature::new(Field, Side::RIGHT_BOTTOM_EDGE | Side::BOTTOM_RIGHT_EDGE),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE | Side::LEFT_BOTTOM_EDGE),
    ])
}

/// City edges on top and bottom, not connected.
pub fn two_city_edges_up_and_down_not_connected() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(City, Side::BOTTOM),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::RIGHT_TOP_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::RIGHT_BOTTOM_EDGE,
        ),
    ])
}

/// City edges on top and right, not connected.
pub fn two_city_edges_corner_not_connected() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP),
        Feature::new(City, Side::RIGHT),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE
                | Side::BOTTOM_RIGHT_EDGE,
        ),
    ])
}

/// One city spanning the top and bottom edges.
pub fn two_city_edges_up_and_down_connected() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP | Side::BOTTOM),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::LEFT_BOTTOM_EDGE),
        Feature::new(Field, Side::RIGHT_TOP_EDGE | Side::RIGHT_BOTTOM_EDGE),
    ])
}

/// One city spanning the top and bottom edges, with a shield.
pub fn two_city_edges_up_and_down_connected_shield() -> Tile {
    Tile::new(vec![
        Feature::shielded(City, Side::TOP | Side::BOTTOM),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::LEFT_BOTTOM_EDGE),
        Feature::new(Field, Side::RIGHT_TOP_EDGE | Side::RIGHT_BOTTOM_EDGE),
    ])
}

/// One city spanning the top and right edges.
pub fn two_city_edges_corner_connected() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP | Side::RIGHT),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE
                | Side::BOTTOM_RIGHT_EDGE,
        ),
    ])
}

/// One city spanning the top and right edges, with a shield.
pub fn two_city_edges_corner_connected_shield() -> Tile {
    Tile::new(vec![
        Feature::shielded(City, Side::TOP | Side::RIGHT),
        Feature::new(
            Field,
            Side::LEFT_TOP_EDGE
                | Side::LEFT_BOTTOM_EDGE
                | Side::BOTTOM_LEFT_EDGE
                | Side::BOTTOM_RIGHT_EDGE,
        ),
    ])
}

/// City spanning the top and right edges, road turning from left to bottom.
pub fn two_city_edges_corner_connected_road_turn() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP | Side::RIGHT),
        Feature::new(Road, Side::LEFT | Side::BOTTOM),
        Feature::new(Field, Side::LEFT_BOTTOM_EDGE | Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// Shielded city spanning the top and right edges, road from left to bottom.
pub fn two_city_edges_corner_connected_road_turn_shield() -> Tile {
    Tile::new(vec![
        Feature::shielded(City, Side::TOP | Side::RIGHT),
        Feature::new(Road, Side::LEFT | Side::BOTTOM),
        Feature::new(Field, Side::LEFT_BOTTOM_EDGE | Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::LEFT_TOP_EDGE | Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// One city spanning the top, right and left edges.
pub fn three_city_edges_connected() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP | Side::RIGHT | Side::LEFT),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE | Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// Shielded city spanning the top, right and left edges.
pub fn three_city_edges_connected_shield() -> Tile {
    Tile::new(vec![
        Feature::shielded(City, Side::TOP | Side::RIGHT | Side::LEFT),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE | Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// City spanning the top, right and left edges, road stub at the bottom.
pub fn three_city_edges_connected_road() -> Tile {
    Tile::new(vec![
        Feature::new(City, Side::TOP | Side::RIGHT | Side::LEFT),
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// Shielded city spanning the top, right and left edges, road at the bottom.
pub fn three_city_edges_connected_road_shield() -> Tile {
    Tile::new(vec![
        Feature::shielded(City, Side::TOP | Side::RIGHT | Side::LEFT),
        Feature::new(Road, Side::BOTTOM),
        Feature::new(Field, Side::BOTTOM_LEFT_EDGE),
        Feature::new(Field, Side::BOTTOM_RIGHT_EDGE),
    ])
}

/// One city covering all four edges, with a shield.
pub fn four_city_edges_connected_shield() -> Tile {
    Tile::new(vec![Feature::shielded(
        City,
        Side::TOP | Side::RIGHT | Side::LEFT | Side::BOTTOM,
    )])
}
