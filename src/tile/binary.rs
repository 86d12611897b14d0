//! Compact one-`u64`-per-tile encoding of a placed tile, exposed in the
//! serialized game state. An unoccupied board slot encodes as 0.
//!
//! Bit layout, from least to most significant:
//!
//! ```text
//! 00000000_00000000_1_00_000000011_00_0011_0000010011_0001001100_1000001110
//!  X pos    Y pos   ^ ^    meeple  ^    ^     city       road      field
//!                   | |            |    shield (4 side bits)
//!                   | owner        monastery bit, then unconnected-field bit
//!                   is-placed
//! ```
//!
//! - fields, roads and cities each get 10 bits: 4 "present" bits (corners
//!   for fields, edges for roads/cities, clockwise from top / top-right)
//!   followed by 6 connection bits, one per pair of present bits;
//! - the shield section repeats the city edge bits for shielded cities;
//! - the meeple section is 4 edge bits, 4 corner bits and 1 centre bit;
//! - the owner is the claiming player's id minus one, in two bits, valid
//!   only when some meeple bit is set (ids 1..=4);
//! - positions are stored biased by +128 so they fit a byte each.

use serde::{Deserialize, Serialize};

use crate::game::types::{PlacedFeature, PlacedTile, Position};
use crate::tile::side::Side;
use crate::tile::{FeatureType, Modifier, Tile};

const FEATURE_BITS: usize = 10;
const MODIFIER_BITS: usize = 4;
const MEEPLE_BITS: usize = 9;
pub const MAX_PLAYERS: u8 = 4;

const CONNECTION_OFFSET: usize = 4;
const DIAGONAL_MEEPLE_OFFSET: usize = 4;

const FIELD_START: usize = 0;
const ROAD_START: usize = FIELD_START + FEATURE_BITS;
const CITY_START: usize = ROAD_START + FEATURE_BITS;
const SHIELD_START: usize = CITY_START + FEATURE_BITS;
const MONASTERY_BIT: usize = SHIELD_START + MODIFIER_BITS;
const UNCONNECTED_FIELD_BIT: usize = MONASTERY_BIT + 1;
const MEEPLE_START: usize = UNCONNECTED_FIELD_BIT + 1;
const OWNER_START: usize = MEEPLE_START + MEEPLE_BITS;
const IS_PLACED_BIT: usize = OWNER_START + 2;
const POSITION_START: usize = 48;

const ORTHOGONAL_BITS: [Side; 4] = [Side::TOP, Side::RIGHT, Side::BOTTOM, Side::LEFT];

// Corner half-edge pairs, clockwise from the top-right corner.
const DIAGONAL_BITS: [Side; 4] = [
    Side::CORNERS[0].0,
    Side::CORNERS[1].0,
    Side::CORNERS[2].0,
    Side::CORNERS[3].0,
];

const CONNECTION_MASKS: [u64; 6] = [0b0011, 0b0110, 0b1100, 0b1001, 0b0101, 0b1010];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BinaryTile(pub u64);

impl BinaryTile {
    /// Encodes an unplaced tile: feature bits only, no meeples, no
    /// position, is-placed bit clear.
    pub fn from_tile(tile: &Tile) -> BinaryTile {
        let placed = PlacedTile::new(tile.clone(), Position::new(0, 0));
        Self::from_features(&placed.features)
    }

    /// Encodes a placed tile, including meeples, owner, position and the
    /// is-placed bit.
    pub fn from_placed_tile(tile: &PlacedTile) -> BinaryTile {
        let mut binary = Self::from_features(&tile.features);
        binary.add_position(tile.position);
        binary.set_bit(IS_PLACED_BIT);
        binary
    }

    pub fn is_placed(self) -> bool {
        self.0 & (1 << IS_PLACED_BIT) != 0
    }

    fn from_features(features: &[PlacedFeature]) -> BinaryTile {
        let mut binary = BinaryTile(0);

        for placed in features {
            match placed.feature.feature_type {
                FeatureType::Road => binary.add_orthogonal(placed, ROAD_START),
                FeatureType::City => binary.add_orthogonal(placed, CITY_START),
                FeatureType::Field => {
                    if placed.feature.sides.is_none() {
                        binary.set_bit(UNCONNECTED_FIELD_BIT);
                        binary.add_center_meeple(placed);
                    } else {
                        binary.add_diagonal(placed, FIELD_START);
                    }
                }
                FeatureType::Monastery => {
                    binary.set_bit(MONASTERY_BIT);
                    binary.add_center_meeple(placed);
                }
            }
        }

        binary
    }

    /// Edge-aligned feature (road or city). Also handles city shields.
    fn add_orthogonal(&mut self, placed: &PlacedFeature, offset: usize) {
        let mut section = BinaryTile(0);

        for (bit, side) in ORTHOGONAL_BITS.into_iter().enumerate() {
            if placed.feature.sides.contains(side) {
                section.set_bit(offset + bit);

                if placed.feature.modifier == Modifier::Shield {
                    section.set_bit(SHIELD_START + bit);
                }
                if let Some(meeple) = placed.meeple {
                    self.set_owner(meeple.player);
                    section.set_bit(MEEPLE_START + bit);
                }
            }
        }
        section.add_connections(offset);
        self.0 |= section.0;
    }

    /// Corner-aligned feature (field).
    fn add_diagonal(&mut self, placed: &PlacedFeature, offset: usize) {
        let mut section = BinaryTile(0);

        for (bit, corner) in DIAGONAL_BITS.into_iter().enumerate() {
            if placed.feature.sides.overlaps(corner) {
                section.set_bit(offset + bit);

                if let Some(meeple) = placed.meeple {
                    self.set_owner(meeple.player);
                    section.set_bit(MEEPLE_START + bit + DIAGONAL_MEEPLE_OFFSET);
                }
            }
        }
        section.add_connections(offset);
        self.0 |= section.0;
    }

    fn add_center_meeple(&mut self, placed: &PlacedFeature) {
        if let Some(meeple) = placed.meeple {
            self.set_owner(meeple.player);
            self.set_bit(MEEPLE_START + MEEPLE_BITS - 1);
        }
    }

    fn add_connections(&mut self, offset: usize) {
        for (bit, mask) in CONNECTION_MASKS.into_iter().enumerate() {
            let mask = mask << offset;
            if self.0 & mask == mask {
                self.set_bit(offset + bit + CONNECTION_OFFSET);
            }
        }
    }

    fn set_owner(&mut self, player: u8) {
        if player == 0 || player > MAX_PLAYERS {
            panic!("player id {player} out of range for binary tile (1..={MAX_PLAYERS})");
        }
        self.0 |= u64::from(player - 1) << OWNER_START;
    }

    fn add_position(&mut self, position: Position) {
        let (x, y) = (position.x(), position.y());
        if !(-128..=127).contains(&x) || !(-128..=127).contains(&y) {
            panic!("position ({x},{y}) out of range for binary tile ([-128, 127])");
        }
        let mut bits = u64::from((x + 128) as u8);
        bits <<= 8;
        bits |= u64::from((y + 128) as u8);
        self.0 |= bits << POSITION_START;
    }

    fn set_bit(&mut self, bit: usize) {
        self.0 |= 1 << bit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Meeple, MeepleKind};
    use crate::tile::templates;

    #[test]
    fn default_is_the_unoccupied_slot() {
        assert_eq!(BinaryTile::default().0, 0);
        assert!(!BinaryTile::default().is_placed());
    }

    #[test]
    fn placed_tiles_set_the_placed_bit_and_position() {
        let placed = PlacedTile::new(templates::straight_roads(), Position::new(3, -1));
        let binary = BinaryTile::from_placed_tile(&placed);
        assert!(binary.is_placed());
        assert_eq!((binary.0 >> 56) & 0xFF, 3 + 128);
        assert_eq!((binary.0 >> 48) & 0xFF, 128 - 1);
    }

    #[test]
    fn unplaced_encoding_has_no_placement_bits() {
        let binary = BinaryTile::from_tile(&templates::straight_roads());
        assert!(!binary.is_placed());
        assert_eq!(binary.0 >> POSITION_START, 0);
    }

    #[test]
    fn monastery_and_shield_bits() {
        let monastery = BinaryTile::from_tile(&templates::monastery_without_roads());
        assert_ne!(monastery.0 & (1 << MONASTERY_BIT), 0);

        let shielded = BinaryTile::from_tile(&templates::four_city_edges_connected_shield());
        assert_eq!((shielded.0 >> SHIELD_START) & 0b1111, 0b1111);

        let plain = BinaryTile::from_tile(&templates::three_city_edges_connected());
        assert_eq!((plain.0 >> SHIELD_START) & 0b1111, 0);
    }

    #[test]
    fn connected_city_sets_connection_bits() {
        // City across top and bottom: edge bits 0 and 2 -> connection masks
        // 0b0101 (index 4) matches.
        let binary = BinaryTile::from_tile(&templates::two_city_edges_up_and_down_connected());
        let city_bits = (binary.0 >> CITY_START) & 0b11_1111_1111;
        assert_eq!(city_bits & 0b1111, 0b0101);
        assert_ne!(city_bits & (1 << (CONNECTION_OFFSET + 4)), 0);

        // Two separate city edges produce no connection bits.
        let split = BinaryTile::from_tile(&templates::two_city_edges_up_and_down_not_connected());
        let split_bits = (split.0 >> CITY_START) & 0b11_1111_1111;
        assert_eq!(split_bits & 0b1111, 0b0101);
        assert_eq!(split_bits >> CONNECTION_OFFSET, 0);
    }

    #[test]
    fn meeple_owner_is_encoded() {
        let mut placed = PlacedTile::new(templates::monastery_without_roads(), Position::new(0, 0));
        placed.features[1].meeple = Some(Meeple {
            player: 2,
            kind: MeepleKind::Normal,
        });
        let binary = BinaryTile::from_placed_tile(&placed);
        // centre meeple bit
        assert_ne!(binary.0 & (1 << (MEEPLE_START + MEEPLE_BITS - 1)), 0);
        // owner bits hold id - 1
        assert_eq!((binary.0 >> OWNER_START) & 0b11, 1);
    }
}
