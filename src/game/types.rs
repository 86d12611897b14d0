//! Board-level value types: positions, meeples and placed tiles.

use serde::{Deserialize, Serialize};

use crate::tile::{Feature, FeatureType, Side, Tile};

pub type PlayerId = u8;

/// Board coordinates. The starting tile sits at (0, 0); y grows upwards:
///
/// ```text
/// (-1, +1)  (+0, +1)  (+1, +1)
/// (-1, +0)  (+0, +0)  (+1, +0)
/// (-1, -1)  (+0, -1)  (+1, -1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i16,
    y: i16,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i16, y: i16) -> Position {
        Position { x, y }
    }

    pub fn x(self) -> i16 {
        self.x
    }

    pub fn y(self) -> i16 {
        self.y
    }

    pub fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }

    /// The offset of the neighbour that `side` faces. `side` must lie
    /// within a single primary edge (a whole edge or one of its halves).
    pub fn from_side(side: Side) -> Position {
        let mut primaries = Side::PRIMARY
            .into_iter()
            .filter(|p| side.overlaps(*p));
        let primary = primaries
            .next()
            .unwrap_or_else(|| panic!("Position::from_side called with no primary side: {side:?}"));
        if primaries.next().is_some() {
            panic!("Position::from_side called with more than one primary side: {side:?}");
        }
        match primary {
            Side::TOP => Position::new(0, 1),
            Side::RIGHT => Position::new(1, 0),
            Side::BOTTOM => Position::new(0, -1),
            _ => Position::new(-1, 0),
        }
    }

    /// All 8 surrounding positions, for the monastery completion rule.
    pub fn surrounding(self) -> impl Iterator<Item = Position> {
        let center = self;
        (-1i16..=1)
            .flat_map(|dx| (-1i16..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| Position::new(center.x + dx, center.y + dy))
    }

    /// The 4 orthogonal neighbours, in the top/right/bottom/left order used
    /// everywhere else.
    pub fn neighbours(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y - 1),
            Position::new(self.x - 1, self.y),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeepleKind {
    Normal,
}

impl MeepleKind {
    pub const COUNT: usize = 1;

    pub fn index(self) -> usize {
        match self {
            MeepleKind::Normal => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meeple {
    pub player: PlayerId,
    pub kind: MeepleKind,
}

impl Meeple {
    pub fn normal(player: PlayerId) -> Meeple {
        Meeple {
            player,
            kind: MeepleKind::Normal,
        }
    }
}

/// A meeple together with where it stood, reported when features score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeepleWithPosition {
    pub meeple: Meeple,
    pub position: Position,
    pub sides: Side,
    pub feature_type: FeatureType,
}

/// A tile feature as placed on the board, optionally claimed by a meeple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFeature {
    pub feature: Feature,
    pub meeple: Option<Meeple>,
}

impl PlacedFeature {
    pub fn new(feature: Feature) -> PlacedFeature {
        PlacedFeature {
            feature,
            meeple: None,
        }
    }
}

/// A tile bound to a board position. Placed features are stored in the same
/// order as the tile template declares them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub features: Vec<PlacedFeature>,
    pub position: Position,
}

impl PlacedTile {
    pub fn new(tile: Tile, position: Position) -> PlacedTile {
        PlacedTile {
            features: tile.features.into_iter().map(PlacedFeature::new).collect(),
            position,
        }
    }

    /// The underlying tile, meeples stripped.
    pub fn to_tile(&self) -> Tile {
        Tile {
            features: self.features.iter().map(|pf| pf.feature).collect(),
        }
    }

    /// True if this placement is some rotation of `tile`.
    pub fn equals_tile(&self, tile: &Tile) -> bool {
        self.to_tile().equals(tile)
    }

    /// The feature of the given type covering the given side(s). Querying
    /// with [`Side::NONE`] finds side-less features (monasteries, and the
    /// unconnected centre fields of some expansions).
    pub fn feature_at(&self, side: Side, feature_type: FeatureType) -> Option<&PlacedFeature> {
        self.features.iter().find(|pf| {
            pf.feature.feature_type == feature_type
                && ((side.is_none() && pf.feature.sides.is_none())
                    || pf.feature.sides.contains(side))
        })
    }

    pub fn feature_at_mut(
        &mut self,
        side: Side,
        feature_type: FeatureType,
    ) -> Option<&mut PlacedFeature> {
        self.features.iter_mut().find(|pf| {
            pf.feature.feature_type == feature_type
                && ((side.is_none() && pf.feature.sides.is_none())
                    || pf.feature.sides.contains(side))
        })
    }

    pub fn monastery(&self) -> Option<&PlacedFeature> {
        self.features
            .iter()
            .find(|pf| pf.feature.feature_type == FeatureType::Monastery)
    }

    /// Number of meeples on this tile (at most 1 on anything legally placed).
    pub fn meeple_count(&self) -> usize {
        self.features.iter().filter(|pf| pf.meeple.is_some()).count()
    }

    /// The feature type shown on a whole edge, for adjacency checks.
    pub fn edge_feature_type(&self, side: Side) -> FeatureType {
        for pf in &self.features {
            match pf.feature.feature_type {
                FeatureType::City | FeatureType::Road if pf.feature.sides.contains(side) => {
                    return pf.feature.feature_type;
                }
                _ => {}
            }
        }
        FeatureType::Field
    }
}

/// Player state as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPlayer {
    pub id: PlayerId,
    pub meeple_counts: Vec<u8>,
    pub score: u32,
}
