//! Tile sides as an 8-bit mask of half-edges.
//!
//! Every tile edge is split into two halves so that field features can
//! occupy one half of an edge without touching the other (roads split the
//! fields that run alongside them). Roads and cities always occupy whole
//! edges, i.e. both half-edge bits of each edge they touch.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitmask over the eight half-edges of a tile.
///
/// Bit layout, most significant first:
/// `TOP_LEFT, TOP_RIGHT, RIGHT_TOP, RIGHT_BOTTOM, BOTTOM_RIGHT, BOTTOM_LEFT,
/// LEFT_BOTTOM, LEFT_TOP`. Half-edge names read "edge, then which half of
/// it": `TOP_LEFT_EDGE` is the left half of the top edge.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Side(u8);

impl Side {
    pub const NONE: Side = Side(0b0000_0000);

    pub const TOP_LEFT_EDGE: Side = Side(0b1000_0000);
    pub const TOP_RIGHT_EDGE: Side = Side(0b0100_0000);
    pub const RIGHT_TOP_EDGE: Side = Side(0b0010_0000);
    pub const RIGHT_BOTTOM_EDGE: Side = Side(0b0001_0000);
    pub const BOTTOM_RIGHT_EDGE: Side = Side(0b0000_1000);
    pub const BOTTOM_LEFT_EDGE: Side = Side(0b0000_0100);
    pub const LEFT_BOTTOM_EDGE: Side = Side(0b0000_0010);
    pub const LEFT_TOP_EDGE: Side = Side(0b0000_0001);

    pub const TOP: Side = Side(0b1100_0000);
    pub const RIGHT: Side = Side(0b0011_0000);
    pub const BOTTOM: Side = Side(0b0000_1100);
    pub const LEFT: Side = Side(0b0000_0011);

    pub const ALL: Side = Side(0b1111_1111);

    /// The four whole edges in clockwise order starting from the top.
    pub const PRIMARY: [Side; 4] = [Self::TOP, Self::RIGHT, Self::BOTTOM, Self::LEFT];

    /// All eight half-edges in clockwise order starting from the left half
    /// of the top edge.
    pub const HALF_EDGES: [Side; 8] = [
        Self::TOP_LEFT_EDGE,
        Self::TOP_RIGHT_EDGE,
        Self::RIGHT_TOP_EDGE,
        Self::RIGHT_BOTTOM_EDGE,
        Self::BOTTOM_RIGHT_EDGE,
        Self::BOTTOM_LEFT_EDGE,
        Self::LEFT_BOTTOM_EDGE,
        Self::LEFT_TOP_EDGE,
    ];

    /// Tile corners: the pair of half-edges meeting at the corner, and the
    /// two whole edges the corner belongs to. Used for field/city adjacency
    /// (a field neighbours the cities it shares a corner with).
    pub const CORNERS: [(Side, Side); 4] = [
        (Side(0b0110_0000), Side(0b1111_0000)), // top-right: TR|RT -> TOP|RIGHT
        (Side(0b0001_1000), Side(0b0011_1100)), // bottom-right: RB|BR -> RIGHT|BOTTOM
        (Side(0b0000_0110), Side(0b0000_1111)), // bottom-left: BL|LB -> BOTTOM|LEFT
        (Side(0b1000_0001), Side(0b1100_0011)), // top-left: LT|TL -> LEFT|TOP
    ];

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Rotates the side clockwise by the given number of quarter turns.
    /// A quarter turn moves every half-edge two bit positions to the right,
    /// wrapping around.
    pub fn rotate(self, rotations: u32) -> Side {
        Side(self.0.rotate_right((rotations % 4) * 2))
    }

    /// The facing side on the adjacent tile: the top edge of one tile
    /// touches the bottom edge of the tile above it, with left/right halves
    /// preserved (our top-left half-edge faces the neighbour's bottom-left).
    pub fn mirror(self) -> Side {
        const PAIRS: [(Side, Side); 4] = [
            (Side::TOP_LEFT_EDGE, Side::BOTTOM_LEFT_EDGE),
            (Side::TOP_RIGHT_EDGE, Side::BOTTOM_RIGHT_EDGE),
            (Side::RIGHT_TOP_EDGE, Side::LEFT_TOP_EDGE),
            (Side::RIGHT_BOTTOM_EDGE, Side::LEFT_BOTTOM_EDGE),
        ];
        let mut out = Side::NONE;
        for (a, b) in PAIRS {
            if self.overlaps(a) {
                out |= b;
            }
            if self.overlaps(b) {
                out |= a;
            }
        }
        out
    }

    /// True if the two masks share any half-edge.
    pub fn overlaps(self, other: Side) -> bool {
        self.0 & other.0 != 0
    }

    /// True if `other` is fully contained in this mask.
    pub fn contains(self, other: Side) -> bool {
        !other.is_none() && self.0 & other.0 == other.0
    }

    /// Whole edges (out of the four primary ones) this mask fully covers.
    pub fn primary_edges(self) -> impl Iterator<Item = Side> {
        Self::PRIMARY.into_iter().filter(move |p| self.contains(*p))
    }

    /// Individual half-edges present in this mask.
    pub fn half_edges(self) -> impl Iterator<Item = Side> {
        Self::HALF_EDGES.into_iter().filter(move |h| self.overlaps(*h))
    }
}

impl BitOr for Side {
    type Output = Side;

    fn bitor(self, rhs: Side) -> Side {
        Side(self.0 | rhs.0)
    }
}

impl BitOrAssign for Side {
    fn bitor_assign(&mut self, rhs: Side) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Side {
    type Output = Side;

    fn bitand(self, rhs: Side) -> Side {
        Side(self.0 & rhs.0)
    }
}

impl fmt::Debug for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Side, &str); 8] = [
            (Side::TOP_LEFT_EDGE, "TL"),
            (Side::TOP_RIGHT_EDGE, "TR"),
            (Side::RIGHT_TOP_EDGE, "RT"),
            (Side::RIGHT_BOTTOM_EDGE, "RB"),
            (Side::BOTTOM_RIGHT_EDGE, "BR"),
            (Side::BOTTOM_LEFT_EDGE, "BL"),
            (Side::LEFT_BOTTOM_EDGE, "LB"),
            (Side::LEFT_TOP_EDGE, "LT"),
        ];
        if self.is_none() {
            return write!(f, "Side(NONE)");
        }
        write!(f, "Side(")?;
        let mut first = true;
        for (side, name) in NAMES {
            if self.overlaps(side) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}
