//! Tile and feature model: the immutable description of a tile's roads,
//! cities, fields and monasteries, with rotation as a pure transform.

pub mod binary;
pub mod side;
pub mod templates;

use serde::{Deserialize, Serialize};

pub use binary::BinaryTile;
pub use side::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Road,
    City,
    Field,
    Monastery,
}

/// Feature modifiers. Only cities carry one in the base game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    #[default]
    None,
    Shield,
}

/// One feature of a tile: its type, the sides it occupies and an optional
/// modifier. Roads and cities occupy whole edges, fields occupy half-edges,
/// monasteries occupy no sides at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Feature {
    pub feature_type: FeatureType,
    pub modifier: Modifier,
    pub sides: Side,
}

impl Feature {
    pub fn new(feature_type: FeatureType, sides: Side) -> Feature {
        Feature {
            feature_type,
            modifier: Modifier::None,
            sides,
        }
    }

    pub fn shielded(feature_type: FeatureType, sides: Side) -> Feature {
        Feature {
            feature_type,
            modifier: Modifier::Shield,
            sides,
        }
    }

    pub fn rotate(self, rotations: u32) -> Feature {
        Feature {
            sides: self.sides.rotate(rotations),
            ..self
        }
    }
}

/// An unplaced tile. `==` is exact equality (orientation included) over
/// the feature *multiset* — rotating a tile may permute its feature list,
/// e.g. the two field patches of a straight road swap on a half turn —
/// while [`Tile::equals`] compares up to rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub features: Vec<Feature>,
}

impl PartialEq for Tile {
    fn eq(&self, other: &Tile) -> bool {
        self.sorted_features() == other.sorted_features()
    }
}

impl Eq for Tile {}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Tile) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Tile) -> std::cmp::Ordering {
        self.sorted_features().cmp(&other.sorted_features())
    }
}

impl std::hash::Hash for Tile {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sorted_features().hash(state);
    }
}

impl Tile {
    pub fn new(features: Vec<Feature>) -> Tile {
        Tile { features }
    }

    fn sorted_features(&self) -> Vec<Feature> {
        let mut features = self.features.clone();
        features.sort_unstable();
        features
    }

    /// Rotates the tile clockwise by the given number of quarter turns.
    pub fn rotate(&self, rotations: u32) -> Tile {
        Tile {
            features: self.features.iter().map(|f| f.rotate(rotations)).collect(),
        }
    }

    /// Structural equality: true if some rotation of `self` is exactly
    /// `other`.
    pub fn equals(&self, other: &Tile) -> bool {
        (0..4).any(|r| &self.rotate(r) == other)
    }

    /// The distinct orientations of this tile, in rotation order. Fully
    /// symmetric tiles yield one entry, twofold-symmetric tiles two.
    pub fn rotations(&self) -> Vec<Tile> {
        let mut out: Vec<Tile> = Vec::with_capacity(4);
        for r in 0..4 {
            let rotated = self.rotate(r);
            if !out.contains(&rotated) {
                out.push(rotated);
            }
        }
        out
    }

    pub fn features_of_type(&self, feature_type: FeatureType) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| f.feature_type == feature_type)
    }

    /// The feature type presented on a whole edge: the city or road that
    /// covers it, or field otherwise. `side` must be one of
    /// [`Side::PRIMARY`].
    pub fn edge_feature_type(&self, side: Side) -> FeatureType {
        for feature in &self.features {
            match feature.feature_type {
                FeatureType::City | FeatureType::Road if feature.sides.contains(side) => {
                    return feature.feature_type;
                }
                _ => {}
            }
        }
        FeatureType::Field
    }

    pub fn has_monastery(&self) -> bool {
        self.features_of_type(FeatureType::Monastery).next().is_some()
    }
}
