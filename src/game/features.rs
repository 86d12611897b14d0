//! The feature graph: groups placed tile-features into logical roads,
//! cities, monasteries and farms, merged incrementally as tiles are placed.
//!
//! Instances live in a growable arena and are referenced by index; a
//! parent-index vector implements union-find with path compression, so a
//! feature id stays valid across merges and always resolves to the current
//! representative.
//!
//! Open-edge bookkeeping drives completion: roads and cities keep one open
//! edge per unmatched whole edge, fields one per unmatched half-edge. A
//! merge removes the paired edges; a road or city with no open edges is
//! closed. Monasteries close by the 8-neighbour rule, fields never close.

use std::collections::HashMap;

use crate::game::types::{MeepleWithPosition, PlacedTile, Position};
use crate::tile::{FeatureType, Modifier, Side};

pub type FeatureId = usize;

/// One placed tile-feature inside an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub position: Position,
    pub sides: Side,
}

/// An equivalence class of connected tile-features.
#[derive(Debug, Clone)]
pub struct FeatureInstance {
    pub feature_type: FeatureType,
    pub segments: Vec<Segment>,
    pub open_edges: Vec<(Position, Side)>,
    pub meeples: Vec<MeepleWithPosition>,
    pub shields: u32,
    pub completed: bool,
    pub scored: bool,
}

impl FeatureInstance {
    /// Number of distinct tiles the instance spans. A tile contributing two
    /// segments (a crossroad loop closing on itself) counts once.
    pub fn tile_count(&self) -> usize {
        let mut positions: Vec<Position> = self.segments.iter().map(|s| s.position).collect();
        positions.sort();
        positions.dedup();
        positions.len()
    }

    pub fn has_meeples(&self) -> bool {
        !self.meeples.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureGraph {
    parents: Vec<FeatureId>,
    /// Payloads, present at representative indices only.
    instances: Vec<Option<FeatureInstance>>,
    /// Ids created for each position's tile, in tile feature order.
    by_position: HashMap<Position, Vec<FeatureId>>,
}

/// The boundary edges a fresh feature starts with.
pub(crate) fn feature_edges(feature_type: FeatureType, sides: Side) -> Vec<Side> {
    match feature_type {
        FeatureType::Road | FeatureType::City => sides.primary_edges().collect(),
        FeatureType::Field => sides.half_edges().collect(),
        FeatureType::Monastery => Vec::new(),
    }
}

impl FeatureGraph {
    pub fn new() -> FeatureGraph {
        FeatureGraph::default()
    }

    /// Resolves an id to its current representative.
    pub fn root(&self, mut id: FeatureId) -> FeatureId {
        while self.parents[id] != id {
            id = self.parents[id];
        }
        id
    }

    /// Resolving lookup with path halving.
    fn root_compressing(&mut self, mut id: FeatureId) -> FeatureId {
        while self.parents[id] != id {
            self.parents[id] = self.parents[self.parents[id]];
            id = self.parents[id];
        }
        id
    }

    pub fn instance(&self, id: FeatureId) -> &FeatureInstance {
        self.instances[self.root(id)]
            .as_ref()
            .expect("representative index holds an instance")
    }

    fn instance_mut(&mut self, id: FeatureId) -> &mut FeatureInstance {
        let root = self.root_compressing(id);
        self.instances[root]
            .as_mut()
            .expect("representative index holds an instance")
    }

    /// All representative ids, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = FeatureId> + '_ {
        (0..self.parents.len()).filter(move |&i| self.parents[i] == i)
    }

    /// Representatives of the features of the tile at `position`, deduplicated.
    pub fn instances_at(&self, position: Position) -> Vec<FeatureId> {
        let mut out = Vec::new();
        if let Some(ids) = self.by_position.get(&position) {
            for &id in ids {
                let root = self.root(id);
                if !out.contains(&root) {
                    out.push(root);
                }
            }
        }
        out
    }

    /// The representative of the feature of `tile` that covers `side` with
    /// the given type.
    pub fn feature_at(
        &self,
        tile: &PlacedTile,
        side: Side,
        feature_type: FeatureType,
    ) -> Option<FeatureId> {
        let ids = self.by_position.get(&tile.position)?;
        for (idx, pf) in tile.features.iter().enumerate() {
            if pf.feature.feature_type == feature_type && pf.feature.sides.contains(side) {
                return Some(self.root(ids[idx]));
            }
        }
        None
    }

    /// Registers a newly placed tile and merges its features with matching
    /// features on occupied neighbours. `tiles` is the board lookup and
    /// must already contain the tile itself.
    ///
    /// Merging is transitive and idempotent: re-merging two features that
    /// already share a representative only removes their paired open edges.
    ///
    /// Returns the distinct representatives of the tile's features.
    pub fn add_tile(
        &mut self,
        tile: &PlacedTile,
        tiles: &HashMap<Position, PlacedTile>,
    ) -> Vec<FeatureId> {
        let position = tile.position;
        let mut created = Vec::with_capacity(tile.features.len());

        for pf in &tile.features {
            let id = self.parents.len();
            let open_edges = feature_edges(pf.feature.feature_type, pf.feature.sides)
                .into_iter()
                .map(|s| (position, s))
                .collect();
            let meeples = pf
                .meeple
                .map(|meeple| MeepleWithPosition {
                    meeple,
                    position,
                    sides: pf.feature.sides,
                    feature_type: pf.feature.feature_type,
                })
                .into_iter()
                .collect();

            self.parents.push(id);
            self.instances.push(Some(FeatureInstance {
                feature_type: pf.feature.feature_type,
                segments: vec![Segment {
                    position,
                    sides: pf.feature.sides,
                }],
                open_edges,
                meeples,
                shields: u32::from(pf.feature.modifier == Modifier::Shield),
                completed: false,
                scored: false,
            }));
            created.push(id);
        }
        self.by_position.insert(position, created.clone());

        for (idx, pf) in tile.features.iter().enumerate() {
            let feature_type = pf.feature.feature_type;
            for edge in feature_edges(feature_type, pf.feature.sides) {
                let neighbour_pos = position.add(Position::from_side(edge));
                let Some(neighbour) = tiles.get(&neighbour_pos) else {
                    continue;
                };
                let mirrored = edge.mirror();
                let Some(theirs) = self.feature_at(neighbour, mirrored, feature_type) else {
                    continue;
                };
                let merged = self.union(created[idx], theirs);
                let instance = self.instances[merged]
                    .as_mut()
                    .expect("representative index holds an instance");
                instance
                    .open_edges
                    .retain(|e| *e != (position, edge) && *e != (neighbour_pos, mirrored));
            }
        }

        let mut roots = Vec::new();
        for id in created {
            let root = self.root_compressing(id);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }

    /// Union by segment count; returns the surviving representative.
    fn union(&mut self, a: FeatureId, b: FeatureId) -> FeatureId {
        let a = self.root_compressing(a);
        let b = self.root_compressing(b);
        if a == b {
            return a;
        }

        let a_len = self.instances[a].as_ref().map_or(0, |i| i.segments.len());
        let b_len = self.instances[b].as_ref().map_or(0, |i| i.segments.len());
        let (winner, loser) = if a_len >= b_len { (a, b) } else { (b, a) };

        let absorbed = self.instances[loser]
            .take()
            .expect("representative index holds an instance");
        self.parents[loser] = winner;

        let instance = self.instances[winner]
            .as_mut()
            .expect("representative index holds an instance");
        instance.segments.extend(absorbed.segments);
        instance.open_edges.extend(absorbed.open_edges);
        instance.meeples.extend(absorbed.meeples);
        instance.shields += absorbed.shields;
        winner
    }

    /// Completion test against the current board occupancy.
    pub fn is_complete(&self, id: FeatureId, tiles: &HashMap<Position, PlacedTile>) -> bool {
        let instance = self.instance(id);
        match instance.feature_type {
            FeatureType::Field => false,
            FeatureType::Monastery => instance.segments[0]
                .position
                .surrounding()
                .all(|p| tiles.contains_key(&p)),
            FeatureType::Road | FeatureType::City => instance.open_edges.is_empty(),
        }
    }

    pub fn mark_scored(&mut self, id: FeatureId, completed: bool) {
        let instance = self.instance_mut(id);
        instance.scored = true;
        instance.completed = completed;
    }

    /// Points awarded when the instance closes.
    pub fn completion_score(&self, id: FeatureId) -> u32 {
        let instance = self.instance(id);
        let tiles = instance.tile_count() as u32;
        match instance.feature_type {
            FeatureType::Road => tiles,
            FeatureType::City => 2 * tiles + 2 * instance.shields,
            FeatureType::Monastery => 9,
            FeatureType::Field => 0,
        }
    }

    /// Points for an unfinished instance at game end (or for a mid-game
    /// projection). Farms score per adjacent completed city.
    pub fn partial_score(&self, id: FeatureId, tiles: &HashMap<Position, PlacedTile>) -> u32 {
        let instance = self.instance(id);
        match instance.feature_type {
            FeatureType::Road => instance.tile_count() as u32,
            FeatureType::City => instance.tile_count() as u32 + instance.shields,
            FeatureType::Monastery => {
                let occupied = instance.segments[0]
                    .position
                    .surrounding()
                    .filter(|p| tiles.contains_key(p))
                    .count() as u32;
                1 + occupied
            }
            FeatureType::Field => 3 * self.adjacent_completed_cities(id, tiles).len() as u32,
        }
    }

    /// Distinct completed city instances bordering a farm.
    ///
    /// Per-tile adjacency: a field with no sides (an unconnected centre
    /// field) or the tile's only field borders every city on its tile;
    /// otherwise it borders the cities it shares a tile corner with.
    pub fn adjacent_completed_cities(
        &self,
        id: FeatureId,
        tiles: &HashMap<Position, PlacedTile>,
    ) -> Vec<FeatureId> {
        let instance = self.instance(id);
        let mut cities = Vec::new();

        for segment in &instance.segments {
            let Some(tile) = tiles.get(&segment.position) else {
                continue;
            };
            let field_count = tile
                .features
                .iter()
                .filter(|pf| pf.feature.feature_type == FeatureType::Field)
                .count();
            let borders_all = segment.sides.is_none() || field_count == 1;

            let mut corner_sides = Side::NONE;
            if !borders_all {
                for (corner, sides) in Side::CORNERS {
                    if segment.sides.overlaps(corner) {
                        corner_sides |= sides;
                    }
                }
            }

            let ids = &self.by_position[&segment.position];
            for (idx, pf) in tile.features.iter().enumerate() {
                if pf.feature.feature_type != FeatureType::City {
                    continue;
                }
                if !(borders_all || pf.feature.sides.overlaps(corner_sides)) {
                    continue;
                }
                let root = self.root(ids[idx]);
                if self.instance(root).completed && !cities.contains(&root) {
                    cities.push(root);
                }
            }
        }
        cities
    }
}
