use std::collections::{HashMap, HashSet};
use std::time::Duration;

use glam::Vec2;
use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{
    broadphase::SpatialGrid,
    contact::{BodyPair, CollisionResult},
    groups::{CollisionGroups, GroupId},
    narrowphase::SATAlgorithm,
};
use crate::{
    config::EngineConfig,
    core::{
        mask::CollisionMask,
        types::{Anchor, BodyId, Transform2D},
    },
    error::{PhysicsError, Result},
    utils::{logging::ScopedTimer, profiling::PhaseTimer},
};

/// Timings and counts from the most recent [`CollisionSolver::check_collisions`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckStats {
    pub refreshed_masks: usize,
    pub pruned_cells: usize,
    pub candidate_pairs: usize,
    pub contacts: usize,
    pub broad_phase_time: Duration,
    pub narrow_phase_time: Duration,
}

/// Owns every collision mask and the persistent grid they are placed in.
#[derive(Debug)]
pub struct CollisionSolver {
    masks: HashMap<BodyId, CollisionMask>,
    grid: SpatialGrid,
    groups: CollisionGroups,
    anchor: Anchor,
    parallel_enabled: bool,
    last_stats: CheckStats,
}

impl CollisionSolver {
    pub fn new(cell_size: f32, anchor: Anchor) -> Self {
        Self {
            masks: HashMap::new(),
            grid: SpatialGrid::new(cell_size),
            groups: CollisionGroups::new(),
            anchor,
            parallel_enabled: false,
            last_stats: CheckStats::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cell_size, config.anchor)
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn groups(&self) -> &CollisionGroups {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut CollisionGroups {
        &mut self.groups
    }

    pub fn last_stats(&self) -> CheckStats {
        self.last_stats
    }

    /// Only takes effect when the crate is built with the `parallel` feature.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    /// Registers a mask and places it in the grid.
    pub fn create_mask(&mut self, id: BodyId, size: Vec2, position: Vec2, rotation: f32) -> Result<()> {
        if self.masks.contains_key(&id) {
            return Err(PhysicsError::DuplicateId(id));
        }

        let mask = CollisionMask::new(id, Transform2D::new(position, size, rotation), self.anchor);
        if mask.is_degenerate() {
            debug!("Mask {id} has no extent and will never collide");
        }
        self.masks.insert(id, mask);
        self.refresh_mask(id);
        debug!("Created collision mask {id}");
        Ok(())
    }

    pub fn destroy_mask(&mut self, id: BodyId) -> Result<()> {
        let mask = self.masks.remove(&id).ok_or(PhysicsError::UnknownId(id))?;
        self.grid.remove(id, &mask.occupied_cells);
        debug!("Destroyed collision mask {id}");
        Ok(())
    }

    /// Stores a new transform and recomputes the mask's geometry. Grid
    /// placement is refreshed when `id` is next passed as updated to
    /// [`Self::check_collisions`].
    pub fn set_transform(&mut self, id: BodyId, transform: Transform2D) -> Result<()> {
        let mask = self.masks.get_mut(&id).ok_or(PhysicsError::UnknownId(id))?;
        mask.transform = transform;
        mask.recompute_geometry(self.anchor);
        Ok(())
    }

    pub fn set_mask_group(&mut self, id: BodyId, group: &str) -> Result<GroupId> {
        let group = self.groups.require(group)?;
        let mask = self.masks.get_mut(&id).ok_or(PhysicsError::UnknownId(id))?;
        mask.group = group;
        Ok(group)
    }

    pub fn mask(&self, id: BodyId) -> Option<&CollisionMask> {
        self.masks.get(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.masks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.masks.keys().copied()
    }

    /// Recomputes geometry and moves the mask to the cells its bounds touch.
    fn refresh_mask(&mut self, id: BodyId) -> bool {
        let Some(mask) = self.masks.get_mut(&id) else {
            return false;
        };

        self.grid.remove(id, &mask.occupied_cells);
        mask.recompute_geometry(self.anchor);
        mask.occupied_cells = match mask.bounds() {
            Some(bounds) => self.grid.insert(id, &bounds),
            None => Vec::new(),
        };
        true
    }

    /// Re-places every mask in `updated`, then tests each of them against
    /// the masks sharing a grid cell. Both masks of a reported pair must be
    /// in `valid`. Masks not in `updated` keep their previous placement.
    pub fn check_collisions(
        &mut self,
        valid: &HashSet<BodyId>,
        updated: &[BodyId],
    ) -> Vec<CollisionResult> {
        let _timer = ScopedTimer::new("collision check");
        let mut stats = CheckStats::default();

        let candidates = {
            let _phase = PhaseTimer::new(&mut stats.broad_phase_time);
            stats.pruned_cells = self.grid.prune_empty();

            for &id in updated {
                if self.refresh_mask(id) {
                    stats.refreshed_masks += 1;
                } else {
                    debug!("Skipping unknown mask {id} in collision check");
                }
            }

            self.gather_candidates(valid, updated)
        };
        stats.candidate_pairs = candidates.len();

        let results = {
            let _phase = PhaseTimer::new(&mut stats.narrow_phase_time);
            self.narrow_phase(&candidates)
        };
        stats.contacts = results.len();

        trace!(
            "collision check: {} refreshed, {} candidates, {} contacts",
            stats.refreshed_masks,
            stats.candidate_pairs,
            stats.contacts
        );
        self.last_stats = stats;
        results
    }

    fn gather_candidates(&self, valid: &HashSet<BodyId>, updated: &[BodyId]) -> Vec<BodyPair> {
        let mut checked = HashSet::new();
        let mut candidates = Vec::new();

        for id in updated {
            if !valid.contains(id) {
                continue;
            }
            let Some(mask) = self.masks.get(id) else {
                continue;
            };

            for &cell in mask.occupied_cells() {
                for &other in self.grid.occupants(cell) {
                    if other == *id || !valid.contains(&other) {
                        continue;
                    }

                    let pair = BodyPair::new(*id, other);
                    if !checked.insert(pair) {
                        continue;
                    }

                    let Some(other_mask) = self.masks.get(&other) else {
                        continue;
                    };
                    if self.groups.is_collidable(mask.group, other_mask.group) {
                        candidates.push(pair);
                    }
                }
            }
        }

        candidates
    }

    fn test_pair(&self, pair: BodyPair) -> Option<CollisionResult> {
        let first = self.masks.get(&pair.first())?;
        let second = self.masks.get(&pair.second())?;

        SATAlgorithm::intersect_masks(first, second).map(|contact| CollisionResult {
            pair,
            penetration: contact.depth,
            normal: contact.normal,
            contact_point: contact.point,
        })
    }

    #[cfg(feature = "parallel")]
    fn narrow_phase(&self, candidates: &[BodyPair]) -> Vec<CollisionResult> {
        if self.parallel_enabled {
            candidates
                .par_iter()
                .filter_map(|pair| self.test_pair(*pair))
                .collect()
        } else {
            candidates.iter().filter_map(|pair| self.test_pair(*pair)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn narrow_phase(&self, candidates: &[BodyPair]) -> Vec<CollisionResult> {
        candidates.iter().filter_map(|pair| self.test_pair(*pair)).collect()
    }
}

impl Default for CollisionSolver {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
