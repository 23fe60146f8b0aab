use std::collections::HashMap;

use glam::Vec2;

use crate::core::types::BodyId;

/// Integer grid cell coordinate.
pub type GridCell = (i32, i32);

/// Upper bound on the cell list reserved up front by [`SpatialGrid::insert`].
const MAX_RESERVED_CELLS: usize = 1024;

/// Axis-aligned bounds in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), point| {
                (min.min(*point), max.max(*point))
            });
        Some(Self { min, max })
    }
}

/// Persistent uniform grid mapping cells to the bodies whose bounds touch them.
///
/// Bodies are moved incrementally: callers remove a body from its previous
/// cells before inserting it into its new ones. Buckets left empty by a
/// removal are kept until [`SpatialGrid::prune_empty`] runs.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    grid: HashMap<GridCell, Vec<BodyId>>,
    needs_cleanup: bool,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            grid: HashMap::new(),
            needs_cleanup: false,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn world_to_grid(&self, position: Vec2) -> GridCell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Inclusive min and max cells touched by `bounds`.
    pub fn cell_range(&self, bounds: &Aabb2) -> (GridCell, GridCell) {
        (self.world_to_grid(bounds.min), self.world_to_grid(bounds.max))
    }

    /// Number of cells in the inclusive range, saturating at `usize::MAX`.
    pub fn cell_count(min_cell: GridCell, max_cell: GridCell) -> usize {
        let span = |min: i32, max: i32| (i64::from(max) - i64::from(min) + 1).max(0) as u64;
        let count = span(min_cell.0, max_cell.0).saturating_mul(span(min_cell.1, max_cell.1));
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Adds `id` to every cell `bounds` touches and returns those cells.
    pub fn insert(&mut self, id: BodyId, bounds: &Aabb2) -> Vec<GridCell> {
        let (min_cell, max_cell) = self.cell_range(bounds);
        let mut cells =
            Vec::with_capacity(Self::cell_count(min_cell, max_cell).min(MAX_RESERVED_CELLS));

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                self.grid.entry((x, y)).or_default().push(id);
                cells.push((x, y));
            }
        }

        cells
    }

    /// Removes `id` from each of `cells`. Order inside a bucket is not kept.
    pub fn remove(&mut self, id: BodyId, cells: &[GridCell]) {
        for cell in cells {
            let Some(bucket) = self.grid.get_mut(cell) else {
                continue;
            };
            if let Some(index) = bucket.iter().position(|occupant| *occupant == id) {
                bucket.swap_remove(index);
            }
        }

        if !cells.is_empty() {
            self.needs_cleanup = true;
        }
    }

    /// Drops empty buckets if any removal happened since the last prune.
    pub fn prune_empty(&mut self) -> usize {
        if !self.needs_cleanup {
            return 0;
        }
        self.needs_cleanup = false;

        let before = self.grid.len();
        self.grid.retain(|_, bucket| !bucket.is_empty());
        before - self.grid.len()
    }

    pub fn occupants(&self, cell: GridCell) -> &[BodyId] {
        self.grid.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, cell: GridCell, id: BodyId) -> bool {
        self.occupants(cell).contains(&id)
    }

    /// Number of allocated buckets, including empty ones awaiting pruning.
    pub fn bucket_count(&self) -> usize {
        self.grid.len()
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.needs_cleanup = false;
    }
}
