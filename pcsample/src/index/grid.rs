//! A uniform 2D bucket grid over the XY extent of a point set.

use super::NeighborSearch;
use crate::common::bounds2;
use crate::{Aabb2, Point2, Point3};
use std::collections::HashMap;

/// A uniform grid of rectangular cells covering the XY extent of a borrowed point set. Each
/// occupied cell holds the indices of the points that fall inside it. The Z coordinate plays no
/// part in the bucketing.
///
/// Used as a [`NeighborSearch`] the grid answers with the contents of the query point's cell and
/// its eight surrounding cells. This is only an approximation of a k-nearest-neighbor query:
/// when density varies strongly relative to the cell size, true neighbors outside the 3x3 window
/// are missed, and a dense cluster inside a single cell degrades the query toward `O(n)`.
pub struct SpatialGrid<'a> {
    points: &'a [Point3],
    origin: Point2,
    cell_size_x: f64,
    cell_size_y: f64,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl<'a> SpatialGrid<'a> {
    /// Build a grid which divides the XY bounding box of the points into `resolution` cells
    /// along each axis.
    ///
    /// # Arguments
    ///
    /// * `points`: the points to index
    /// * `resolution`: the number of cells along each axis, values below 1 are treated as 1
    ///
    /// returns: SpatialGrid
    pub fn with_resolution(points: &'a [Point3], resolution: usize) -> Self {
        let bounds = bounds2(points)
            .unwrap_or_else(|| Aabb2::new(Point2::origin(), Point2::origin()));
        let divisions = resolution.max(1) as f64;
        let extents = bounds.extents();

        Self::build(
            points,
            bounds.mins,
            axis_cell_size(extents.x / divisions),
            axis_cell_size(extents.y / divisions),
        )
    }

    /// Build a grid of square cells with side length `cell_size`, anchored at the minimum corner
    /// of `bounds`.
    pub fn with_cell_size(points: &'a [Point3], bounds: &Aabb2, cell_size: f64) -> Self {
        let cell = axis_cell_size(cell_size);
        Self::build(points, bounds.mins, cell, cell)
    }

    fn build(points: &'a [Point3], origin: Point2, cell_size_x: f64, cell_size_y: f64) -> Self {
        let mut grid = Self {
            points,
            origin,
            cell_size_x,
            cell_size_y,
            buckets: HashMap::new(),
        };

        for (i, p) in points.iter().enumerate() {
            let key = grid.cell_of(p.x, p.y);
            grid.buckets.entry(key).or_default().push(i);
        }

        grid
    }

    pub fn cell_size_x(&self) -> f64 {
        self.cell_size_x
    }

    pub fn cell_size_y(&self) -> f64 {
        self.cell_size_y
    }

    /// The number of cells which contain at least one point.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    /// The integer cell coordinates containing the XY position `(x, y)`.
    pub fn cell_of(&self, x: f64, y: f64) -> (i32, i32) {
        (
            ((x - self.origin.x) / self.cell_size_x).floor() as i32,
            ((y - self.origin.y) / self.cell_size_y).floor() as i32,
        )
    }

    /// Iterate over the indices of all points in the square window of `2 * radius + 1` cells
    /// centered on the cell containing `(x, y)`.
    pub fn indices_near(&self, x: f64, y: f64, radius: i32) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(x, y);
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius)
                .filter_map(move |dy| self.buckets.get(&(cx + dx, cy + dy)))
                .flatten()
                .copied()
        })
    }

    /// Find the indexed point closest in XY to `(x, y)` among the cells within `radius` cells
    /// of the position, or `None` if that window is empty.
    pub fn nearest_within(&self, x: f64, y: f64, radius: i32) -> Option<usize> {
        let target = Point2::new(x, y);
        self.indices_near(x, y, radius)
            .map(|i| (i, (self.points[i].xy() - target).norm_squared()))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

impl NeighborSearch for SpatialGrid<'_> {
    fn query_neighbors(&self, point: &Point3) -> Vec<usize> {
        self.indices_near(point.x, point.y, 1).collect()
    }
}

/// A degenerate (zero or non-finite) axis falls back to a unit cell so that every point on that
/// axis lands in cell zero.
fn axis_cell_size(size: f64) -> f64 {
    if size > 0.0 && size.is_finite() {
        size
    } else {
        1.0
    }
}
