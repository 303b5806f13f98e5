//! Spatial indices used to find the neighbors of a point.
//!
//! The samplers are written against [`NeighborSearch`], which hides whether neighbors are found
//! exactly or approximately. [`SpatialGrid`] is the default and deliberately approximate, while
//! [`KdNeighbors`] provides exact nearest neighbors at a higher build cost.

mod grid;
mod kd_neighbors;

pub use grid::SpatialGrid;
pub use kd_neighbors::KdNeighbors;

use crate::Point3;

/// A source of neighbor candidates for a query point.
pub trait NeighborSearch: Sync {
    /// Return the indices of the candidate neighbors of `point`. The result may include the
    /// index of `point` itself if it is part of the indexed set, and it is not required to be
    /// sorted or limited to any count; callers rank candidates by distance themselves.
    fn query_neighbors(&self, point: &Point3) -> Vec<usize>;
}
