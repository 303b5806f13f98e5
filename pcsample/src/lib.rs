//! Downsampling of large point clouds to a target number of representative points.
//!
//! Three strategies are available through [`sample`]: stride decimation, importance sampling
//! weighted by local surface roughness, and Poisson-disk selection of existing points. All of
//! them return a subset of the input, never synthesized coordinates.

pub mod background;
pub mod common;
mod errors;
pub mod index;
pub mod sampling;

pub use parry3d_f64::na;

pub type Point2 = na::Point2<f64>;
pub type Point3 = na::Point3<f64>;
pub type Vector2 = na::Vector2<f64>;

pub type Aabb2 = parry2d_f64::bounding_volume::Aabb;

pub use background::{SampleHandle, spawn_sample};
pub use common::{CancelToken, IndexMask};
pub use errors::SampleError;
pub use index::{KdNeighbors, NeighborSearch, SpatialGrid};
pub use sampling::{
    ImportanceOptions, NeighborMethod, PoissonOptions, SamplingOptions, Strategy, sample,
    sample_indices, sample_with_cancel,
};

pub type Result<T> = std::result::Result<T, SampleError>;
