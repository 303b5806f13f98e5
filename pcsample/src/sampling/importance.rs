//! Per-point roughness scores measured from the spread of Z among each point's nearest neighbors.

use crate::index::{KdNeighbors, NeighborSearch, SpatialGrid};
use crate::sampling::{ImportanceOptions, NeighborMethod};
use crate::Point3;
use itertools::Itertools;
use rayon::prelude::*;

/// Score every point with the neighbor search selected in `options`.
pub fn score_points(points: &[Point3], options: &ImportanceOptions) -> Vec<f64> {
    match options.neighbor_search {
        NeighborMethod::Grid => {
            let grid = SpatialGrid::with_resolution(points, options.grid_resolution);
            importance_scores(points, &grid, options.k)
        }
        NeighborMethod::KdTree => {
            let tree = KdNeighbors::new(points, options.k);
            importance_scores(points, &tree, options.k)
        }
    }
}

/// Compute a normalized roughness score in [0, 1] for each point.
///
/// The raw score of a point is the population standard deviation of Z over its `k` closest
/// candidates (by 3D distance) returned from `search`, excluding the point itself. Points with
/// fewer than two candidates score zero. Raw scores are then mapped linearly so that the global
/// minimum becomes 0 and the maximum becomes 1; if every raw score is the same, all scores are 0.
///
/// Points are scored in parallel. The result does not depend on the number of threads. The cost
/// is `O(n * c log c)` for an average of `c` candidates per query, so with the grid search it
/// grows toward `O(n^2)` when most points crowd into a few cells.
///
/// # Arguments
///
/// * `points`: the points to score
/// * `search`: the neighbor search built over the same `points`
/// * `k`: the maximum number of neighbors considered per point
///
/// returns: Vec<f64, Global>
pub fn importance_scores<S>(points: &[Point3], search: &S, k: usize) -> Vec<f64>
where
    S: NeighborSearch + ?Sized,
{
    let raw = (0..points.len())
        .into_par_iter()
        .map(|i| local_roughness(points, i, search, k))
        .collect::<Vec<_>>();

    normalize(raw)
}

fn local_roughness<S>(points: &[Point3], i: usize, search: &S, k: usize) -> f64
where
    S: NeighborSearch + ?Sized,
{
    let p = &points[i];
    let z_values = search
        .query_neighbors(p)
        .into_iter()
        .filter(|&j| j != i)
        .map(|j| ((points[j] - p).norm(), points[j].z))
        .sorted_by(|a, b| a.0.total_cmp(&b.0))
        .take(k)
        .map(|(_, z)| z)
        .collect::<Vec<_>>();

    if z_values.len() < 2 {
        return 0.0;
    }

    std_dev(&z_values)
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Min-max normalize the scores in place, using a linear fold for the extremes.
fn normalize(mut scores: Vec<f64>) -> Vec<f64> {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });

    let range = max - min;
    if range > 0.0 && range.is_finite() {
        for s in &mut scores {
            *s = (*s - min) / range;
        }
    } else {
        scores.fill(0.0);
    }

    scores
}
