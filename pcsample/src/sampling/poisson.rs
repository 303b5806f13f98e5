//! Poisson-disk selection of existing points.
//!
//! This follows Bridson's active-list expansion, except that every synthetic candidate position
//! is snapped to the nearest real input point before it is accepted, so the output is always a
//! subset of the input. Spacing is measured in XY only; the points are treated as elevation
//! samples over a plane.

use crate::common::{CancelToken, bounds2};
use crate::index::SpatialGrid;
use crate::sampling::PoissonOptions;
use crate::{Aabb2, Point2, Point3, Result, Vector2};
use itertools::Itertools;
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::{PI, SQRT_2, TAU};
use tracing::{debug, trace};

/// The smallest spacing the sampler will use, regardless of how degenerate the bounds are.
const MIN_SPACING: f64 = 1.0e-9;

/// Estimate the spacing that packs roughly `target` disks into the area of `bounds`,
/// `sqrt(area / (target * PI)) * multiplier`.
///
/// The area is floored at `longest^2 / target`, where `longest` is the larger side of the box.
/// This only takes effect for boxes thinner than about `longest / target`, which are treated as
/// a strip along their long side so that a zero-area box (a single scan line) still gets a
/// spacing proportional to its length instead of a vanishing one.
///
/// # Examples
///
/// ```
/// use pcsample::sampling::poisson::poisson_min_distance;
/// use pcsample::{Aabb2, Point2};
/// let bounds = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
/// let d = poisson_min_distance(&bounds, 100, 1.0);
/// assert!((d - (1.0 / std::f64::consts::PI).sqrt()).abs() < 1e-12);
/// ```
pub fn poisson_min_distance(bounds: &Aabb2, target: usize, multiplier: f64) -> f64 {
    let extents = bounds.extents();
    let target = target.max(1) as f64;
    let longest = extents.x.max(extents.y);
    let area = (extents.x * extents.y)
        .max(longest * longest / target)
        .max(f64::EPSILON);
    let d = (area / (target * PI)).sqrt() * multiplier;
    d.max(MIN_SPACING)
}

/// The accepted sample indices, at most one per cell. With a cell side of `d / sqrt(2)` any two
/// points closer than `d` are within two cells of each other. Only occupied cells are stored, so
/// the memory used follows the number of accepted points rather than the extent of the bounds.
struct AcceptanceGrid {
    origin: Point2,
    cell: f64,
    cells: HashMap<(i64, i64), usize>,
}

impl AcceptanceGrid {
    fn new(bounds: &Aabb2, cell: f64) -> Self {
        Self {
            origin: bounds.mins,
            cell,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: &Point2) -> (i64, i64) {
        (
            ((p.x - self.origin.x) / self.cell).floor() as i64,
            ((p.y - self.origin.y) / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, p: &Point2, index: usize) {
        let key = self.cell_of(p);
        self.cells.insert(key, index);
    }

    /// True if no accepted point in the 5x5 cell neighborhood of `p` lies closer than
    /// `min_distance`.
    fn is_clear(&self, p: &Point2, points: &[Point3], min_distance: f64) -> bool {
        let (cx, cy) = self.cell_of(p);
        let threshold = min_distance * min_distance;

        (-2..=2)
            .cartesian_product(-2..=2)
            .filter_map(|(dx, dy)| self.cells.get(&(cx + dx, cy + dy)))
            .all(|&i| (points[i].xy() - p).norm_squared() >= threshold)
    }
}

/// Select up to `target` evenly spaced input points, returning their indices in acceptance order.
///
/// The minimum spacing is derived with [`poisson_min_distance`] from the XY bounds of the points.
/// Sampling starts from one random point and expands from a randomly chosen active point by
/// generating up to `max_attempts` candidates at distance `[d, 2d]`. A candidate inside the bounds
/// (widened along any axis narrower than `d`) whose neighborhood is clear is resolved to the
/// nearest real point, which is accepted if it also keeps its distance from every accepted point.
/// An active point that yields nothing within its attempts is retired. The loop ends when the
/// active list empties or `target` points have been accepted, and may therefore return fewer than
/// `target` indices.
///
/// The cancellation token is polled once per active point visited.
///
/// # Arguments
///
/// * `points`: the input points, which must not be empty
/// * `target`: the maximum number of indices to return
/// * `options`: attempt count and spacing multiplier
/// * `rng`: the random source for the seed, active point picks, and candidate offsets
/// * `cancel`: the token checked during expansion
///
/// returns: Result<Vec<usize>, SampleError>
pub fn poisson_disk_sample<R>(
    points: &[Point3],
    target: usize,
    options: &PoissonOptions,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    let Some(bounds) = bounds2(points) else {
        return Ok(Vec::new());
    };
    if target == 0 {
        return Ok(Vec::new());
    }

    let min_distance = poisson_min_distance(&bounds, target, options.distance_multiplier);
    let cell = min_distance / SQRT_2;
    let mut accepted = AcceptanceGrid::new(&bounds, cell);
    let region = candidate_region(&bounds, min_distance);

    // Built on first use, then reused for the rest of this call
    let mut lookup: Option<SpatialGrid> = None;

    let seed = rng.random_range(0..points.len());
    let mut selected = vec![seed];
    let mut active = vec![seed];
    accepted.insert(&points[seed].xy(), seed);

    let mut retired = 0;
    while !active.is_empty() && selected.len() < target {
        cancel.check()?;

        let pick = rng.random_range(0..active.len());
        let base = points[active[pick]].xy();
        let mut found = None;

        for _ in 0..options.max_attempts {
            let angle = rng.random::<f64>() * TAU;
            let radius = min_distance * (1.0 + rng.random::<f64>());
            let candidate = base + Vector2::new(angle.cos(), angle.sin()) * radius;

            if !contains(&region, &candidate)
                || !accepted.is_clear(&candidate, points, min_distance)
            {
                continue;
            }

            let grid = lookup
                .get_or_insert_with(|| SpatialGrid::with_cell_size(points, &bounds, cell));
            let Some(nearest) = grid.nearest_within(candidate.x, candidate.y, 1) else {
                continue;
            };

            if accepted.is_clear(&points[nearest].xy(), points, min_distance) {
                found = Some(nearest);
                break;
            }
        }

        match found {
            Some(i) => {
                accepted.insert(&points[i].xy(), i);
                selected.push(i);
                active.push(i);
            }
            None => {
                trace!(index = active[pick], "retiring active point");
                active.swap_remove(pick);
                retired += 1;
            }
        }
    }

    debug!(
        selected = selected.len(),
        target_count = target,
        retired,
        min_distance,
        "poisson disk selection complete"
    );
    Ok(selected)
}

/// The area candidates may fall in: the bounds, with any axis narrower than `min_distance`
/// widened by `min_distance` on both sides.
fn candidate_region(bounds: &Aabb2, min_distance: f64) -> Aabb2 {
    let extents = bounds.extents();
    let pad = |extent: f64| if extent < min_distance { min_distance } else { 0.0 };
    let margin = Vector2::new(pad(extents.x), pad(extents.y));
    Aabb2::new(bounds.mins - margin, bounds.maxs + margin)
}

fn contains(bounds: &Aabb2, p: &Point2) -> bool {
    p.x >= bounds.mins.x && p.x <= bounds.maxs.x && p.y >= bounds.mins.y && p.y <= bounds.maxs.y
}
