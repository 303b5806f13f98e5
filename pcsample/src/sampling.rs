//! The sampling entry points, which validate a request, apply the identity fast path, and
//! dispatch to one of the strategies.

pub mod decimate;
pub mod importance;
mod options;
pub mod poisson;
pub mod weighted;

pub use options::{ImportanceOptions, NeighborMethod, PoissonOptions, SamplingOptions, Strategy};

use crate::common::CancelToken;
use crate::{Point3, Result, SampleError};
use rand::Rng;
use tracing::{debug, instrument};

/// Reduce `points` to at most `target` representative points using `strategy`.
///
/// If there are no more points than `target` the input is returned unchanged. Otherwise the
/// result is a subset of the input, in input order for [`Strategy::Simple`] and in selection
/// order for the randomized strategies. Strategies may return fewer than `target` points when the
/// data does not allow more, which is not an error.
///
/// # Arguments
///
/// * `points`: the input points, must not be empty
/// * `target`: the maximum number of points to return, must be greater than zero
/// * `strategy`: the selection strategy
/// * `options`: strategy parameters; only the section for `strategy` is used
/// * `rng`: the random source used by the randomized strategies
///
/// returns: Result<Vec<Point3>, SampleError>
///
/// # Examples
///
/// ```
/// use pcsample::{sample, Point3, SamplingOptions, Strategy};
/// use rand::SeedableRng;
/// let points = (0..100).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect::<Vec<_>>();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let reduced = sample(&points, 10, Strategy::Simple, &SamplingOptions::default(), &mut rng).unwrap();
/// assert_eq!(reduced.len(), 10);
/// assert_eq!(reduced[1], Point3::new(10.0, 0.0, 0.0));
/// ```
pub fn sample<R>(
    points: &[Point3],
    target: usize,
    strategy: Strategy,
    options: &SamplingOptions,
    rng: &mut R,
) -> Result<Vec<Point3>>
where
    R: Rng + ?Sized,
{
    sample_with_cancel(points, target, strategy, options, rng, &CancelToken::new())
}

/// The same as [`sample`], but stops with [`SampleError::Cancelled`] once `cancel` is tripped or
/// its deadline passes.
pub fn sample_with_cancel<R>(
    points: &[Point3],
    target: usize,
    strategy: Strategy,
    options: &SamplingOptions,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<Point3>>
where
    R: Rng + ?Sized,
{
    let indices = sample_indices(points, target, strategy, options, rng, cancel)?;
    Ok(indices.into_iter().map(|i| points[i]).collect())
}

/// Perform the selection and return the indices of the chosen points rather than the points
/// themselves. On the identity path this is every index in order.
#[instrument(skip_all, fields(n = points.len(), target_count = target, strategy = %strategy))]
pub fn sample_indices<R>(
    points: &[Point3],
    target: usize,
    strategy: Strategy,
    options: &SamplingOptions,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    if target == 0 {
        return Err(SampleError::InvalidTargetCount);
    }
    if points.is_empty() {
        return Err(SampleError::EmptyInput);
    }
    options.validate_for(strategy)?;

    if points.len() <= target {
        debug!("input already within target, returning unchanged");
        return Ok((0..points.len()).collect());
    }

    let selected = match strategy {
        Strategy::Simple => decimate::decimate(points.len(), target),
        Strategy::Importance => {
            let scores = importance::score_points(points, &options.importance);
            weighted::weighted_sample(&scores, target, &options.importance, rng, cancel)?
        }
        Strategy::Poisson => {
            poisson::poisson_disk_sample(points, target, &options.poisson, rng, cancel)?
        }
    };

    debug!(selected = selected.len(), "sampling complete");
    Ok(selected)
}
