//! Duplicate-free weighted selection of indices by inverting a cumulative distribution.

use crate::common::{CancelToken, IndexMask};
use crate::sampling::ImportanceOptions;
use crate::Result;
use rand::Rng;
use tracing::{debug, warn};

/// Turn normalized scores into selection weights, `(s + epsilon) ^ exponent`.
pub fn score_weights(scores: &[f64], epsilon: f64, exponent: f64) -> Vec<f64> {
    scores.iter().map(|s| (s + epsilon).powf(exponent)).collect()
}

/// The running sum of the weights divided by their total, so the last entry is 1.0 (up to
/// rounding) and entry `i` is the probability of drawing an index `<= i`.
pub fn cumulative_distribution(weights: &[f64]) -> Vec<f64> {
    let total = weights.iter().sum::<f64>();
    let mut running = 0.0;
    weights
        .iter()
        .map(|w| {
            running += w;
            running / total
        })
        .collect()
}

/// Find the first index whose cumulative probability is at least `r`. Rounding can leave the last
/// entry slightly below 1.0, in which case the last index is returned.
pub fn invert_cdf(cumulative: &[f64], r: f64) -> usize {
    cumulative
        .partition_point(|&c| c < r)
        .min(cumulative.len().saturating_sub(1))
}

/// Select up to `target` distinct indices with probability proportional to their weight.
///
/// When `target` is at least `greedy_fraction` of the number of scores the `target` highest
/// weighted indices are returned directly, since rejection sampling slows badly as the selection
/// nears saturation. Otherwise indices are drawn by inverse-CDF sampling, with up to
/// `target * attempts_per_target` draws; duplicates are rejected. If the draws run out first the
/// remaining slots are filled with the highest weighted unselected indices.
///
/// The cancellation token is polled once per draw.
///
/// # Arguments
///
/// * `scores`: normalized per-point scores in [0, 1]
/// * `target`: the number of indices to select
/// * `options`: the weighting and attempt parameters
/// * `rng`: the random source for the draws
/// * `cancel`: the token checked during the draw loop
///
/// returns: Result<Vec<usize>, SampleError>
pub fn weighted_sample<R>(
    scores: &[f64],
    target: usize,
    options: &ImportanceOptions,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    let n = scores.len();
    let target = target.min(n);
    let weights = score_weights(scores, options.epsilon, options.exponent);

    if target as f64 >= options.greedy_fraction * n as f64 {
        debug!(target_count = target, n, "weighted selection using greedy top weights");
        let mut ranked = by_descending_weight(&weights);
        ranked.truncate(target);
        return Ok(ranked);
    }

    let cumulative = cumulative_distribution(&weights);
    let mut chosen = IndexMask::new(n);
    let mut selected = Vec::with_capacity(target);
    let max_attempts = target.saturating_mul(options.attempts_per_target);

    let mut attempts = 0;
    while attempts < max_attempts && chosen.count() < target {
        cancel.check()?;
        attempts += 1;

        let i = invert_cdf(&cumulative, rng.random::<f64>());
        if chosen.insert(i) {
            selected.push(i);
        }
    }

    if chosen.count() < target {
        warn!(
            drawn = selected.len(),
            target_count = target,
            attempts,
            "weighted draws exhausted, filling from top weights"
        );
        for i in by_descending_weight(&weights) {
            if chosen.count() >= target {
                break;
            }
            if chosen.insert(i) {
                selected.push(i);
            }
        }
    }

    debug!(selected = selected.len(), attempts, "weighted selection complete");
    Ok(selected)
}

/// All indices ordered from highest to lowest weight, ties broken by the lower index.
fn by_descending_weight(weights: &[f64]) -> Vec<usize> {
    let mut order = (0..weights.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test]
    fn weights_follow_formula() {
        let w = score_weights(&[0.0, 1.0], 0.001, 2.0);
        assert_relative_eq!(w[0], 1.0e-6);
        assert_relative_eq!(w[1], 1.001 * 1.001);
    }

    #[test]
    fn cumulative_ends_at_one() {
        let c = cumulative_distribution(&[1.0, 2.0, 1.0]);
        assert_relative_eq!(c[0], 0.25);
        assert_relative_eq!(c[1], 0.75);
        assert_relative_eq!(c[2], 1.0);
    }

    #[test_case(0.0, 0)]
    #[test_case(0.25, 0)]
    #[test_case(0.26, 1)]
    #[test_case(0.75, 1)]
    #[test_case(0.9, 2)]
    #[test_case(1.5, 2)]
    fn inversion_finds_first_at_or_above(r: f64, expected: usize) {
        let c = vec![0.25, 0.75, 1.0];
        assert_eq!(invert_cdf(&c, r), expected);
    }

    #[test]
    fn dominant_score_is_drawn() {
        let mut rng = StdRng::seed_from_u64(11);
        let scores = vec![0.0, 0.0, 0.0, 1.0];
        let options = ImportanceOptions::default();
        let picked = weighted_sample(&scores, 1, &options, &mut rng, &CancelToken::new()).unwrap();
        assert_eq!(picked, vec![3]);
    }

    #[test]
    fn result_is_distinct_and_sized() {
        let mut rng = StdRng::seed_from_u64(3);
        let scores = (0..1000).map(|i| (i % 17) as f64 / 16.0).collect::<Vec<_>>();
        let options = ImportanceOptions::default();
        let picked =
            weighted_sample(&scores, 200, &options, &mut rng, &CancelToken::new()).unwrap();

        assert_eq!(picked.len(), 200);
        let unique = picked.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 200);
        assert!(picked.iter().all(|&i| i < scores.len()));
    }

    #[test]
    fn exhausted_draws_top_up_by_weight() {
        // One dominant point and one runner-up; the draws keep landing on the dominant point, so
        // the second slot is filled from the ranking.
        let mut scores = vec![0.0; 10];
        scores[9] = 1.0;
        scores[4] = 0.01;
        let options = ImportanceOptions {
            attempts_per_target: 1,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut picked =
            weighted_sample(&scores, 2, &options, &mut rng, &CancelToken::new()).unwrap();
        picked.sort();
        assert_eq!(picked, vec![4, 9]);
    }

    #[test]
    fn near_exhaustive_target_is_greedy() {
        let scores = vec![0.5, 0.1, 0.9, 0.0, 0.3];
        let options = ImportanceOptions::default();
        let mut rng = StdRng::seed_from_u64(0);
        let picked = weighted_sample(&scores, 4, &options, &mut rng, &CancelToken::new()).unwrap();
        assert_eq!(picked, vec![2, 0, 4, 1]);
    }

    #[test]
    fn greedy_ties_prefer_lower_index() {
        let scores = vec![0.0; 5];
        let options = ImportanceOptions::default();
        let mut rng = StdRng::seed_from_u64(0);
        let picked = weighted_sample(&scores, 4, &options, &mut rng, &CancelToken::new()).unwrap();
        assert_eq!(picked, vec![0, 1, 2, 3]);
    }

    #[test]
    fn cancelled_token_stops_draws() {
        let token = CancelToken::new();
        token.cancel();
        let scores = vec![0.5; 100];
        let mut rng = StdRng::seed_from_u64(0);
        let result = weighted_sample(&scores, 10, &ImportanceOptions::default(), &mut rng, &token);
        assert_eq!(result, Err(crate::SampleError::Cancelled));
    }
}
