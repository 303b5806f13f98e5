//! Configuration for the sampling strategies. Every field has a default, so partial JSON
//! documents are accepted and fill in the rest.

use crate::{Result, SampleError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The downsampling strategy to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep every Nth point in input order
    Simple,

    /// Weighted random selection favoring points in locally rough regions
    Importance,

    /// Evenly spaced selection with a minimum XY separation between chosen points
    Poisson,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Simple => "simple",
            Strategy::Importance => "importance",
            Strategy::Poisson => "poisson",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Strategy {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Strategy::Simple),
            "importance" => Ok(Strategy::Importance),
            "poisson" => Ok(Strategy::Poisson),
            other => Err(SampleError::InvalidOptions(format!(
                "unknown sampling strategy '{}'",
                other
            ))),
        }
    }
}

/// Which neighbor search the importance scorer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborMethod {
    /// Approximate neighbors from the 3x3 window of a uniform grid
    #[default]
    Grid,

    /// Exact nearest neighbors from a k-d tree
    KdTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceOptions {
    /// Number of nearest neighbors used to measure local Z variation
    pub k: usize,

    /// Number of grid cells along each axis of the neighbor search grid
    pub grid_resolution: usize,

    /// Exponent applied to the shifted score; larger values favor rough regions more strongly
    pub exponent: f64,

    /// Offset added to every score before weighting so that no point has zero probability
    pub epsilon: f64,

    /// When the target is at least this fraction of the input, the highest weighted points are
    /// taken directly instead of drawing at random
    pub greedy_fraction: f64,

    /// Random draws allowed per requested point before falling back to a deterministic top-up
    pub attempts_per_target: usize,

    pub neighbor_search: NeighborMethod,
}

impl Default for ImportanceOptions {
    fn default() -> Self {
        Self {
            k: 12,
            grid_resolution: 50,
            exponent: 2.0,
            epsilon: 0.001,
            greedy_fraction: 0.8,
            attempts_per_target: 20,
            neighbor_search: NeighborMethod::Grid,
        }
    }
}

impl ImportanceOptions {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return invalid("importance k must be at least 1");
        }
        if self.grid_resolution == 0 {
            return invalid("importance grid_resolution must be at least 1");
        }
        if !self.exponent.is_finite() {
            return invalid("importance exponent must be finite");
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return invalid("importance epsilon must be positive and finite");
        }
        if !(self.greedy_fraction > 0.0 && self.greedy_fraction <= 1.0) {
            return invalid("importance greedy_fraction must be in (0, 1]");
        }
        if self.attempts_per_target == 0 {
            return invalid("importance attempts_per_target must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonOptions {
    /// Candidate positions generated around an active point before it is retired
    pub max_attempts: usize,

    /// Scale applied to the minimum spacing estimated from the area and target count
    pub distance_multiplier: f64,
}

impl Default for PoissonOptions {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            distance_multiplier: 1.0,
        }
    }
}

impl PoissonOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return invalid("poisson max_attempts must be at least 1");
        }
        if !(self.distance_multiplier > 0.0 && self.distance_multiplier.is_finite()) {
            return invalid("poisson distance_multiplier must be positive and finite");
        }
        Ok(())
    }
}

/// Options for all strategies. Only the section matching the chosen strategy is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    pub importance: ImportanceOptions,
    pub poisson: PoissonOptions,
}

impl SamplingOptions {
    /// Parse options from a JSON document, filling unspecified fields with their defaults. The
    /// parsed options are validated before being returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use pcsample::SamplingOptions;
    /// let options = SamplingOptions::from_json(r#"{"poisson": {"max_attempts": 10}}"#).unwrap();
    /// assert_eq!(options.poisson.max_attempts, 10);
    /// assert_eq!(options.importance.k, 12);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)
            .map_err(|e| SampleError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options used by `strategy`.
    pub fn validate_for(&self, strategy: Strategy) -> Result<()> {
        match strategy {
            Strategy::Simple => Ok(()),
            Strategy::Importance => self.importance.validate(),
            Strategy::Poisson => self.poisson.validate(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.importance.validate()?;
        self.poisson.validate()
    }
}

fn invalid(message: &str) -> Result<()> {
    Err(SampleError::InvalidOptions(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("simple", Strategy::Simple)]
    #[test_case("Importance", Strategy::Importance)]
    #[test_case(" poisson ", Strategy::Poisson)]
    fn parse_strategy(text: &str, expected: Strategy) {
        assert_eq!(text.parse::<Strategy>().unwrap(), expected);
    }

    #[test]
    fn parse_unknown_strategy() {
        assert!(matches!(
            "voxel".parse::<Strategy>(),
            Err(SampleError::InvalidOptions(_))
        ));
    }

    #[test]
    fn strategy_display_round_trips() {
        for s in [Strategy::Simple, Strategy::Importance, Strategy::Poisson] {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
    }

    #[test]
    fn defaults() {
        let options = SamplingOptions::default();
        assert_eq!(options.importance.k, 12);
        assert_eq!(options.importance.grid_resolution, 50);
        assert_eq!(options.importance.exponent, 2.0);
        assert_eq!(options.importance.epsilon, 0.001);
        assert_eq!(options.poisson.max_attempts, 30);
        assert_eq!(options.poisson.distance_multiplier, 1.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options =
            SamplingOptions::from_json(r#"{"importance": {"k": 8, "neighbor_search": "kdtree"}}"#)
                .unwrap();
        assert_eq!(options.importance.k, 8);
        assert_eq!(options.importance.neighbor_search, NeighborMethod::KdTree);
        assert_eq!(options.importance.grid_resolution, 50);
        assert_eq!(options.poisson, PoissonOptions::default());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(
            SamplingOptions::from_json("{}").unwrap(),
            SamplingOptions::default()
        );
    }

    #[test_case(r#"{"importance": {"k": 0}}"#)]
    #[test_case(r#"{"importance": {"epsilon": 0.0}}"#)]
    #[test_case(r#"{"importance": {"greedy_fraction": 1.5}}"#)]
    #[test_case(r#"{"poisson": {"distance_multiplier": -1.0}}"#)]
    #[test_case(r#"{"poisson": {"max_attempts": 0}}"#)]
    #[test_case(r#"{"poisson": "#)]
    fn rejects_bad_json(text: &str) {
        assert!(matches!(
            SamplingOptions::from_json(text),
            Err(SampleError::InvalidOptions(_))
        ));
    }

    #[test]
    fn simple_ignores_other_sections() {
        let mut options = SamplingOptions::default();
        options.poisson.max_attempts = 0;
        assert!(options.validate_for(Strategy::Simple).is_ok());
        assert!(options.validate_for(Strategy::Poisson).is_err());
    }
}
