//! Scoring configuration and its named constants

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{CompareError, Result};

/// Minimum detector confidence a keypoint must exceed to be compared
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Number of aligned slots both sequences are resampled to
pub const DEFAULT_SAMPLE_COUNT: usize = 30;

/// Upper bound on aligned slots
pub const MAX_SAMPLE_COUNT: usize = 10_000;

/// Converts an average normalized joint distance into score points.
///
/// `score = 100 - avg_distance * scale`. With 1000, joints that are off by
/// 1% of the frame on average score 90 and an average error of 10% of the
/// frame scores 0.
pub const DEFAULT_SCORE_SCALE: f64 = 1000.0;

pub const ENV_CONFIDENCE_THRESHOLD: &str = "DANCE_MATCH_CONFIDENCE_THRESHOLD";
pub const ENV_SAMPLE_COUNT: &str = "DANCE_MATCH_SAMPLE_COUNT";
pub const ENV_SCORE_SCALE: &str = "DANCE_MATCH_SCORE_SCALE";
pub const ENV_ALIGNMENT: &str = "DANCE_MATCH_ALIGNMENT";

/// How a sequence is mapped onto the aligned slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMethod {
    /// Take the source frame nearest to the slot's time fraction
    Nearest,
    /// Interpolate between the two neighbouring source frames
    #[default]
    Linear,
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for AlignmentMethod {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            other => Err(CompareError::InvalidConfig(format!(
                "unknown alignment method '{}' (expected 'nearest' or 'linear')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    #[serde(default = "default_score_scale")]
    pub score_scale: f64,

    #[serde(default)]
    pub alignment: AlignmentMethod,

    #[serde(default = "default_true")]
    pub per_frame_breakdown: bool,
}

// Default value functions
fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_score_scale() -> f64 {
    DEFAULT_SCORE_SCALE
}

fn default_true() -> bool {
    true
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            sample_count: default_sample_count(),
            score_scale: default_score_scale(),
            alignment: AlignmentMethod::default(),
            per_frame_breakdown: default_true(),
        }
    }
}

impl ScoringConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Set the confidence threshold
    ///
    /// Range: 0.0 - 1.0
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the number of aligned samples
    ///
    /// Range: 2 - `MAX_SAMPLE_COUNT`
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count.clamp(2, MAX_SAMPLE_COUNT);
        self
    }

    /// Set the score scale; non-finite or non-positive values are ignored
    pub fn with_score_scale(mut self, score_scale: f64) -> Self {
        if score_scale.is_finite() && score_scale > 0.0 {
            self.score_scale = score_scale;
        }
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentMethod) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_per_frame_breakdown(mut self, enabled: bool) -> Self {
        self.per_frame_breakdown = enabled;
        self
    }

    /// Apply `DANCE_MATCH_*` variables from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`, then validate
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CONFIDENCE_THRESHOLD) {
            self.confidence_threshold = parse_override(ENV_CONFIDENCE_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_SAMPLE_COUNT) {
            self.sample_count = parse_override(ENV_SAMPLE_COUNT, &value)?;
        }
        if let Some(value) = lookup(ENV_SCORE_SCALE) {
            self.score_scale = parse_override(ENV_SCORE_SCALE, &value)?;
        }
        if let Some(value) = lookup(ENV_ALIGNMENT) {
            self.alignment = value.parse()?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that every value is usable for scoring
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(CompareError::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if !(2..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(CompareError::InvalidConfig(format!(
                "sample_count must be within [2, {}], got {}",
                MAX_SAMPLE_COUNT, self.sample_count
            )));
        }
        if !self.score_scale.is_finite() || self.score_scale <= 0.0 {
            return Err(CompareError::InvalidConfig(format!(
                "score_scale must be a positive number, got {}",
                self.score_scale
            )));
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CompareError::InvalidConfig(format!("{} has an invalid value '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.confidence_threshold, 0.3);
        assert_eq!(config.sample_count, 30);
        assert_eq!(config.score_scale, 1000.0);
        assert_eq!(config.alignment, AlignmentMethod::Linear);
        assert!(config.per_frame_breakdown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_clamps() {
        let config = ScoringConfig::default()
            .with_confidence_threshold(1.7)
            .with_sample_count(0);
        assert_eq!(config.confidence_threshold, 1.0);
        assert_eq!(config.sample_count, 2);

        let config = ScoringConfig::default()
            .with_sample_count(usize::MAX)
            .with_score_scale(f64::NAN);
        assert_eq!(config.sample_count, MAX_SAMPLE_COUNT);
        assert_eq!(config.score_scale, DEFAULT_SCORE_SCALE);
        assert!(config.validate().is_ok());

        let config = ScoringConfig::default().with_score_scale(-5.0);
        assert_eq!(config.score_scale, DEFAULT_SCORE_SCALE);
    }

    #[test]
    fn test_overrides_applied() {
        let config = ScoringConfig::default()
            .with_overrides_from(lookup_from(&[
                (ENV_CONFIDENCE_THRESHOLD, "0.5"),
                (ENV_SAMPLE_COUNT, "60"),
                (ENV_SCORE_SCALE, "500"),
                (ENV_ALIGNMENT, "Nearest"),
            ]))
            .unwrap();

        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.sample_count, 60);
        assert_eq!(config.score_scale, 500.0);
        assert_eq!(config.alignment, AlignmentMethod::Nearest);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let cases = [
            (ENV_SAMPLE_COUNT, "many"),
            (ENV_SAMPLE_COUNT, "1"),
            (ENV_SAMPLE_COUNT, "10001"),
            (ENV_SAMPLE_COUNT, "18446744073709551615"),
            (ENV_SCORE_SCALE, "-3"),
            (ENV_SCORE_SCALE, "NaN"),
            (ENV_CONFIDENCE_THRESHOLD, "1.5"),
            (ENV_ALIGNMENT, "dtw"),
        ];

        for (key, value) in cases {
            assert_matches!(
                ScoringConfig::default().with_overrides_from(lookup_from(&[(key, value)])),
                Err(CompareError::InvalidConfig(_)),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"sample_count": 45}"#).unwrap();
        assert_eq!(config.sample_count, 45);
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.alignment, AlignmentMethod::Linear);
    }
}
