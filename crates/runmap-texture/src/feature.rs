//! Run-length texture descriptors
//!
//! The fixed catalogue of scalar features derivable from a
//! [`RunLengthMatrix`]. With `p(i, j)` the number of runs in grey-level
//! bin `i` and run-length bin `j`, `I = i + 1`, `J = j + 1` and `N` the
//! total number of runs:
//!
//! | Feature | value |
//! |---|---|
//! | short run emphasis | Σ p / J² / N |
//! | long run emphasis | Σ p · J² / N |
//! | grey-level non-uniformity | Σᵢ (Σⱼ p)² / N |
//! | run-length non-uniformity | Σⱼ (Σᵢ p)² / N |
//! | low grey-level run emphasis | Σ p / I² / N |
//! | high grey-level run emphasis | Σ p · I² / N |
//! | short run low grey-level emphasis | Σ p / (I² J²) / N |
//! | short run high grey-level emphasis | Σ p · I² / J² / N |
//! | long run low grey-level emphasis | Σ p · J² / I² / N |
//! | long run high grey-level emphasis | Σ p · I² J² / N |

use crate::matrix::RunLengthMatrix;
use crate::{TextureError, TextureResult};
use std::fmt;
use std::str::FromStr;

/// Run-length feature identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunLengthFeature {
    ShortRunEmphasis,
    LongRunEmphasis,
    #[default]
    GreyLevelNonuniformity,
    RunLengthNonuniformity,
    LowGreyLevelRunEmphasis,
    HighGreyLevelRunEmphasis,
    ShortRunLowGreyLevelEmphasis,
    ShortRunHighGreyLevelEmphasis,
    LongRunLowGreyLevelEmphasis,
    LongRunHighGreyLevelEmphasis,
}

impl RunLengthFeature {
    /// Every feature, in catalogue order
    pub const ALL: [RunLengthFeature; 10] = [
        Self::ShortRunEmphasis,
        Self::LongRunEmphasis,
        Self::GreyLevelNonuniformity,
        Self::RunLengthNonuniformity,
        Self::LowGreyLevelRunEmphasis,
        Self::HighGreyLevelRunEmphasis,
        Self::ShortRunLowGreyLevelEmphasis,
        Self::ShortRunHighGreyLevelEmphasis,
        Self::LongRunLowGreyLevelEmphasis,
        Self::LongRunHighGreyLevelEmphasis,
    ];

    /// Snake-case name, as accepted by `from_str`
    pub fn name(self) -> &'static str {
        match self {
            Self::ShortRunEmphasis => "short_run_emphasis",
            Self::LongRunEmphasis => "long_run_emphasis",
            Self::GreyLevelNonuniformity => "grey_level_nonuniformity",
            Self::RunLengthNonuniformity => "run_length_nonuniformity",
            Self::LowGreyLevelRunEmphasis => "low_grey_level_run_emphasis",
            Self::HighGreyLevelRunEmphasis => "high_grey_level_run_emphasis",
            Self::ShortRunLowGreyLevelEmphasis => "short_run_low_grey_level_emphasis",
            Self::ShortRunHighGreyLevelEmphasis => "short_run_high_grey_level_emphasis",
            Self::LongRunLowGreyLevelEmphasis => "long_run_low_grey_level_emphasis",
            Self::LongRunHighGreyLevelEmphasis => "long_run_high_grey_level_emphasis",
        }
    }

    /// Position in [`ALL`](Self::ALL)
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Per-cell weight for the emphasis features, `None` for the
    /// non-uniformities which work on marginals.
    fn weight(self, i2: f64, j2: f64) -> Option<f64> {
        let w = match self {
            Self::ShortRunEmphasis => 1.0 / j2,
            Self::LongRunEmphasis => j2,
            Self::LowGreyLevelRunEmphasis => 1.0 / i2,
            Self::HighGreyLevelRunEmphasis => i2,
            Self::ShortRunLowGreyLevelEmphasis => 1.0 / (i2 * j2),
            Self::ShortRunHighGreyLevelEmphasis => i2 / j2,
            Self::LongRunLowGreyLevelEmphasis => j2 / i2,
            Self::LongRunHighGreyLevelEmphasis => i2 * j2,
            Self::GreyLevelNonuniformity | Self::RunLengthNonuniformity => return None,
        };
        Some(w)
    }
}

impl fmt::Display for RunLengthFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RunLengthFeature {
    type Err = TextureError;

    /// Accepts the snake-case name or the CamelCase variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|f| f.name().replace('_', "") == key)
            .ok_or_else(|| TextureError::UnknownFeature(s.to_string()))
    }
}

impl TryFrom<u32> for RunLengthFeature {
    type Error = TextureError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| TextureError::UnknownFeature(value.to_string()))
    }
}

/// Extract one feature from a run-length matrix
///
/// # Errors
///
/// Returns `TextureError::EmptyMatrix` if the matrix holds no run.
pub fn extract_feature(matrix: &RunLengthMatrix, feature: RunLengthFeature) -> TextureResult<f64> {
    let total = matrix.total_runs();
    if total == 0 {
        return Err(TextureError::EmptyMatrix);
    }

    let sum = match feature {
        RunLengthFeature::GreyLevelNonuniformity => matrix
            .grey_level_marginal()
            .iter()
            .map(|&c| (c as f64) * (c as f64))
            .sum(),
        RunLengthFeature::RunLengthNonuniformity => matrix
            .run_length_marginal()
            .iter()
            .map(|&c| (c as f64) * (c as f64))
            .sum(),
        _ => {
            let mut sum = 0.0;
            for (i, j, count) in matrix.nonzero_cells() {
                let i2 = ((i + 1) * (i + 1)) as f64;
                let j2 = ((j + 1) * (j + 1)) as f64;
                if let Some(w) = feature.weight(i2, j2) {
                    sum += count as f64 * w;
                }
            }
            sum
        }
    };

    Ok(sum / total as f64)
}

/// All catalogue features computed from one matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLengthFeatureValues {
    values: [f64; 10],
}

impl RunLengthFeatureValues {
    /// Compute every feature of `matrix`
    pub fn from_matrix(matrix: &RunLengthMatrix) -> TextureResult<Self> {
        let mut values = [0.0; 10];
        for feature in RunLengthFeature::ALL {
            values[feature.ordinal()] = extract_feature(matrix, feature)?;
        }
        Ok(Self { values })
    }

    /// Value of one feature
    #[inline]
    pub fn get(&self, feature: RunLengthFeature) -> f64 {
        self.values[feature.ordinal()]
    }

    /// Iterate `(feature, value)` pairs in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = (RunLengthFeature, f64)> + '_ {
        RunLengthFeature::ALL
            .into_iter()
            .map(move |f| (f, self.values[f.ordinal()]))
    }
}
