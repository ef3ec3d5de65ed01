//! Score normalization, weighted fusion and top-K selection.
//!
//! Lexical and semantic scores live on unrelated scales, so each score vector
//! is min-max normalized to `[0, 1]` before the weighted sum:
//! `fused = lexical_weight * norm(bm25) + semantic_weight * norm(similarity)`.

use std::cmp::Ordering;

use super::SearchError;

/// Default weight for the normalized BM25 score.
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.6;

/// Default weight for the normalized embedding similarity.
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.4;

/// Weights applied to the two normalized score vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    lexical: f32,
    semantic: f32,
}

impl FusionWeights {
    /// Validate and create weights.
    ///
    /// Both must be finite and non-negative, and at least one must be positive.
    pub fn new(lexical: f32, semantic: f32) -> Result<Self, SearchError> {
        let valid = |w: f32| w.is_finite() && w >= 0.0;
        if !valid(lexical) || !valid(semantic) || lexical + semantic <= 0.0 {
            return Err(SearchError::InvalidWeights { lexical, semantic });
        }
        Ok(Self { lexical, semantic })
    }

    pub fn lexical(&self) -> f32 {
        self.lexical
    }

    pub fn semantic(&self) -> f32 {
        self.semantic
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            lexical: DEFAULT_LEXICAL_WEIGHT,
            semantic: DEFAULT_SEMANTIC_WEIGHT,
        }
    }
}

/// Rescale scores into `[0, 1]` via `(x - min) / (max - min)`.
///
/// A constant vector (including an all-zero one from a query with no lexical
/// match) is returned unchanged instead of dividing by zero.
pub fn min_max_normalize(scores: &[f32]) -> Vec<f32> {
    let (min, max) = scores
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    let spread = max - min;
    if !(spread > 0.0) || !spread.is_finite() {
        return scores.to_vec();
    }

    scores.iter().map(|&x| (x - min) / spread).collect()
}

/// Weighted linear fusion of lexical and semantic scores.
pub struct ScoreFusion {
    weights: FusionWeights,
}

impl ScoreFusion {
    /// Create fusion with the default 0.6 / 0.4 weights.
    pub fn new() -> Self {
        Self {
            weights: FusionWeights::default(),
        }
    }

    /// Create fusion with custom weights.
    pub fn with_weights(weights: FusionWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    /// Normalize both vectors and combine them per document.
    ///
    /// Both inputs hold one score per catalog entry and must have equal length.
    pub fn fuse(&self, lexical: &[f32], semantic: &[f32]) -> Vec<f32> {
        debug_assert_eq!(lexical.len(), semantic.len());

        let lexical = min_max_normalize(lexical);
        let semantic = min_max_normalize(semantic);

        lexical
            .iter()
            .zip(semantic.iter())
            .map(|(l, s)| self.weights.lexical * l + self.weights.semantic * s)
            .collect()
    }
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions of the `k` highest scores, best first.
///
/// Equal scores keep catalog order (lower position first), so the output is
/// stable across calls. NaN sorts last. Returns `min(k, scores.len())`
/// positions.
pub fn rank(scores: &[f32], k: usize) -> Vec<usize> {
    let key = |i: usize| {
        let s = scores[i];
        if s.is_nan() {
            f32::NEG_INFINITY
        } else {
            s
        }
    };
    let by_score_then_position =
        |a: &usize, b: &usize| -> Ordering { key(*b).total_cmp(&key(*a)).then(a.cmp(b)) };

    let k = k.min(scores.len());
    let mut positions: Vec<usize> = (0..scores.len()).collect();
    if k == 0 {
        return Vec::new();
    }
    if k < positions.len() {
        positions.select_nth_unstable_by(k - 1, by_score_then_position);
        positions.truncate(k);
    }
    positions.sort_by(by_score_then_position);
    positions
}
