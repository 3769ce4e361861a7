// ============================================================
// Layer 5 - Logistic Regression
// ============================================================
// Sparse binary logistic regression trained with SGD.
//
// Objective (n samples, class weights c_y):
//
//   Σ c_yi · logloss(yi, σ(w·xi + b))  +  ||w||² / (2C)
//
// spread over samples as a per-step L2 term α = 1 / (C·n).
//
// Weight decay is applied lazily: the stored vector v is scaled
// by a single scalar s (w = s·v), so a step only touches the
// non-zero columns of the sample instead of the whole vector.
// Only columns seen during training get a weight, so a model
// over 2^20 hashed columns stays as small as its vocabulary.
// The intercept b is never regularised.
//
// Reference: Bottou (2010) Large-Scale Machine Learning with SGD

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ml::featurizer::SparseVector;

/// Decision threshold on the positive-class probability
pub const THRESHOLD: f64 = 0.5;

/// Class-weighting policy for the loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Weights inversely proportional to class frequency
    Balanced,

    /// Fixed weight on the positive class, negatives weigh 1
    Positive(f64),
}

impl ClassWeight {
    /// (negative weight, positive weight) for the given class counts
    pub fn weights(&self, n_neg: usize, n_pos: usize) -> (f64, f64) {
        match *self {
            Self::Balanced => {
                let n = (n_neg + n_pos) as f64;
                let w = |count: usize| if count == 0 { 1.0 } else { n / (2.0 * count as f64) };
                (w(n_neg), w(n_pos))
            }
            Self::Positive(w) => (1.0, w),
        }
    }
}

impl fmt::Display for ClassWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced    => write!(f, "balanced"),
            Self::Positive(w) => write!(f, "{{1: {w}}}"),
        }
    }
}

/// One point of the hyper-parameter grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularisation strength
    pub c: f64,
    pub class_weight: ClassWeight,
    pub fit_intercept: bool,
}

impl fmt::Display for LogisticParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C={}, class_weight={}, fit_intercept={}",
            self.c, self.class_weight, self.fit_intercept
        )
    }
}

/// Optimiser settings shared by every fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    pub epochs: usize,

    /// Initial learning rate, decayed as η0 / √(1 + epoch)
    pub eta0: f64,

    /// Seed for the per-epoch sample order
    pub seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self { epochs: 20, eta0: 0.1, seed: 42 }
    }
}

/// A fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Non-zero weights, by column
    pub weights:   SparseVector,
    pub intercept: f64,
    pub params:    LogisticParams,
}

impl LogisticRegression {
    /// Fit on `xs` / `ys`.
    pub fn fit(
        xs:     &[&SparseVector],
        ys:     &[bool],
        params: LogisticParams,
        sgd:    &SgdConfig,
    ) -> Self {
        debug_assert_eq!(xs.len(), ys.len());

        let n     = xs.len();
        let n_pos = ys.iter().filter(|&&y| y).count();
        let (w_neg, w_pos) = params.class_weight.weights(n - n_pos, n_pos);
        let alpha = 1.0 / (params.c * n.max(1) as f64);

        let mut v: FxHashMap<u32, f64> = FxHashMap::default();
        let mut scale     = 1.0f64;
        let mut intercept = 0.0f64;

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(sgd.seed);

        for epoch in 0..sgd.epochs {
            let lr = sgd.eta0 / (1.0 + epoch as f64).sqrt();
            order.shuffle(&mut rng);

            for &i in &order {
                let x = xs[i];
                let z = scale * dot_map(&v, x) + intercept;
                let (y, cw) = if ys[i] { (1.0, w_pos) } else { (0.0, w_neg) };
                let g = cw * (sigmoid(z) - y);

                scale *= (1.0 - lr * alpha).max(1e-6);

                for (&j, &xj) in x.indices.iter().zip(&x.values) {
                    *v.entry(j).or_insert(0.0) -= lr * g * xj / scale;
                }
                if params.fit_intercept {
                    intercept -= lr * g;
                }

                if scale < 1e-9 {
                    v.values_mut().for_each(|vj| *vj *= scale);
                    scale = 1.0;
                }
            }
        }

        let weights = SparseVector::from_pairs(v.into_iter().map(|(j, vj)| (j, vj * scale)));
        tracing::debug!(
            "Fitted logistic regression on {} samples ({} positive, {} weights), {}",
            n, n_pos, weights.nnz(), params
        );

        Self { weights, intercept, params }
    }

    pub fn decision_function(&self, x: &SparseVector) -> f64 {
        x.iter().map(|(j, xj)| self.weights.get(j) * xj).sum::<f64>() + self.intercept
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, x: &SparseVector) -> f64 {
        sigmoid(self.decision_function(x))
    }
}

fn dot_map(w: &FxHashMap<u32, f64>, x: &SparseVector) -> f64 {
    x.indices
        .iter()
        .zip(&x.values)
        .map(|(j, xj)| w.get(j).copied().unwrap_or(0.0) * xj)
        .sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn params(class_weight: ClassWeight, fit_intercept: bool) -> LogisticParams {
        LogisticParams { c: 1.0, class_weight, fit_intercept }
    }

    fn separable() -> (Vec<SparseVector>, Vec<bool>) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in 0..40 {
            let pos = i % 4 == 0;
            // column 0 marks positives, column 1 negatives, column 2 is shared noise
            let col = if pos { 0 } else { 1 };
            xs.push(SparseVector::from_pairs(vec![(col, 1.0), (2, 1.0)]));
            ys.push(pos);
        }
        (xs, ys)
    }

    #[test]
    fn test_learns_separable_data() {
        let (xs, ys) = separable();
        let refs: Vec<&SparseVector> = xs.iter().collect();
        let model = LogisticRegression::fit(&refs, &ys, params(ClassWeight::Balanced, true), &SgdConfig::default());

        for (x, &y) in xs.iter().zip(&ys) {
            assert_eq!(model.predict_proba(x) >= THRESHOLD, y);
        }
        assert!(model.weights.get(0) > model.weights.get(1));
    }

    #[test]
    fn test_weights_cover_only_seen_columns() {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in 0..20u32 {
            let pos = i % 2 == 0;
            let col = if pos { 1 << 19 } else { (1 << 20) - 1 };
            xs.push(SparseVector::from_pairs(vec![(col, 1.0), (7, 1.0)]));
            ys.push(pos);
        }
        let refs: Vec<&SparseVector> = xs.iter().collect();
        let model = LogisticRegression::fit(&refs, &ys, params(ClassWeight::Balanced, true), &SgdConfig::default());

        assert_eq!(model.weights.indices, vec![7, 1 << 19, (1 << 20) - 1]);
        assert!(model.weights.get(1 << 19) > 0.0);
        assert!(model.weights.get((1 << 20) - 1) < 0.0);
        assert_eq!(model.weights.get(12345), 0.0);
    }

    #[test]
    fn test_no_intercept_when_disabled() {
        let (xs, ys) = separable();
        let refs: Vec<&SparseVector> = xs.iter().collect();
        let model = LogisticRegression::fit(&refs, &ys, params(ClassWeight::Positive(2.0), false), &SgdConfig::default());
        assert_eq!(model.intercept, 0.0);
    }

    #[test]
    fn test_balanced_weights() {
        let (w_neg, w_pos) = ClassWeight::Balanced.weights(30, 10);
        assert!((w_neg - 40.0 / 60.0).abs() < 1e-12);
        assert!((w_pos - 2.0).abs() < 1e-12);

        // a missing class falls back to weight 1
        assert_eq!(ClassWeight::Balanced.weights(5, 0), (0.5, 1.0));
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (xs, ys) = separable();
        let refs: Vec<&SparseVector> = xs.iter().collect();
        let p = params(ClassWeight::Balanced, true);
        let a = LogisticRegression::fit(&refs, &ys, p, &SgdConfig::default());
        let b = LogisticRegression::fit(&refs, &ys, p, &SgdConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
