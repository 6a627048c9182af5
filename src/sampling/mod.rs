//! Next-character sampling from a model's output distribution.
//!
//! Top-k sampling: every weight outside the `top_n` largest is zeroed, the
//! survivors are renormalized and one index is drawn from the resulting
//! categorical distribution. The index is a code for
//! [`Alphabet::decode_char`](crate::data::Alphabet::decode_char).

use ndarray::{Array1, ArrayView1};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{CorpusError, CorpusResult};
use crate::data::Code;
use crate::utils::{argmax, top_n_indices};

/// Default number of candidates kept by top-k sampling.
pub const DEFAULT_TOP_N: usize = 2;

/// Zero all but the `top_n` largest weights and renormalize to sum to 1.
///
/// # Errors
///
/// - [`CorpusError::InvalidArgument`] if `top_n` is zero or exceeds `probs.len()`,
///   or a weight is negative or not finite.
/// - [`CorpusError::DegenerateDistribution`] if the kept weights sum to zero.
pub fn truncate_top_n(probs: ArrayView1<'_, f32>, top_n: usize) -> CorpusResult<Array1<f32>> {
    check_weights(probs, top_n)?;

    let mut kept = Array1::zeros(probs.len());
    for i in top_n_indices(probs, top_n) {
        kept[i] = probs[i];
    }

    let total = kept.sum();
    if total <= 0.0 {
        return Err(CorpusError::DegenerateDistribution { top_n });
    }
    kept /= total;
    Ok(kept)
}

fn check_weights(probs: ArrayView1<'_, f32>, top_n: usize) -> CorpusResult<()> {
    if top_n == 0 || top_n > probs.len() {
        return Err(CorpusError::InvalidArgument(format!(
            "top_n must be in 1..={}, got {top_n}",
            probs.len()
        )));
    }
    if let Some((i, p)) = probs
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(CorpusError::InvalidArgument(format!(
            "weight {i} is {p}, weights must be finite and non-negative"
        )));
    }
    Ok(())
}

/// Draw a code from the `top_n` most probable entries of `probs`.
///
/// With `top_n == 1` this returns the argmax without touching `rng`.
///
/// # Errors
///
/// Same as [`truncate_top_n`].
pub fn peek_char_from_prob<R: Rng + ?Sized>(
    probs: ArrayView1<'_, f32>,
    top_n: usize,
    rng: &mut R,
) -> CorpusResult<Code> {
    if top_n == 1 {
        check_weights(probs, top_n)?;
        return match argmax(probs) {
            Some(i) if probs[i] > 0.0 => Ok(i),
            _ => Err(CorpusError::DegenerateDistribution { top_n }),
        };
    }

    let kept = truncate_top_n(probs, top_n)?;
    let dist = WeightedIndex::new(kept.iter())
        .map_err(|e| CorpusError::InvalidArgument(format!("cannot build distribution: {e}")))?;
    Ok(dist.sample(rng))
}

/// Top-k sampler with its own seeded RNG.
#[derive(Debug, Clone)]
pub struct TopKSampler {
    top_n: usize,
    rng: StdRng,
}

impl TopKSampler {
    #[must_use]
    pub fn new(top_n: usize, seed: u64) -> Self {
        Self {
            top_n,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Draw one code from `probs`.
    ///
    /// # Errors
    ///
    /// Same as [`truncate_top_n`].
    pub fn sample(&mut self, probs: ArrayView1<'_, f32>) -> CorpusResult<Code> {
        peek_char_from_prob(probs, self.top_n, &mut self.rng)
    }
}

impl Default for TopKSampler {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, 42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_truncate_renormalizes() {
        let probs = arr1(&[1.0, 3.0, 0.5, 1.0]);
        let kept = truncate_top_n(probs.view(), 2).unwrap();
        assert!((kept.sum() - 1.0).abs() < 1e-6);
        assert!((kept[1] - 0.75).abs() < 1e-6);
        assert!((kept[3] - 0.25).abs() < 1e-6);
        assert_eq!(kept[0], 0.0);
        assert_eq!(kept[2], 0.0);
    }

    #[test]
    fn test_top_one_is_argmax() {
        let probs = arr1(&[0.1, 0.2, 0.6, 0.1]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(peek_char_from_prob(probs.view(), 1, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn test_top_one_ties_and_zeros() {
        let mut rng = StdRng::seed_from_u64(3);
        let tied = arr1(&[0.4, 0.1, 0.4, 0.1]);
        assert_eq!(peek_char_from_prob(tied.view(), 1, &mut rng).unwrap(), 2);
        // Agrees with the index truncation keeps.
        let kept = truncate_top_n(tied.view(), 1).unwrap();
        assert_eq!(kept[2], 1.0);

        let zeros = arr1(&[0.0, 0.0]);
        assert!(matches!(
            peek_char_from_prob(zeros.view(), 1, &mut rng),
            Err(CorpusError::DegenerateDistribution { top_n: 1 })
        ));
        let negative = arr1(&[0.5, -1.0]);
        assert!(matches!(
            peek_char_from_prob(negative.view(), 1, &mut rng),
            Err(CorpusError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_samples_only_top_candidates() {
        let probs = arr1(&[0.05, 0.4, 0.05, 0.5]);
        let mut sampler = TopKSampler::new(2, 1);
        for _ in 0..200 {
            let code = sampler.sample(probs.view()).unwrap();
            assert!(code == 1 || code == 3);
        }
    }

    #[test]
    fn test_top_n_out_of_range() {
        let probs = arr1(&[0.5, 0.5]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            peek_char_from_prob(probs.view(), 3, &mut rng),
            Err(CorpusError::InvalidArgument(_))
        ));
        assert!(matches!(
            peek_char_from_prob(probs.view(), 0, &mut rng),
            Err(CorpusError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_degenerate_distribution() {
        let probs = arr1(&[0.0, 0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            peek_char_from_prob(probs.view(), 2, &mut rng),
            Err(CorpusError::DegenerateDistribution { top_n: 2 })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let probs = arr1(&[0.5, -0.1, 0.6]);
        assert!(matches!(
            truncate_top_n(probs.view(), 1),
            Err(CorpusError::InvalidArgument(_))
        ));
        let probs = arr1(&[0.5, f32::NAN]);
        assert!(truncate_top_n(probs.view(), 1).is_err());
    }
}
