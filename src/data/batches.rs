//! Training batches for stateful next-character prediction.
//!
//! The corpus is cut into `batch_size` contiguous streams (one per row) and
//! each stream is walked left to right in windows of `seq_length` codes, so
//! row `r` of consecutive batches continues the same stretch of text. Targets
//! are the same streams shifted by one code.
//!
//! Within epoch `e` the rows of every batch are rotated by `-e`: output row
//! `r` carries stream `(r + e) mod batch_size`. A recurrent consumer that keeps
//! state per physical row therefore sees a different stream in each row from
//! one epoch to the next.

use std::iter::FusedIterator;

use ndarray::{s, Array2, Axis};

use super::vocab::Code;
use crate::core::{CorpusError, CorpusResult};

/// One training step: inputs and next-code targets, both `(batch_size, seq_length)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub epoch: usize,
    pub inputs: Array2<Code>,
    pub targets: Array2<Code>,
}

/// Number of full batches a corpus of `n_codes` codes yields.
///
/// One code is held back so every input has a target. A batch too large
/// to count in `usize` yields 0.
#[must_use]
pub fn count_batches(n_codes: usize, batch_size: usize, seq_length: usize) -> usize {
    match batch_size.checked_mul(seq_length) {
        Some(per_batch) if per_batch > 0 => n_codes.saturating_sub(1) / per_batch,
        _ => 0,
    }
}

/// Build the batch iterator for `n_epochs` passes over `corpus`.
///
/// # Errors
///
/// - [`CorpusError::InvalidArgument`] if `n_epochs`, `batch_size` or `seq_length` is zero,
///   or if `batch_size * seq_length + 1` or the total batch count overflows `usize`.
/// - [`CorpusError::InsufficientData`] if the corpus holds no more than
///   `batch_size * seq_length` codes.
pub fn get_training_batches(
    n_epochs: usize,
    batch_size: usize,
    seq_length: usize,
    corpus: &[Code],
) -> CorpusResult<TrainingBatches> {
    for (name, value) in [
        ("n_epochs", n_epochs),
        ("batch_size", batch_size),
        ("seq_length", seq_length),
    ] {
        if value == 0 {
            return Err(CorpusError::InvalidArgument(format!(
                "{name} must be greater than 0"
            )));
        }
    }

    let per_batch = batch_size
        .checked_mul(seq_length)
        .filter(|n| n.checked_add(1).is_some())
        .ok_or_else(|| {
            CorpusError::InvalidArgument(format!(
                "batch_size {batch_size} x seq_length {seq_length} is too large"
            ))
        })?;

    let n_batches = count_batches(corpus.len(), batch_size, seq_length);
    if n_batches < 1 {
        return Err(CorpusError::InsufficientData {
            n_batches,
            required: per_batch + 1,
            available: corpus.len(),
        });
    }
    if n_epochs.checked_mul(n_batches).is_none() {
        return Err(CorpusError::InvalidArgument(format!(
            "{n_epochs} epochs of {n_batches} batches is too many to count"
        )));
    }

    // Bounded by corpus.len(), so none of these overflow.
    let usable = n_batches * per_batch;
    let shape = (batch_size, n_batches * seq_length);
    let inputs = Array2::from_shape_vec(shape, corpus[..usable].to_vec())
        .map_err(|e| CorpusError::InvalidArgument(format!("cannot reshape inputs: {e}")))?;
    let targets = Array2::from_shape_vec(shape, corpus[1..=usable].to_vec())
        .map_err(|e| CorpusError::InvalidArgument(format!("cannot reshape targets: {e}")))?;

    tracing::debug!(
        "{} batches of {}x{} per epoch, {} codes unused",
        n_batches,
        batch_size,
        seq_length,
        corpus.len() - usable - 1
    );

    Ok(TrainingBatches {
        inputs,
        targets,
        n_epochs,
        n_batches,
        seq_length,
        epoch: 0,
        batch: 0,
    })
}

/// Single-pass iterator over `n_epochs * n_batches` [`Batch`]es.
#[derive(Debug, Clone)]
pub struct TrainingBatches {
    /// Input streams, shape `(batch_size, n_batches * seq_length)`.
    inputs: Array2<Code>,
    /// Target streams, same shape, shifted one code ahead.
    targets: Array2<Code>,
    n_epochs: usize,
    n_batches: usize,
    seq_length: usize,
    /// Cursor: epoch of the next batch.
    epoch: usize,
    /// Cursor: index of the next batch within its epoch.
    batch: usize,
}

impl TrainingBatches {
    #[must_use]
    pub fn n_batches(&self) -> usize {
        self.n_batches
    }

    #[must_use]
    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.inputs.nrows()
    }

    #[must_use]
    pub fn seq_length(&self) -> usize {
        self.seq_length
    }

    /// At most `n_epochs * n_batches`, which was checked on construction.
    fn remaining(&self) -> usize {
        if self.epoch >= self.n_epochs {
            return 0;
        }
        (self.n_epochs - self.epoch) * self.n_batches - self.batch
    }

    /// Column window `batch` of `matrix`, rows rotated by `-epoch`.
    fn window(&self, matrix: &Array2<Code>, epoch: usize, batch: usize) -> Array2<Code> {
        let rows = matrix.nrows();
        let order: Vec<usize> = (0..rows).map(|r| (r + epoch) % rows).collect();
        let start = batch * self.seq_length;
        matrix
            .slice(s![.., start..start + self.seq_length])
            .select(Axis(0), &order)
    }
}

impl Iterator for TrainingBatches {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.epoch >= self.n_epochs {
            return None;
        }
        let (epoch, batch) = (self.epoch, self.batch);

        self.batch += 1;
        if self.batch == self.n_batches {
            self.batch = 0;
            self.epoch += 1;
        }

        Some(Batch {
            epoch,
            inputs: self.window(&self.inputs, epoch, batch),
            targets: self.window(&self.targets, epoch, batch),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for TrainingBatches {}

impl FusedIterator for TrainingBatches {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn corpus(n: usize) -> Vec<Code> {
        (0..n).collect()
    }

    #[test]
    fn test_count_batches() {
        assert_eq!(count_batches(13, 2, 3), 2);
        assert_eq!(count_batches(12, 2, 3), 1);
        assert_eq!(count_batches(7, 2, 3), 1);
        assert_eq!(count_batches(6, 2, 3), 0);
        assert_eq!(count_batches(0, 2, 3), 0);
        assert_eq!(count_batches(10, 0, 3), 0);
        assert_eq!(count_batches(10, usize::MAX / 2, 3), 0);
    }

    #[test]
    fn test_layout_first_epoch() {
        let data = corpus(13);
        let mut batches = get_training_batches(1, 2, 3, &data).unwrap();
        assert_eq!(batches.len(), 2);

        // Streams: row 0 = 0..6, row 1 = 6..12.
        let first = batches.next().unwrap();
        assert_eq!(first.epoch, 0);
        assert_eq!(first.inputs, arr2(&[[0, 1, 2], [6, 7, 8]]));
        assert_eq!(first.targets, arr2(&[[1, 2, 3], [7, 8, 9]]));

        let second = batches.next().unwrap();
        assert_eq!(second.inputs, arr2(&[[3, 4, 5], [9, 10, 11]]));
        assert_eq!(second.targets, arr2(&[[4, 5, 6], [10, 11, 12]]));

        assert!(batches.next().is_none());
        assert!(batches.next().is_none());
    }

    #[test]
    fn test_epoch_rotation() {
        let data = corpus(19);
        // batch_size 3, seq_length 2: 3 batches, streams 0..6, 6..12, 12..18
        let all: Vec<Batch> = get_training_batches(4, 3, 2, &data).unwrap().collect();
        assert_eq!(all.len(), 12);

        let e1 = &all[3];
        assert_eq!(e1.epoch, 1);
        assert_eq!(e1.inputs, arr2(&[[6, 7], [12, 13], [0, 1]]));
        assert_eq!(e1.targets, arr2(&[[7, 8], [13, 14], [1, 2]]));

        let e2 = &all[6];
        assert_eq!(e2.epoch, 2);
        assert_eq!(e2.inputs, arr2(&[[12, 13], [0, 1], [6, 7]]));

        // Rotation wraps around after batch_size epochs.
        let e3 = &all[9];
        assert_eq!(e3.epoch, 3);
        assert_eq!(e3.inputs, all[0].inputs);
    }

    #[test]
    fn test_size_hint_tracks_cursor() {
        let data = corpus(13);
        let mut batches = get_training_batches(3, 2, 3, &data).unwrap();
        assert_eq!(batches.len(), 6);
        batches.next();
        batches.next();
        batches.next();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches.by_ref().count(), 3);
        assert_eq!(batches.len(), 0);
    }

    #[test]
    fn test_insufficient_data() {
        let data = corpus(6);
        match get_training_batches(1, 2, 3, &data) {
            Err(CorpusError::InsufficientData {
                n_batches,
                required,
                available,
            }) => {
                assert_eq!(n_batches, 0);
                assert_eq!(required, 7);
                assert_eq!(available, 6);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
        assert!(get_training_batches(1, 2, 3, &[]).is_err());
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let data = corpus(3);
        assert!(matches!(
            get_training_batches(1, usize::MAX / 2, 3, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_training_batches(1, usize::MAX, 1, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
        // Largest countable batch: still just too little data.
        assert!(matches!(
            get_training_batches(1, usize::MAX - 1, 1, &data),
            Err(CorpusError::InsufficientData { required, .. }) if required == usize::MAX
        ));
    }

    #[test]
    fn test_too_many_epochs_rejected() {
        let data = corpus(13);
        assert!(matches!(
            get_training_batches(usize::MAX, 2, 3, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
        // One batch per epoch: usize::MAX epochs still has an exact length.
        let batches = get_training_batches(usize::MAX, 2, 3, &corpus(7)).unwrap();
        assert_eq!(batches.len(), usize::MAX);
    }

    #[test]
    fn test_zero_arguments_rejected() {
        let data = corpus(20);
        assert!(matches!(
            get_training_batches(0, 2, 3, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_training_batches(1, 0, 3, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_training_batches(1, 2, 0, &data),
            Err(CorpusError::InvalidArgument(_))
        ));
    }
}
