//! Integration tests for epoch-rotated training batches.

use charcorpus::data::count_batches;
use charcorpus::{get_training_batches, Code, Config, Corpus, CorpusError};

fn iota(n: usize) -> Vec<Code> {
    (0..n).collect()
}

#[test]
fn test_layout_thirteen_codes() {
    let codes = iota(13);
    let batches: Vec<_> = get_training_batches(1, 2, 3, &codes)
        .expect("batches")
        .collect();

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].inputs, ndarray::arr2(&[[0, 1, 2], [6, 7, 8]]));
    assert_eq!(batches[0].targets, ndarray::arr2(&[[1, 2, 3], [7, 8, 9]]));
    assert_eq!(batches[1].inputs, ndarray::arr2(&[[3, 4, 5], [9, 10, 11]]));
    assert_eq!(batches[1].targets, ndarray::arr2(&[[4, 5, 6], [10, 11, 12]]));
}

#[test]
fn test_targets_follow_inputs() {
    // Codes equal their corpus index, so every target is its input plus one.
    let codes = iota(101);
    let batches = get_training_batches(5, 4, 6, &codes).expect("batches");
    let mut seen = 0;
    for batch in batches {
        assert_eq!(batch.inputs.dim(), (4, 6));
        assert_eq!(batch.targets.dim(), (4, 6));
        for (x, y) in batch.inputs.iter().zip(batch.targets.iter()) {
            assert_eq!(*y, *x + 1);
        }
        seen += 1;
    }
    assert_eq!(seen, 5 * count_batches(101, 4, 6));
}

#[test]
fn test_rows_rotate_each_epoch() {
    let codes = iota(31);
    let n_epochs = 4;
    let batch_size = 3;
    let seq_length = 2;
    let n_batches = count_batches(codes.len(), batch_size, seq_length);
    let row_len = n_batches * seq_length;

    for (i, batch) in get_training_batches(n_epochs, batch_size, seq_length, &codes)
        .expect("batches")
        .enumerate()
    {
        let epoch = i / n_batches;
        let b = i % n_batches;
        assert_eq!(batch.epoch, epoch);
        for r in 0..batch_size {
            let stream = (r + epoch) % batch_size;
            let first = stream * row_len + b * seq_length;
            assert_eq!(batch.inputs[[r, 0]], first, "epoch {epoch} batch {b} row {r}");
        }
    }
}

#[test]
fn test_trailing_codes_are_dropped() {
    let codes = iota(20);
    let batches: Vec<_> = get_training_batches(1, 2, 3, &codes)
        .expect("batches")
        .collect();
    // 19 usable pairs fit three batches of six codes each; the last code never appears.
    assert_eq!(batches.len(), 3);
    let max_target = batches
        .iter()
        .flat_map(|b| b.targets.iter().copied())
        .max()
        .expect("non-empty");
    assert_eq!(max_target, 18);
}

#[test]
fn test_exact_fit_needs_one_extra_code() {
    assert!(matches!(
        get_training_batches(1, 2, 3, &iota(6)),
        Err(CorpusError::InsufficientData {
            n_batches: 0,
            required: 7,
            available: 6
        })
    ));
    assert_eq!(get_training_batches(1, 2, 3, &iota(7)).expect("batches").len(), 1);
}

#[test]
fn test_config_drives_batching() {
    let corpus = Corpus::from(iota(200));
    let config = Config {
        n_epochs: 3,
        batch_size: 4,
        seq_length: 5,
        top_n: 2,
    };
    let batches = config.batches(&corpus).expect("batches");
    assert_eq!(batches.n_batches(), 9);
    assert_eq!(batches.len(), 27);
}
