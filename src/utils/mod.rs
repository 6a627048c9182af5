//! Index helpers over probability vectors.

use std::cmp::Ordering;

use ndarray::ArrayView1;

#[inline]
fn cmp_weights(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Index of the largest value. Ties go to the last occurrence.
#[must_use]
pub fn argmax(values: ArrayView1<'_, f32>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| cmp_weights(**a, **b))
        .map(|(i, _)| i)
}

/// Indices of the `n` largest values, largest first.
///
/// Ranks with a stable ascending sort and keeps the tail, so among equal
/// values the later index wins. `n` is capped at the vector length.
#[must_use]
pub fn top_n_indices(values: ArrayView1<'_, f32>, n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| cmp_weights(values[a], values[b]));
    let keep = n.min(order.len());
    order.split_off(order.len() - keep).into_iter().rev().collect()
}
