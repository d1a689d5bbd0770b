//! Batched one-hot tensor helpers.
//!
//! Both strategy tensors have the same layout: axis 0 is the agent, axis 1 is
//! the "input" (predator or signal) and axis 2 is the one-hot "output" (signal
//! or state). Every helper here works on that layout regardless of which
//! tensor it is given.

use ndarray::{Array2, Array3, ArrayView1, ArrayView3, Axis};
use rand::Rng;

use crate::error::PopulationError;

/// Build an `(agents, rows, width)` tensor whose every row is an independent
/// uniformly random one-hot vector.
///
/// Each row starts as `[1, 0, ..., 0]` and is then shuffled in place along
/// its last axis with a Fisher-Yates pass.
pub fn random<R: Rng + ?Sized>(
    agents: usize,
    rows: usize,
    width: usize,
    rng: &mut R,
) -> Array3<u8> {
    let mut tensor = Array3::zeros((agents, rows, width));
    if width == 0 {
        return tensor;
    }
    tensor.index_axis_mut(Axis(2), 0).fill(1);
    for mut lane in tensor.lanes_mut(Axis(2)) {
        for i in (1..width).rev() {
            let j = rng.random_range(0..=i);
            lane.swap(i, j);
        }
    }
    tensor
}

/// Check that every entry is 0 or 1 and every row holds exactly one 1.
///
/// # Errors
///
/// Returns [`PopulationError::InvariantViolation`] for the first bad row,
/// naming `tensor`, the agent, and the row.
pub fn validate(tensor: ArrayView3<'_, u8>, name: &'static str) -> Result<(), PopulationError> {
    for (agent, rows) in tensor.outer_iter().enumerate() {
        for (row, lane) in rows.outer_iter().enumerate() {
            if let Some(&bad) = lane.iter().find(|&&v| v > 1) {
                return Err(PopulationError::InvariantViolation {
                    tensor: name,
                    agent,
                    row,
                    reason: format!("entry {bad} is not 0 or 1"),
                });
            }
            let ones = lane.iter().filter(|&&v| v == 1).count();
            if ones != 1 {
                return Err(PopulationError::InvariantViolation {
                    tensor: name,
                    agent,
                    row,
                    reason: format!("row sums to {ones}, expected 1"),
                });
            }
        }
    }
    Ok(())
}

/// Position of the 1 in a one-hot row.
pub fn hot_index(lane: ArrayView1<'_, u8>) -> Option<usize> {
    lane.iter().position(|&v| v == 1)
}

/// Number of agents choosing each output for each input: `(rows, width)`.
pub fn counts(tensor: ArrayView3<'_, u8>) -> Array2<u64> {
    tensor.fold_axis(Axis(0), 0_u64, |acc, &v| acc.saturating_add(u64::from(v)))
}

/// Divide each row of `counts` by its sum. Rows summing to zero stay zero.
#[allow(clippy::cast_precision_loss)]
pub fn row_normalized(counts: &Array2<u64>) -> Array2<f64> {
    let mut chances = counts.mapv(|c| c as f64);
    for mut row in chances.rows_mut() {
        let total = row.sum();
        if total > 0.0 {
            row.mapv_inplace(|c| c / total);
        }
    }
    chances
}

/// Indices of the maximal entries of each row, ties included.
pub fn argmax_ties<F: Fn(f64, f64) -> bool>(matrix: &Array2<f64>, same: F) -> Vec<Vec<usize>> {
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            let best = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| same(v, best))
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}
