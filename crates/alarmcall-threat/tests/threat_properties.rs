//! Statistical properties of predator spawning and hunting.
//!
//! These run many draws with a fixed seed and check the empirical rates land
//! near the configured probabilities.

#![allow(
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use alarmcall_threat::{ThreatModel, normalized};
use alarmcall_types::PredatorId;
use ndarray::{Array2, arr1, arr2};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn even_spawn_converges_to_half() {
    let model = ThreatModel::new(
        arr2(&[[0.7, 0.99, 0.6], [0.6, 0.7, 0.99]]),
        Some(arr1(&[0.5, 0.5])),
    )
    .unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let draws = 100_000;
    let eagles = (0..draws)
        .filter(|_| model.spawn(&mut rng) == PredatorId(0))
        .count();
    let freq = eagles as f64 / f64::from(draws);
    assert!((freq - 0.5).abs() < 0.02, "predator 0 frequency {freq}");
}

#[test]
fn skewed_spawn_tracks_normalized_weights() {
    let spawn = normalized(&[6.0, 3.0, 1.0]).unwrap();
    let model = ThreatModel::new(Array2::from_elem((3, 2), 0.5), Some(spawn)).unwrap();
    let mut rng = SmallRng::seed_from_u64(9);
    let mut counts = [0_usize; 3];
    for _ in 0..50_000 {
        counts[model.spawn(&mut rng).index()] += 1;
    }
    let expected = [0.6, 0.3, 0.1];
    for (count, p) in counts.iter().zip(expected) {
        let freq = *count as f64 / 50_000.0;
        assert!((freq - p).abs() < 0.02, "frequency {freq}, expected {p}");
    }
}

#[test]
fn hunt_extremes_are_deterministic() {
    let states = {
        let mut batch = Array2::zeros((300, 3));
        for agent in 0..300 {
            batch[[agent, agent % 3]] = 1_u8;
        }
        batch
    };
    let model = ThreatModel::new(arr2(&[[1.0, 1.0, 1.0], [0.0, 0.0, 0.0]]), None).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);

    let all = model.hunt(PredatorId(0), &states, &mut rng).unwrap();
    assert_eq!(all, (0..300).collect::<Vec<_>>());

    let none = model.hunt(PredatorId(1), &states, &mut rng).unwrap();
    assert!(none.is_empty());
}

#[test]
fn safer_state_survives_more_often() {
    let model = ThreatModel::new(arr2(&[[0.2, 0.9]]), None).unwrap();
    let mut states = Array2::zeros((10_000, 2));
    for agent in 0..10_000 {
        states[[agent, usize::from(agent >= 5_000)]] = 1_u8;
    }
    let mut rng = SmallRng::seed_from_u64(5);
    let survivors = model.hunt(PredatorId(0), &states, &mut rng).unwrap();
    let exposed = survivors.iter().filter(|&&agent| agent < 5_000).count();
    let safe = survivors.len() - exposed;
    assert!(safe > exposed * 3, "safe {safe}, exposed {exposed}");
}
