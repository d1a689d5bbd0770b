//! Integration tests for the population tensors.
//!
//! Checks the one-hot invariant across every mutating operation, the
//! population cap, and that the batched witness agrees with scalar agents
//! reacting one at a time.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use alarmcall_population::{Agent, PopulationState};
use alarmcall_threat::ThreatModel;
use alarmcall_types::{PredatorId, SignalId, StateId, TruncationPolicy};
use ndarray::{Array3, arr2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn one_hot_invariant_survives_a_turn_cycle() {
    let mut rng = SmallRng::seed_from_u64(42);
    let threat = ThreatModel::new(arr2(&[[0.7, 0.99, 0.6], [0.6, 0.7, 0.99]]), None).unwrap();
    let mut population = PopulationState::random(500, 2, 3, 3, &mut rng).unwrap();
    population.validate().unwrap();

    for _ in 0..20 {
        let predator = threat.spawn(&mut rng);
        let witness = population.witness(predator, &mut rng).unwrap();
        let survivors = threat.hunt(predator, &witness.states, &mut rng).unwrap();
        population.survive(&survivors).unwrap();
        population.validate().unwrap();
        if population.is_empty() {
            break;
        }
        population
            .reproduce(1.2, 0.05, 500, TruncationPolicy::OldestFirst, &mut rng)
            .unwrap();
        population.validate().unwrap();
        assert!(population.len() <= 500);
    }

    let extra = PopulationState::random(10, 2, 3, 3, &mut rng).unwrap();
    population.concatenate(&extra).unwrap();
    population.validate().unwrap();
}

#[test]
fn validate_is_idempotent() {
    let mut rng = SmallRng::seed_from_u64(3);
    let population = PopulationState::random(40, 3, 4, 2, &mut rng).unwrap();
    let snapshot = population.clone();
    for _ in 0..3 {
        assert!(population.validate().is_ok());
    }
    assert_eq!(population, snapshot);
}

#[test]
fn cap_holds_for_every_policy() {
    for policy in [TruncationPolicy::OldestFirst, TruncationPolicy::Random] {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut population = PopulationState::random(300, 2, 3, 3, &mut rng).unwrap();
        for _ in 0..10 {
            let stats = population.reproduce(2.5, 0.3, 350, policy, &mut rng).unwrap();
            assert!(population.len() <= 350);
            assert_eq!(stats.population_after, population.len());
        }
    }
}

#[test]
fn identity_reproduction_leaves_population_unchanged() {
    let mut rng = SmallRng::seed_from_u64(21);
    let mut population = PopulationState::random(128, 2, 3, 3, &mut rng).unwrap();
    let before = population.clone();
    population
        .reproduce(1.0, 0.0, 128, TruncationPolicy::OldestFirst, &mut rng)
        .unwrap();
    assert_eq!(population, before);
}

#[test]
fn shared_strategy_gives_uniform_reaction() {
    let agents = 50;
    let mut words = Array3::zeros((agents, 2, 3));
    let mut actions = Array3::zeros((agents, 3, 3));
    for n in 0..agents {
        // predator 0 → signal 2, predator 1 → signal 0
        words[[n, 0, 2]] = 1;
        words[[n, 1, 0]] = 1;
        // signal s → state (s + 1) % 3
        for signal in 0..3 {
            actions[[n, signal, (signal + 1) % 3]] = 1;
        }
    }
    let population = PopulationState::from_tensors(words, actions).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let witness = population.witness(PredatorId(0), &mut rng).unwrap();
    assert_eq!(witness.signal, SignalId(2));
    for row in witness.states.rows() {
        assert_eq!(row.to_vec(), vec![1, 0, 0]);
    }
}

#[test]
fn batched_witness_matches_scalar_agents() {
    let predators = PredatorId::range(3);
    let signals = SignalId::range(4);
    let states = StateId::range(3);
    let mut rng = SmallRng::seed_from_u64(77);
    let agents: Vec<Agent> = (0..60)
        .map(|_| Agent::random(&predators, &signals, &states, &mut rng))
        .collect();
    let population = PopulationState::from_agents(&agents, &predators, &signals, &states).unwrap();

    for _ in 0..25 {
        let emitter = rng.random_range(0..agents.len());
        let predator = predators[rng.random_range(0..predators.len())];
        let witness = population.witness_from(emitter, predator).unwrap();

        let signal = agents[emitter].emit(predator).unwrap();
        assert_eq!(witness.signal, signal);
        for (n, agent) in agents.iter().enumerate() {
            let state = agent.receive(signal).unwrap();
            let row = witness.states.row(n);
            assert_eq!(row.iter().filter(|&&v| v == 1).count(), 1);
            assert_eq!(row[state.index()], 1, "agent {n} should react with {state}");
        }
    }
}
