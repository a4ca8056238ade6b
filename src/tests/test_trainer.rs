use ndarray::arr1;

use crate::error::HustingsError;
use crate::trainer::{candidate_stances, CampaignTrainer, TrainerConfig};

fn small_config() -> TrainerConfig {
    TrainerConfig::default()
        .with_candidates(3)
        .with_voters(20, 0.2)
        .with_issues(2)
        .with_learning_rate(0.1)
        .with_epsilon(0.1)
}

#[test]
fn test_trainer_dimensions() {
    let trainer = CampaignTrainer::new(small_config(), 42).unwrap();
    // visible 4 + issues 2 + candidates 3
    assert_eq!(trainer.state_size(), 9);
    // 2 * issues + 1
    assert_eq!(trainer.action_size(), 5);
    assert!(trainer.network().size_matches(&[9, 4, 3, 2, 5]));
}

#[test]
fn test_trainer_config_validation() {
    let result = CampaignTrainer::new(small_config().with_epsilon(1.5), 0);
    assert!(matches!(
        result,
        Err(HustingsError::InvalidParameter { .. })
    ));

    let result = CampaignTrainer::new(small_config().with_candidates(0), 0);
    assert!(matches!(
        result,
        Err(HustingsError::InvalidParameter { .. })
    ));
}

#[test]
fn test_candidate_stances_enumeration() {
    let stance = arr1(&[0.95, -1.0]);
    let moves = candidate_stances(&stance);

    assert_eq!(moves.len(), 5);
    assert_eq!(moves[0], stance);
    // issue 0 nudged up is clamped at 1.0
    assert!((moves[1][0] - 1.0).abs() < 1e-6);
    assert!((moves[1][1] + 1.0).abs() < 1e-6);
    assert!((moves[2][0] - 0.85).abs() < 1e-6);
    // issue 1 nudged down is clamped at -1.0
    assert!((moves[3][1] + 0.9).abs() < 1e-6);
    assert!((moves[4][1] + 1.0).abs() < 1e-6);
}

#[test]
fn test_epsilon_one_explores_uniformly() {
    let mut trainer = CampaignTrainer::new(small_config().with_epsilon(1.0), 7).unwrap();
    let q_values = arr1(&[0.9, 0.025, 0.025, 0.025, 0.025]);

    let trials = 5000;
    let mut counts = vec![0usize; trainer.action_size()];
    for _ in 0..trials {
        counts[trainer.select_action(&q_values)] += 1;
    }

    // Roughly uniform: every action within half-to-double the expected share
    let expected = trials / trainer.action_size();
    for &count in &counts {
        assert!(count > expected / 2, "counts: {:?}", counts);
        assert!(count < expected * 2, "counts: {:?}", counts);
    }
}

#[test]
fn test_epsilon_zero_is_greedy() {
    let mut trainer = CampaignTrainer::new(small_config().with_epsilon(0.0), 7).unwrap();
    let q_values = arr1(&[0.1, 0.05, 0.6, 0.15, 0.1]);
    for _ in 0..100 {
        assert_eq!(trainer.select_action(&q_values), 2);
    }
}

#[test]
fn test_step_keeps_stances_clamped_and_returns_finite_loss() {
    let mut trainer = CampaignTrainer::new(small_config(), 99).unwrap();
    for _ in 0..3 {
        let loss = trainer.step().unwrap();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
        for stance in trainer.stances() {
            for &value in stance.iter() {
                assert!((-1.0..=1.0).contains(&value));
            }
        }
    }
}

#[test]
fn test_step_stores_full_state_vectors_in_replay() {
    let mut trainer = CampaignTrainer::new(small_config(), 42).unwrap();
    trainer.step().unwrap();

    let state_size = trainer.state_size();
    for slot in 0..trainer.replay().capacity() {
        let transition = trainer.replay().get(slot).unwrap();
        assert_eq!(transition.state.len(), state_size);
        assert_eq!(transition.next_state.len(), state_size);
        assert_eq!(transition.action.len(), 1);
        assert_eq!(transition.reward.len(), 1);
    }
}

#[test]
fn test_step_freezes_aggregate_standings_per_iteration() {
    // Every candidate acts against the same pre-action aggregate standings,
    // so the trailing candidate-averages segment of each stored state is
    // identical across slots (and likewise for the post-action next states).
    let config = small_config().with_epsilon(0.5);
    let candidate_count = config.candidate_count;
    let mut trainer = CampaignTrainer::new(config, 77).unwrap();
    trainer.step().unwrap();

    let tail = trainer.state_size() - candidate_count;
    let first = trainer.replay().get(0).unwrap().clone();
    for slot in 1..trainer.replay().capacity() {
        let transition = trainer.replay().get(slot).unwrap();
        assert_eq!(
            transition.state.slice(ndarray::s![tail..]),
            first.state.slice(ndarray::s![tail..])
        );
        assert_eq!(
            transition.next_state.slice(ndarray::s![tail..]),
            first.next_state.slice(ndarray::s![tail..])
        );
    }
}

#[test]
fn test_step_tallies_every_voter() {
    let mut trainer = CampaignTrainer::new(small_config(), 5).unwrap();
    trainer.step().unwrap();
    assert_eq!(trainer.tallies().len(), 3);
    assert_eq!(trainer.tallies().iter().sum::<usize>(), 20);
}

#[test]
fn test_exploit_step_returns_top_tally() {
    let mut trainer = CampaignTrainer::new(small_config(), 12).unwrap();
    trainer.train(2).unwrap();
    let winner = trainer.exploit_step().unwrap();
    let top = *trainer.tallies().iter().max().unwrap();
    assert_eq!(trainer.tallies()[winner], top);
}

#[test]
fn test_perturb_network_changes_parameters() {
    let mut trainer = CampaignTrainer::new(small_config(), 31).unwrap();
    let before = trainer.network().snapshot();
    trainer.perturb_network(1.0, 0.5);
    let after = trainer.network().snapshot();
    assert_ne!(before.weights, after.weights);
}

#[test]
fn test_update_epsilon_clamps() {
    let mut trainer = CampaignTrainer::new(small_config(), 1).unwrap();
    trainer.update_epsilon(2.0);
    let q_values = arr1(&[1.0, 0.0, 0.0, 0.0, 0.0]);
    // epsilon clamped to 1.0: action 0 cannot dominate
    let mut non_greedy = 0;
    for _ in 0..200 {
        if trainer.select_action(&q_values) != 0 {
            non_greedy += 1;
        }
    }
    assert!(non_greedy > 0);
}
