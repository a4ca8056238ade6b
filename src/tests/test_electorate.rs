use ndarray::arr1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::electorate::{Electorate, Voter};

#[test]
fn test_voter_picks_nearest_candidate_by_l1() {
    let voter = Voter::with_issues(arr1(&[0.5, -0.5]));
    let stances = vec![
        arr1(&[1.0, 1.0]),   // distance 0.5 + 1.5 = 2.0
        arr1(&[0.4, -0.4]),  // distance 0.1 + 0.1 = 0.2
        arr1(&[-1.0, -1.0]), // distance 1.5 + 0.5 = 2.0
    ];
    assert_eq!(voter.vote(&stances), 1);
}

#[test]
fn test_voter_tie_goes_to_earliest() {
    let voter = Voter::with_issues(arr1(&[0.0]));
    let stances = vec![arr1(&[0.5]), arr1(&[-0.5])];
    assert_eq!(voter.vote(&stances), 0);
}

#[test]
fn test_voter_average_issue() {
    let voter = Voter::with_issues(arr1(&[1.0, 0.0, -0.4]));
    assert!((voter.average_issue() - 0.2).abs() < 1e-6);
}

#[test]
fn test_randomize_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut voter = Voter::new(16, &mut rng);
    voter.randomize(&mut rng);
    for &issue in voter.issues().iter() {
        assert!((-1.0..=1.0).contains(&issue));
    }
}

#[test]
fn test_tally_counts_every_voter() {
    let voters = vec![
        Voter::with_issues(arr1(&[0.9])),
        Voter::with_issues(arr1(&[0.8])),
        Voter::with_issues(arr1(&[-0.9])),
    ];
    let electorate = Electorate::from_voters(voters);
    let stances = vec![arr1(&[1.0]), arr1(&[-1.0])];

    let tallies = electorate.tally(&stances);
    assert_eq!(tallies, vec![2, 1]);
    assert_eq!(tallies.iter().sum::<usize>(), electorate.len());
    assert_eq!(Electorate::winner(&tallies), 0);
}

#[test]
fn test_winner_tie_goes_to_earliest() {
    assert_eq!(Electorate::winner(&[2, 2, 1]), 0);
    assert_eq!(Electorate::winner(&[1, 3, 3]), 1);
}

#[test]
fn test_visible_average_issues_sample_size() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut electorate = Electorate::new(20, 3, &mut rng);
    let visible = electorate.visible_average_issues(5, &mut rng);
    assert_eq!(visible.len(), 5);
    for &v in visible.iter() {
        assert!((-1.0..=1.0).contains(&v));
    }
}
