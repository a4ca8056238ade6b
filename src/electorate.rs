use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A single voter with one stance per issue, each in [-1, 1].
#[derive(Clone, Debug)]
pub struct Voter {
    issues: Array1<f32>,
}

impl Voter {
    pub fn new(issue_count: usize, rng: &mut StdRng) -> Self {
        let mut voter = Voter {
            issues: Array1::zeros(issue_count),
        };
        voter.randomize(rng);
        voter
    }

    /// Build a voter with fixed issue stances.
    pub fn with_issues(issues: Array1<f32>) -> Self {
        Voter { issues }
    }

    /// Re-draw every issue stance uniformly from [-1, 1].
    pub fn randomize(&mut self, rng: &mut StdRng) {
        for issue in self.issues.iter_mut() {
            *issue = rng.gen_range(-1.0..=1.0);
        }
    }

    /// Index of the nearest candidate by L1 distance over issue stances.
    /// Ties go to the earliest candidate.
    pub fn vote(&self, stances: &[Array1<f32>]) -> usize {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (candidate, stance) in stances.iter().enumerate() {
            let mut distance = 0.0;
            for (issue, value) in self.issues.iter().enumerate() {
                distance += (stance[issue] - value).abs();
            }
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    /// Mean stance across all issues.
    pub fn average_issue(&self) -> f32 {
        self.issues.mean().unwrap_or(0.0)
    }

    pub fn issues(&self) -> ArrayView1<f32> {
        self.issues.view()
    }
}

/// A population of voters that resolves elections by nearest-candidate votes.
#[derive(Clone, Debug)]
pub struct Electorate {
    voters: Vec<Voter>,
}

impl Electorate {
    pub fn new(voter_count: usize, issue_count: usize, rng: &mut StdRng) -> Self {
        let voters = (0..voter_count)
            .map(|_| Voter::new(issue_count, rng))
            .collect();
        Electorate { voters }
    }

    /// Build an electorate from explicit voters, for deterministic setups.
    pub fn from_voters(voters: Vec<Voter>) -> Self {
        Electorate { voters }
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Re-randomize every voter's stances.
    pub fn randomize(&mut self, rng: &mut StdRng) {
        for voter in &mut self.voters {
            voter.randomize(rng);
        }
    }

    /// Vote count per candidate for the given stances.
    pub fn tally(&self, stances: &[Array1<f32>]) -> Vec<usize> {
        let mut votes = vec![0; stances.len()];
        for voter in &self.voters {
            votes[voter.vote(stances)] += 1;
        }
        votes
    }

    /// Index of the candidate with the highest tally; ties go to the earliest.
    pub fn winner(tallies: &[usize]) -> usize {
        let mut winner = 0;
        for (candidate, &votes) in tallies.iter().enumerate() {
            if votes > tallies[winner] {
                winner = candidate;
            }
        }
        winner
    }

    /// Average issue stances of a shuffled sample of `count` voters.
    ///
    /// Shuffles the population in place so repeated calls see different
    /// voters, mirroring partial visibility of the electorate.
    pub fn visible_average_issues(&mut self, count: usize, rng: &mut StdRng) -> Array1<f32> {
        self.voters.shuffle(rng);
        self.voters
            .iter()
            .take(count)
            .map(Voter::average_issue)
            .collect()
    }
}
