use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::electorate::Electorate;
use crate::error::{HustingsError, Result};
use crate::network::Network;
use crate::replay_buffer::ReplayBuffer;

/// Step applied to a single issue when enumerating candidate actions.
const STANCE_NUDGE: f32 = 0.1;

/// Configuration for a [`CampaignTrainer`].
#[derive(Clone, Debug)]
pub struct TrainerConfig {
    /// Number of learning candidates in the race.
    pub candidate_count: usize,
    /// Number of voters in the electorate.
    pub voter_count: usize,
    /// Fraction of voters whose average stance is visible in the state vector.
    pub visible_fraction: f32,
    /// Number of issues every stance vector covers.
    pub issue_count: usize,
    pub learning_rate: f32,
    /// Probability of picking a uniformly random action instead of the arg-max.
    pub epsilon: f32,
    /// Discount factor for the one-step TD target.
    pub gamma: f32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            candidate_count: 5,
            voter_count: 100,
            visible_fraction: 0.1,
            issue_count: 5,
            learning_rate: 0.1,
            epsilon: 0.1,
            gamma: 0.99,
        }
    }
}

impl TrainerConfig {
    pub fn with_candidates(mut self, count: usize) -> Self {
        self.candidate_count = count;
        self
    }

    pub fn with_voters(mut self, count: usize, visible_fraction: f32) -> Self {
        self.voter_count = count;
        self.visible_fraction = visible_fraction;
        self
    }

    pub fn with_issues(mut self, count: usize) -> Self {
        self.issue_count = count;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Single-step Q-learning driver over an election campaign.
///
/// One shared network scores every candidate's discrete action set (nudge one
/// issue up or down by 0.1, or stand still); its softmax output stands in for
/// the Q-values. Per iteration the trainer randomizes the environment, lets
/// each candidate act epsilon-greedily, resolves the election, stores one
/// transition per candidate in a replay buffer sized to the field, and runs
/// one TD(0) update per slot.
///
/// The softmax normalization bounds every "Q-value" in (0, 1), which caps
/// achievable targets regardless of reward scale. Kept as-is; see DESIGN.md.
pub struct CampaignTrainer {
    config: TrainerConfig,
    network: Network,
    replay: ReplayBuffer,
    electorate: Electorate,
    stances: Vec<Array1<f32>>,
    tallies: Vec<usize>,
    visible_count: usize,
    state_size: usize,
    action_size: usize,
    rng: StdRng,
}

impl CampaignTrainer {
    /// Build a trainer and its network from a config, seeded end to end.
    ///
    /// The network topology tapers from the state size down to the action
    /// size (`[s, s/2, s/3, s/4, actions]`) with Tanh hidden and output
    /// layers, and the replay buffer holds exactly one slot per candidate.
    pub fn new(config: TrainerConfig, seed: u64) -> Result<Self> {
        if config.candidate_count == 0 || config.voter_count == 0 || config.issue_count == 0 {
            return Err(HustingsError::invalid_parameter(
                "config",
                "candidate, voter and issue counts must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&config.epsilon) {
            return Err(HustingsError::invalid_parameter(
                "epsilon",
                "must lie in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&config.visible_fraction) {
            return Err(HustingsError::invalid_parameter(
                "visible_fraction",
                "must lie in [0, 1]",
            ));
        }

        let visible_count = (config.voter_count as f32 * config.visible_fraction) as usize;
        let state_size = visible_count + config.issue_count + config.candidate_count;
        let action_size = config.issue_count * 2 + 1;

        let widths = [
            state_size,
            (state_size / 2).max(1),
            (state_size / 3).max(1),
            (state_size / 4).max(1),
            action_size,
        ];
        let network = Network::from_names(
            &widths,
            &["Input", "Tanh", "Tanh", "Tanh", "Tanh"],
            seed,
        )?;
        let replay = ReplayBuffer::new(config.candidate_count, state_size, 1, 1)?;

        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let electorate = Electorate::new(config.voter_count, config.issue_count, &mut rng);
        let stances = (0..config.candidate_count)
            .map(|_| {
                Array1::from_shape_fn(config.issue_count, |_| rng.gen_range(-1.0..=1.0))
            })
            .collect();
        let tallies = vec![0; config.candidate_count];

        Ok(CampaignTrainer {
            config,
            network,
            replay,
            electorate,
            stances,
            tallies,
            visible_count,
            state_size,
            action_size,
            rng,
        })
    }

    /// Run `iterations` full environment/update cycles.
    pub fn train(&mut self, iterations: usize) -> Result<()> {
        info!(iterations, "started campaign training");
        for iteration in 0..iterations {
            let loss = self.step()?;
            debug!(iteration, loss = loss as f64, "completed training iteration");
        }
        info!("finished campaign training");
        Ok(())
    }

    /// One full cycle: randomize the environment, act epsilon-greedily for
    /// every candidate, resolve the election, record transitions and run one
    /// TD(0) update per replay slot. Returns the mean squared TD error.
    pub fn step(&mut self) -> Result<f32> {
        self.electorate.randomize(&mut self.rng);
        self.randomize_stances();

        let candidate_count = self.config.candidate_count;
        let mut states = Vec::with_capacity(candidate_count);
        let mut actions = Vec::with_capacity(candidate_count);

        // Aggregate standings are frozen before anyone acts; every candidate
        // sees the same pre-action field.
        let averages = self.average_stances();
        for candidate in 0..candidate_count {
            let visible = self
                .electorate
                .visible_average_issues(self.visible_count, &mut self.rng);
            let state = compose_state(&visible, &self.stances[candidate], &averages);
            let moves = candidate_stances(&self.stances[candidate]);
            let (q_values, _) = self.network.output_softmax(state.view())?;
            let index = self.select_action(&q_values);
            self.stances[candidate] = moves[index].clone();

            states.push(state);
            actions.push(Array1::from(vec![index as f32]));
        }

        // Next states are full state vectors observed after every candidate
        // has moved.
        let next_averages = self.average_stances();
        let mut next_states = Vec::with_capacity(candidate_count);
        for candidate in 0..candidate_count {
            let visible = self
                .electorate
                .visible_average_issues(self.visible_count, &mut self.rng);
            next_states.push(compose_state(
                &visible,
                &self.stances[candidate],
                &next_averages,
            ));
        }

        self.tallies = self.electorate.tally(&self.stances);
        let winner = Electorate::winner(&self.tallies);
        for candidate in 0..candidate_count {
            let mut reward = self.tallies[candidate] as f32;
            if candidate == winner {
                reward *= 2.0;
            }
            reward /= self.config.voter_count as f32;

            self.replay.add(
                states[candidate].clone(),
                actions[candidate].clone(),
                Array1::from(vec![reward]),
                next_states[candidate].clone(),
            )?;
        }

        self.train_step()
    }

    /// One TD(0) update per replay slot. Returns the mean squared TD error.
    fn train_step(&mut self) -> Result<f32> {
        let mut total_loss = 0.0;
        for slot in 0..self.replay.capacity() {
            let transition = self.replay.get(slot)?.clone();
            let (next_q, _) = self.network.output_softmax(transition.next_state.view())?;
            let (current_q, trace) = self.network.output_softmax(transition.state.view())?;

            let reward = transition.reward[0];
            let target = reward + self.config.gamma * next_q.fold(f32::MIN, |a, &b| a.max(b));
            let action = transition.action[0] as usize;
            let td_error = target - current_q[action];
            total_loss += td_error * td_error;

            let mut expected = current_q;
            expected[action] = target;
            self.network
                .backpropagate(&trace, expected.view(), self.config.learning_rate)?;
        }
        Ok(total_loss / self.replay.capacity() as f32)
    }

    /// Pure greedy deployment step: every candidate adopts its arg-max move,
    /// then the election is resolved with no learning. Returns the winner.
    pub fn exploit_step(&mut self) -> Result<usize> {
        // One visible sample and one aggregate-standings vector for the whole
        // field, computed before anyone moves.
        let visible = self
            .electorate
            .visible_average_issues(self.visible_count, &mut self.rng);
        let averages = self.average_stances();
        for candidate in 0..self.config.candidate_count {
            let state = compose_state(&visible, &self.stances[candidate], &averages);
            let moves = candidate_stances(&self.stances[candidate]);
            let (q_values, _) = self.network.output_softmax(state.view())?;
            let index = arg_max(&q_values);
            self.stances[candidate] = moves[index].clone();
        }
        self.tallies = self.electorate.tally(&self.stances);
        Ok(Electorate::winner(&self.tallies))
    }

    /// Epsilon-greedy pick over the candidate-action set: the arg-max of the
    /// scores, or a uniformly random index with probability epsilon.
    pub fn select_action(&mut self, q_values: &Array1<f32>) -> usize {
        if self.rng.gen::<f32>() < self.config.epsilon {
            self.rng.gen_range(0..self.action_size)
        } else {
            arg_max(q_values)
        }
    }

    /// Mean stance across issues, per candidate.
    fn average_stances(&self) -> Array1<f32> {
        self.stances
            .iter()
            .map(|stance| stance.mean().unwrap_or(0.0))
            .collect()
    }

    /// Re-draw every candidate stance uniformly from [-1, 1].
    pub fn randomize_stances(&mut self) {
        for stance in &mut self.stances {
            for value in stance.iter_mut() {
                *value = self.rng.gen_range(-1.0..=1.0);
            }
        }
    }

    /// Randomly perturb the network's weights and biases, for evolutionary
    /// variation between training rounds.
    pub fn perturb_network(&mut self, mutate_rate: f32, mutate_amount: f32) {
        self.network.mutate(mutate_rate, mutate_amount);
    }

    pub fn update_epsilon(&mut self, epsilon: f32) {
        self.config.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    pub fn stances(&self) -> &[Array1<f32>] {
        &self.stances
    }

    pub fn tallies(&self) -> &[usize] {
        &self.tallies
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }
}

/// Enumerate the candidate-action set for a stance: the unchanged stance
/// first, then each issue nudged up and down by 0.1, clamped to [-1, 1].
/// Indices line up with the network's output layer.
pub fn candidate_stances(stance: &Array1<f32>) -> Vec<Array1<f32>> {
    let mut moves = Vec::with_capacity(stance.len() * 2 + 1);
    moves.push(stance.clone());
    for issue in 0..stance.len() {
        let mut up = stance.clone();
        up[issue] = (up[issue] + STANCE_NUDGE).clamp(-1.0, 1.0);
        moves.push(up);
        let mut down = stance.clone();
        down[issue] = (down[issue] - STANCE_NUDGE).clamp(-1.0, 1.0);
        moves.push(down);
    }
    moves
}

/// State vector for one candidate: visible voters' average issues, then the
/// candidate's own stance, then every candidate's average stance.
fn compose_state(
    visible: &Array1<f32>,
    stance: &Array1<f32>,
    averages: &Array1<f32>,
) -> Array1<f32> {
    visible
        .iter()
        .chain(stance.iter())
        .chain(averages.iter())
        .copied()
        .collect()
}

fn arg_max(values: &Array1<f32>) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = index;
        }
    }
    best
}
