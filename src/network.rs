use ndarray::{Array1, Array2, ArrayView1};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{HustingsError, Result};

/// A feed-forward network with one activation kind per layer, per-layer bias
/// vectors and per-transition weight matrices.
///
/// Propagation is matrix-free: every forward and backward pass runs explicit
/// per-neuron scalar loops over contiguous per-layer tensors. Weight matrix
/// `i` has shape `(widths[i+1], widths[i])`, indexed destination-major.
///
/// Forward passes do not mutate the network. Each call returns the output
/// together with an [`ActivationTrace`] capturing the per-layer activations;
/// [`Network::backpropagate`] consumes that trace, so independent forward
/// passes can run side by side while weight updates serialize on `&mut self`.
///
/// # Example
///
/// ```rust
/// use hustings::network::Network;
/// use hustings::activations::Activation;
///
/// let mut network = Network::new(
///     &[4, 8, 3],
///     &[Activation::Input, Activation::Tanh, Activation::Sigmoid],
///     42,
/// ).unwrap();
///
/// let input = ndarray::arr1(&[0.1, -0.2, 0.3, 0.0]);
/// let (output, trace) = network.forward(input.view()).unwrap();
/// assert_eq!(output.len(), 3);
///
/// let target = ndarray::arr1(&[1.0, 0.0, 0.0]);
/// network.backpropagate(&trace, target.view(), 0.1).unwrap();
/// ```
pub struct Network {
    widths: Vec<usize>,
    activations: Vec<Activation>,
    /// One bias vector per layer. Layer 0 is initialized like the rest but
    /// never enters forward propagation.
    biases: Vec<Array1<f32>>,
    /// One weight matrix per layer transition, shape `(widths[i+1], widths[i])`.
    weights: Vec<Array2<f32>>,
    rng: StdRng,
}

/// Per-layer activations recorded by a single forward pass.
///
/// Opaque to callers; produced by [`Network::forward`] or
/// [`Network::output_softmax`] and consumed by [`Network::backpropagate`].
pub struct ActivationTrace {
    layers: Vec<Array1<f32>>,
}

impl ActivationTrace {
    /// Activations of the final layer for this pass.
    pub fn output(&self) -> ArrayView1<f32> {
        self.layers[self.layers.len() - 1].view()
    }
}

/// The persisted form of a network: topology plus learned parameters.
///
/// Activation kinds are deliberately not part of the snapshot; they must be
/// supplied again on load and are validated against the stored topology.
#[derive(Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub widths: Vec<usize>,
    pub biases: Vec<Array1<f32>>,
    pub weights: Vec<Array2<f32>>,
}

impl Network {
    /// Create a new network with the given layer widths and per-layer
    /// activation kinds, seeded for reproducible initialization.
    ///
    /// Biases are drawn uniformly from [-1, 1]. Weights for each transition
    /// are drawn uniformly from the Xavier bound `±sqrt(6 / (fan_in + fan_out))`.
    pub fn new(widths: &[usize], activations: &[Activation], seed: u64) -> Result<Self> {
        Self::validate_topology(widths, activations)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let biases = widths
            .iter()
            .map(|&w| Array1::random_using(w, Uniform::new(-1.0, 1.0), &mut rng))
            .collect();
        let weights = widths
            .windows(2)
            .map(|pair| {
                let (fan_in, fan_out) = (pair[0], pair[1]);
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using((fan_out, fan_in), Uniform::new(-limit, limit), &mut rng)
            })
            .collect();

        Ok(Network {
            widths: widths.to_vec(),
            activations: activations.to_vec(),
            biases,
            weights,
            rng,
        })
    }

    /// Create a network from activation names such as `"Tanh"` or `"ReLU"`.
    /// Fails with `UnknownActivation` on any unrecognized name.
    pub fn from_names(widths: &[usize], names: &[&str], seed: u64) -> Result<Self> {
        let activations = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Activation>>>()?;
        Self::new(widths, &activations, seed)
    }

    /// Rebuild a network from a persisted snapshot, reusing its biases and
    /// weights verbatim.
    ///
    /// The caller-expected `widths` must match the snapshot topology exactly
    /// (length and per-element); fails with `ShapeMismatch` otherwise.
    pub fn from_snapshot(
        snapshot: NetworkSnapshot,
        widths: &[usize],
        activations: &[Activation],
        seed: u64,
    ) -> Result<Self> {
        Self::validate_topology(widths, activations)?;

        if widths != snapshot.widths.as_slice() {
            return Err(HustingsError::shape_mismatch(
                format!("layer widths {:?}", widths),
                format!("snapshot widths {:?}", snapshot.widths),
            ));
        }
        if snapshot.biases.len() != widths.len()
            || snapshot.weights.len() != widths.len() - 1
            || snapshot
                .biases
                .iter()
                .zip(widths)
                .any(|(b, &w)| b.len() != w)
            || snapshot
                .weights
                .iter()
                .zip(widths.windows(2))
                .any(|(m, pair)| m.dim() != (pair[1], pair[0]))
        {
            return Err(HustingsError::shape_mismatch(
                format!("tensors consistent with widths {:?}", widths),
                "snapshot with inconsistent bias/weight shapes".to_string(),
            ));
        }

        Ok(Network {
            widths: widths.to_vec(),
            activations: activations.to_vec(),
            biases: snapshot.biases,
            weights: snapshot.weights,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn validate_topology(widths: &[usize], activations: &[Activation]) -> Result<()> {
        if widths.len() < 2 {
            return Err(HustingsError::invalid_parameter(
                "widths",
                "network needs at least an input and an output layer",
            ));
        }
        if widths.len() != activations.len() {
            return Err(HustingsError::invalid_parameter(
                "activations",
                "one activation kind is required per layer",
            ));
        }
        if widths.iter().any(|&w| w == 0) {
            return Err(HustingsError::invalid_parameter(
                "widths",
                "layer widths must be positive",
            ));
        }
        Ok(())
    }

    /// Layer widths of this network, input layer first.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Structural equality check against a candidate topology: same number of
    /// layers and the same width at every position.
    pub fn size_matches(&self, widths: &[usize]) -> bool {
        self.widths.as_slice() == widths
    }

    /// Replace all weight matrices. Shapes must match the topology.
    pub fn with_weights(mut self, weights: Vec<Array2<f32>>) -> Self {
        assert_eq!(weights.len(), self.weights.len());
        for (new, old) in weights.iter().zip(&self.weights) {
            assert_eq!(new.dim(), old.dim());
        }
        self.weights = weights;
        self
    }

    /// Replace all bias vectors. Shapes must match the topology.
    pub fn with_biases(mut self, biases: Vec<Array1<f32>>) -> Self {
        assert_eq!(biases.len(), self.biases.len());
        for (new, old) in biases.iter().zip(&self.biases) {
            assert_eq!(new.dim(), old.dim());
        }
        self.biases = biases;
        self
    }

    /// Propagate an input vector through the network.
    ///
    /// Returns the final-layer activations together with the trace of every
    /// layer's activations for a later [`Network::backpropagate`] call. Fails
    /// with `DimensionMismatch` before any computation if the input length
    /// does not equal the input-layer width.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<(Array1<f32>, ActivationTrace)> {
        if input.len() != self.widths[0] {
            return Err(HustingsError::dimension_mismatch(
                format!("input of length {}", self.widths[0]),
                format!("length {}", input.len()),
            ));
        }

        let mut layers = Vec::with_capacity(self.widths.len());
        layers.push(input.to_owned());
        for i in 1..self.widths.len() {
            let previous = &layers[i - 1];
            let transition = &self.weights[i - 1];
            let mut current = Array1::zeros(self.widths[i]);
            for j in 0..self.widths[i] {
                let mut raw = self.biases[i][j];
                for k in 0..previous.len() {
                    raw += previous[k] * transition[[j, k]];
                }
                current[j] = self.activations[i].apply(raw);
            }
            layers.push(current);
        }

        let output = layers[layers.len() - 1].clone();
        Ok((output, ActivationTrace { layers }))
    }

    /// Propagate an input and softmax-normalize the final-layer activations.
    ///
    /// The exponentials are taken of the *activated* outputs rather than raw
    /// logits, and the returned trace carries the softmax values in its final
    /// layer, so a subsequent backpropagation sees them as the actual output.
    /// Both behaviors are kept deliberately (see DESIGN.md).
    pub fn output_softmax(
        &self,
        input: ArrayView1<f32>,
    ) -> Result<(Array1<f32>, ActivationTrace)> {
        let (output, mut trace) = self.forward(input)?;
        let mut softmax = output.mapv(f32::exp);
        let sum = softmax.sum();
        softmax /= sum;
        let last = trace.layers.len() - 1;
        trace.layers[last] = softmax.clone();
        Ok((softmax, trace))
    }

    /// Update weights and biases from one recorded forward pass toward an
    /// expected output, with plain per-sample gradient steps.
    ///
    /// Output-layer error is `(expected - actual) * act'(actual)`; hidden
    /// errors are propagated through the transposed weights. No momentum, no
    /// weight decay, no gradient accumulation.
    pub fn backpropagate(
        &mut self,
        trace: &ActivationTrace,
        expected: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<()> {
        let last = self.widths.len() - 1;
        if expected.len() != self.widths[last] {
            return Err(HustingsError::dimension_mismatch(
                format!("expected output of length {}", self.widths[last]),
                format!("length {}", expected.len()),
            ));
        }
        if trace.layers.len() != self.widths.len()
            || trace.layers.iter().zip(&self.widths).any(|(a, &w)| a.len() != w)
        {
            return Err(HustingsError::dimension_mismatch(
                format!("activation trace for widths {:?}", self.widths),
                "trace from a different topology".to_string(),
            ));
        }

        let mut errors: Vec<Array1<f32>> = self
            .widths
            .iter()
            .map(|&w| Array1::zeros(w))
            .collect();

        for j in 0..self.widths[last] {
            let actual = trace.layers[last][j];
            errors[last][j] =
                (expected[j] - actual) * self.activations[last].derivative(actual);
        }
        for i in (1..last).rev() {
            for j in 0..self.widths[i] {
                let mut error = 0.0;
                for k in 0..self.widths[i + 1] {
                    error += errors[i + 1][k] * self.weights[i][[k, j]];
                }
                errors[i][j] = error * self.activations[i].derivative(trace.layers[i][j]);
            }
        }

        for i in 0..self.weights.len() {
            for j in 0..self.widths[i + 1] {
                for k in 0..self.widths[i] {
                    self.weights[i][[j, k]] +=
                        trace.layers[i][k] * errors[i + 1][j] * learning_rate;
                }
            }
        }
        for i in 1..self.biases.len() {
            for j in 0..self.widths[i] {
                self.biases[i][j] += errors[i][j] * learning_rate;
            }
        }

        Ok(())
    }

    /// Train over a dataset for a number of epochs.
    ///
    /// Each epoch reshuffles the sample order (Fisher-Yates) and walks it in
    /// batches of `batch_size` (the last batch may be short). Every sample
    /// still updates weights immediately; batching only controls shuffle
    /// granularity.
    pub fn learn(
        &mut self,
        inputs: &[Array1<f32>],
        targets: &[Array1<f32>],
        epochs: usize,
        learning_rate: f32,
        batch_size: usize,
    ) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(HustingsError::dimension_mismatch(
                format!("{} target vectors", inputs.len()),
                format!("{}", targets.len()),
            ));
        }
        if batch_size == 0 {
            return Err(HustingsError::invalid_parameter(
                "batch_size",
                "must be positive",
            ));
        }

        let mut indices: Vec<usize> = (0..inputs.len()).collect();
        for _ in 0..epochs {
            indices.shuffle(&mut self.rng);
            for batch in indices.chunks(batch_size) {
                for &sample in batch {
                    let (_, trace) = self.forward(inputs[sample].view())?;
                    self.backpropagate(&trace, targets[sample].view(), learning_rate)?;
                }
            }
        }
        Ok(())
    }

    /// Perturb every weight and bias independently: with probability
    /// `mutate_rate`, add uniform noise from [-mutate_amount, mutate_amount].
    ///
    /// Used for evolutionary variation, not gradient learning.
    pub fn mutate(&mut self, mutate_rate: f32, mutate_amount: f32) {
        for transition in &mut self.weights {
            for weight in transition.iter_mut() {
                if self.rng.gen::<f32>() < mutate_rate {
                    *weight += self.rng.gen_range(-mutate_amount..=mutate_amount);
                }
            }
        }
        for layer in &mut self.biases {
            for bias in layer.iter_mut() {
                if self.rng.gen::<f32>() < mutate_rate {
                    *bias += self.rng.gen_range(-mutate_amount..=mutate_amount);
                }
            }
        }
    }

    /// Clone the persistable state: topology, biases and weights.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            widths: self.widths.clone(),
            biases: self.biases.clone(),
            weights: self.weights.clone(),
        }
    }

    /// Serialize the snapshot to a binary file.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(&self.snapshot())?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Deserialize a snapshot from a binary file and rebuild the network.
    ///
    /// Activation kinds are not stored; they are supplied here and validated
    /// against the stored topology via [`Network::from_snapshot`].
    pub fn load(
        path: &str,
        widths: &[usize],
        activations: &[Activation],
        seed: u64,
    ) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(HustingsError::FileNotFound(path.to_string()));
        }
        let data = fs::read(path)?;
        let snapshot: NetworkSnapshot = bincode::deserialize(&data)?;
        Self::from_snapshot(snapshot, widths, activations, seed)
    }
}
