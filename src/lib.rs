//! # Hustings - A From-Scratch Q-Learning Election Campaign Simulator
//!
//! Hustings pairs a hand-rolled feed-forward neural network with a simple
//! single-step Q-learning loop in which competing candidates learn issue
//! stances that win votes. The network is deliberately matrix-free: forward
//! and backward passes are explicit per-neuron scalar loops, with no autodiff
//! graph and no batched linear algebra.
//!
//! ## Key Features
//!
//! - **Network**: layered forward propagation, chain-rule backpropagation,
//!   batched epoch training, mutation-based perturbation, binary persistence
//! - **Two-phase inference**: `forward` returns an activation trace that
//!   `backpropagate` consumes, so forward passes never mutate the network
//! - **Replay buffer**: fixed-capacity circular store of transitions, one
//!   slot per agent
//! - **Campaign trainer**: epsilon-greedy action selection over a discrete
//!   stance-perturbation set, TD(0) targets over softmax-normalized outputs
//! - **Reproducibility**: every component owns an explicitly seeded RNG
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hustings::trainer::{CampaignTrainer, TrainerConfig};
//!
//! let config = TrainerConfig::default()
//!     .with_candidates(5)
//!     .with_voters(100, 0.1)
//!     .with_issues(5)
//!     .with_epsilon(0.2);
//!
//! let mut trainer = CampaignTrainer::new(config, 42).unwrap();
//! trainer.train(1000).unwrap();
//! let winner = trainer.exploit_step().unwrap();
//! println!("winner: candidate {winner}");
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Scalar activation functions and their derivatives
//! - [`electorate`] - Voters, vote tallies and election outcomes
//! - [`error`] - Error types and result handling
//! - [`network`] - Core neural network implementation
//! - [`replay_buffer`] - Fixed-slot experience replay
//! - [`trainer`] - The Q-learning campaign driver

pub mod activations;
pub mod electorate;
pub mod error;
pub mod network;
pub mod replay_buffer;
pub mod trainer;

#[cfg(test)]
mod tests;
