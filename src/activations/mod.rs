//! # Activation Functions Module
//!
//! Scalar activation functions applied per neuron during forward propagation,
//! together with their derivatives for backpropagation.
//!
//! ## Available Activations
//!
//! - **Sigmoid**: `1 / (1 + e^(-x))` - Outputs between 0 and 1
//! - **Tanh**: Hyperbolic tangent - Outputs between -1 and 1
//! - **ReLU** (Rectified Linear Unit): `max(0, x)`
//! - **LeakyReLU**: ReLU with a fixed 0.01 negative slope
//! - **BinaryStep**: `1` if `x > 0`, else `0`
//! - **Linear**: Identity function - No transformation
//! - **Input**: Identity, reserved for the input layer which holds raw values
//!
//! ## Usage Example
//!
//! ```rust
//! use hustings::activations::Activation;
//!
//! let tanh: Activation = "Tanh".parse().unwrap();
//! assert!((tanh.apply(0.5) - 0.5f32.tanh()).abs() < 1e-6);
//! ```
//!
//! Derivatives are evaluated on the *activated* value rather than the raw
//! pre-activation, which matches the standard backprop shortcuts for Sigmoid
//! (`a * (1 - a)`) and Tanh (`1 - a^2`).

pub mod functions;

pub use functions::Activation;
