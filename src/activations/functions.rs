use std::fmt;
use std::str::FromStr;

use crate::error::HustingsError;

/// Negative slope used by [`Activation::LeakyRelu`].
const LEAKY_SLOPE: f32 = 0.01;

/// An enumeration of the activation functions assignable to a network layer.
///
/// `Linear` and `Input` are both the identity for forward purposes; `Input`
/// marks layer 0, which holds raw inputs and never applies an activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    BinaryStep,
    Linear,
    Input,
}

impl Activation {
    /// Apply the activation function to a single raw value.
    pub fn apply(&self, x: f32) -> f32 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu => x.max(LEAKY_SLOPE * x),
            Activation::BinaryStep => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Linear | Activation::Input => x,
        }
    }

    /// Derivative of the activation, evaluated at the *activated* output `a`.
    ///
    /// Sigmoid and Tanh use the shortcut forms `a * (1 - a)` and `1 - a^2`.
    /// ReLU and LeakyReLU test the sign of `a`, which both functions preserve.
    pub fn derivative(&self, a: f32) -> f32 {
        match self {
            Activation::Sigmoid => a * (1.0 - a),
            Activation::Tanh => 1.0 - a * a,
            Activation::Relu => {
                if a > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu => {
                if a > 0.0 {
                    1.0
                } else {
                    LEAKY_SLOPE
                }
            }
            Activation::BinaryStep => 0.0,
            Activation::Linear | Activation::Input => 1.0,
        }
    }

    /// Canonical name, matching the accepted `FromStr` spellings.
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "Tanh",
            Activation::Relu => "ReLU",
            Activation::LeakyRelu => "LeakyReLU",
            Activation::BinaryStep => "BinaryStep",
            Activation::Linear => "Linear",
            Activation::Input => "Input",
        }
    }
}

impl FromStr for Activation {
    type Err = HustingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sigmoid" => Ok(Activation::Sigmoid),
            "Tanh" => Ok(Activation::Tanh),
            "ReLU" => Ok(Activation::Relu),
            "LeakyReLU" => Ok(Activation::LeakyRelu),
            "BinaryStep" => Ok(Activation::BinaryStep),
            "Linear" => Ok(Activation::Linear),
            "Input" => Ok(Activation::Input),
            other => Err(HustingsError::UnknownActivation {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
