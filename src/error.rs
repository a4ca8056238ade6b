use std::fmt;

/// Result type for hustings operations
pub type Result<T> = std::result::Result<T, HustingsError>;

/// Main error type for the hustings library
#[derive(Debug, Clone)]
pub enum HustingsError {
    /// Activation name not recognized at construction time
    UnknownActivation {
        name: String,
    },

    /// Input/output/label vector length does not match the network topology
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Loaded snapshot topology disagrees with the caller-expected topology
    ShapeMismatch {
        expected: String,
        actual: String,
    },

    /// Load path does not exist
    FileNotFound(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },
}

impl fmt::Display for HustingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HustingsError::UnknownActivation { name } => {
                write!(f, "Unknown activation function '{}'", name)
            }
            HustingsError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            HustingsError::ShapeMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, actual)
            }
            HustingsError::FileNotFound(path) => write!(f, "File not found: {}", path),
            HustingsError::IoError(msg) => write!(f, "IO error: {}", msg),
            HustingsError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            HustingsError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for HustingsError {}

// Conversion from std::io::Error
impl From<std::io::Error> for HustingsError {
    fn from(err: std::io::Error) -> Self {
        HustingsError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for HustingsError {
    fn from(err: bincode::Error) -> Self {
        HustingsError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl HustingsError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        HustingsError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn shape_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        HustingsError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        HustingsError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
