use thiserror::Error;

/// Main error type for SPSA runs
#[derive(Error, Debug)]
pub enum SpsaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Objective failed at iteration {iteration}: {source}")]
    Objective {
        iteration: usize,
        /// Last fully-updated parameter vector before the failing evaluation.
        theta: Vec<f64>,
        #[source]
        source: ObjectiveError,
    },

    #[error("Objective returned non-finite value {value} at iteration {iteration}")]
    NonFinite { iteration: usize, value: f64 },
}

/// Failure raised by a caller-supplied objective function.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ObjectiveError {
    message: String,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ObjectiveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`.
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ObjectiveError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ObjectiveError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Result type alias for SPSA operations
pub type SpsaResult<T> = Result<T, SpsaError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::SpsaError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = SpsaError::DimensionMismatch {
            what: "theta_min".to_string(),
            expected: 3,
            actual: 2,
        };

        assert!(error.to_string().contains("theta_min"));
        assert!(error.to_string().contains('3'));
        assert!(error.to_string().contains('2'));
    }

    #[test]
    fn test_objective_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ObjectiveError::with_cause("could not load data", io);
        assert_eq!(err.message(), "could not load data");
        assert!(err.source().is_some());

        let wrapped = SpsaError::Objective {
            iteration: 4,
            theta: vec![1.0],
            source: err,
        };
        assert!(wrapped.to_string().contains("iteration 4"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_config_macro() {
        let config_err = config_error!("Missing required field: {}", "n_iter");
        assert!(config_err.to_string().contains("n_iter"));
    }
}
