//! Error types shared by the bridge and the foreign runtime

/// Result type for bridge and runtime operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge error types.
///
/// Every variant is a contract violation between the native and foreign
/// sides. None of them is retried or recovered from: a failing build never
/// reaches the foreign constructor, and a failing call is handed back to the
/// foreign runtime as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// Flat-map and typed data options used on the same build
    #[error("Cannot combine {first} and {second} data options on one component")]
    DataConflict {
        /// Data option applied first
        first: &'static str,
        /// Data option that collided with it
        second: &'static str,
    },

    /// Method set bound to something that is not a foreign object
    #[error("Invalid bridge target: {0}")]
    InvalidBridgeTarget(String),

    /// Foreign call supplied fewer arguments than the method declares
    #[error("Method '{method}': argument index {index} out of range ({supplied} supplied)")]
    ArgumentOutOfRange {
        /// Bridged method name
        method: String,
        /// First missing argument index
        index: usize,
        /// Number of foreign arguments supplied
        supplied: usize,
    },

    /// Method tagged as taking the instance handle was invoked without one
    #[error("Method '{method}' requires the instance handle")]
    MissingInstance {
        /// Bridged method name
        method: String,
    },

    /// Typed data payload borrowed elsewhere while the bridge needed it
    #[error("Typed data payload is already borrowed")]
    DataBorrowed,

    /// Wrapper invoked after its runtime was dropped
    #[error("Foreign runtime has been dropped")]
    RuntimeDropped,

    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Property access on a value that is not an object
    #[error("Not an object: {0}")]
    NotAnObject(String),

    /// Call on a value that is not a function
    #[error("Not callable: {0}")]
    NotCallable(String),

    /// Constructor name not known to the runtime
    #[error("Unknown constructor: {0}")]
    UnknownConstructor(String),

    /// Error raised inside the foreign runtime
    #[error("{0}")]
    Thrown(String),
}

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::Thrown(s)
    }
}

impl From<&str> for BridgeError {
    fn from(s: &str) -> Self {
        BridgeError::Thrown(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_conflict_message() {
        let err = BridgeError::DataConflict {
            first: "flat",
            second: "typed",
        };
        assert_eq!(
            err.to_string(),
            "Cannot combine flat and typed data options on one component"
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let err = BridgeError::ArgumentOutOfRange {
            method: "add".to_string(),
            index: 1,
            supplied: 1,
        };
        assert!(err.to_string().contains("index 1 out of range"));
    }

    #[test]
    fn test_from_str_is_thrown() {
        assert_eq!(BridgeError::from("boom"), BridgeError::Thrown("boom".into()));
    }
}
