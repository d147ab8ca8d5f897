//! Value graph errors

use thiserror::Error;

/// Result type for operations on composite values
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised when a composite value rejects an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The composite was deep-frozen; nothing about it may change.
    #[error("Cannot modify frozen {shape}")]
    Frozen { shape: &'static str },

    /// The map was sealed; its key set is fixed.
    #[error("Cannot {action} key \"{key}\" on sealed map")]
    Sealed { action: &'static str, key: String },

    /// List index outside `0..len`.
    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A self-referential graph cannot be exported as plain JSON.
    #[error("Cannot export self-referential {shape} as plain JSON")]
    Cycle { shape: &'static str },
}

impl ValueError {
    pub(crate) fn frozen(shape: &'static str) -> Self {
        ValueError::Frozen { shape }
    }

    pub(crate) fn sealed(action: &'static str, key: impl Into<String>) -> Self {
        ValueError::Sealed {
            action,
            key: key.into(),
        }
    }
}
