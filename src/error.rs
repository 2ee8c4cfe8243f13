//! Error types used in the [`tensor_seq`](crate) crate.

use crate::tensor::ScalarType;
use crate::value::Tag;

/// Tensor sequence error type.
///
/// All errors are deterministic validation failures: an operator that returns one of these produced no output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A sequence position is outside of the range accepted by the operation.
    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange {
        /// The position as given by the caller, before negative index rewriting.
        index: i64,
        /// The length of the sequence.
        len: usize,
    },

    /// User provided an invalid argument.
    ///
    /// The concrete values that failed validation are logged at the error level.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The element type of a tensor differs from the expected element type.
    #[error("element type mismatch: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        /// The expected element type, usually the sequence element type.
        expected: ScalarType,
        /// The element type of the offending tensor.
        got: ScalarType,
    },

    /// The number of elements of a buffer does not match a shape, or shapes that must agree do not.
    #[error("shape mismatch")]
    ShapeMismatch,

    /// Value is of a different kind than the one required by the operation.
    #[error("invalid value type: expected {expected:?}, got {got:?}")]
    InvalidType {
        /// The required kind.
        expected: Tag,
        /// The kind of the value provided.
        got: Tag,
    },

    /// No operator is registered under the requested op type.
    #[error("operator missing from the registry")]
    OperatorMissing,
}

/// Result alias used by every fallible function of the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
