//! Module for [`Value`] and related types.
//!
//! [`Value`] is the type-erased value passed between the execution engine and the operators: every operator input
//! and output is either a [`Tensor`] or a [`Sequence`].

use crate::sequence::Sequence;
use crate::tensor::Tensor;
use crate::{Error, Result};

/// A tag indicating the type of the value stored in a [`Value`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Tag {
    /// Tag for value [`Tensor`].
    Tensor,
    /// Tag for value [`Sequence`].
    Sequence,
}

/// An operator input or output.
#[derive(Debug, Clone)]
pub enum Value {
    /// A single tensor.
    Tensor(Tensor),
    /// A sequence of tensors.
    Sequence(Sequence),
}

impl Value {
    /// Get the tag indicating the type of the value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Tensor(_) => Tag::Tensor,
            Value::Sequence(_) => Tag::Sequence,
        }
    }

    /// Check if the value is a tensor.
    pub fn is_tensor(&self) -> bool {
        self.tag() == Tag::Tensor
    }

    /// Check if the value is a sequence.
    pub fn is_sequence(&self) -> bool {
        self.tag() == Tag::Sequence
    }

    /// Get a reference to the value as a [`Tensor`].
    ///
    /// # Panics
    ///
    /// Panics if the value is of different type.
    /// To avoid panics, use the [`try_into`][TryInto::try_into] method or check the type of the value with the
    /// [`tag`][Self::tag] method.
    #[track_caller]
    pub fn as_tensor(&self) -> &Tensor {
        match self.try_into() {
            Ok(tensor) => tensor,
            Err(err) => panic!("{err}"),
        }
    }

    /// Get a reference to the value as a [`Sequence`].
    ///
    /// # Panics
    ///
    /// Panics if the value is of different type.
    /// To avoid panics, use the [`try_into`][TryInto::try_into] method or check the type of the value with the
    /// [`tag`][Self::tag] method.
    #[track_caller]
    pub fn as_sequence(&self) -> &Sequence {
        match self.try_into() {
            Ok(sequence) => sequence,
            Err(err) => panic!("{err}"),
        }
    }
}

impl From<Tensor> for Value {
    fn from(tensor: Tensor) -> Self {
        Value::Tensor(tensor)
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Value::Sequence(sequence)
    }
}

impl TryFrom<Value> for Tensor {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Tensor(tensor) => Ok(tensor),
            other => Err(invalid_type(Tag::Tensor, other.tag())),
        }
    }
}

impl TryFrom<Value> for Sequence {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(sequence) => Ok(sequence),
            other => Err(invalid_type(Tag::Sequence, other.tag())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a Tensor {
    type Error = Error;
    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::Tensor(tensor) => Ok(tensor),
            other => Err(invalid_type(Tag::Tensor, other.tag())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a Sequence {
    type Error = Error;
    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::Sequence(sequence) => Ok(sequence),
            other => Err(invalid_type(Tag::Sequence, other.tag())),
        }
    }
}

fn invalid_type(expected: Tag, got: Tag) -> Error {
    crate::log::error!("expected a value of type {expected:?}, got {got:?}");
    Error::InvalidType { expected, got }
}
