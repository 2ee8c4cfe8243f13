//! The [`Sequence`] value type: an ordered, type-homogeneous, persistent collection of tensors.
//!
//! Sequences have value semantics. Every method that "modifies" a sequence returns a new sequence and leaves the
//! original untouched, and the tensors are shared between the old and the new sequence rather than copied. A
//! sequence can therefore be read concurrently from many threads without locking.
//!
//! ```rust
//! use tensor_seq::sequence::Sequence;
//! use tensor_seq::tensor::{ScalarType, Tensor};
//!
//! let empty = Sequence::with_dtype(ScalarType::Float);
//! let t = Tensor::from_vec([2], vec![1.0_f32, 2.0]).unwrap();
//!
//! let one = empty.insert(t.clone(), None).unwrap();
//! assert_eq!(empty.len(), 0);
//! assert_eq!(one.len(), 1);
//! assert!(one.at(-1).unwrap().ptr_eq(&t));
//! ```

mod index;
pub use index::{read_index, resolve_index, resolve_insert_position};

use std::sync::Arc;

use crate::tensor::{ScalarType, Tensor};
use crate::{Error, Result};

/// An ordered collection of tensors that all share one element type.
///
/// The element type is fixed when the sequence is created, either explicitly ([`Sequence::with_dtype`]) or by the
/// first tensor ([`Sequence::from_tensors`], or inserting into an untyped sequence created with
/// [`Sequence::new`]), and is invariant thereafter, including when the sequence becomes empty again.
///
/// Cloning a sequence is O(1). [`insert`](Sequence::insert) and [`erase`](Sequence::erase) allocate a new list of
/// tensor handles, but never copy tensor data.
#[derive(Clone, Debug)]
pub struct Sequence {
    dtype: Option<ScalarType>,
    tensors: Arc<[Tensor]>,
}

impl Sequence {
    /// Create an empty sequence without an element type.
    ///
    /// The element type is adopted from the first inserted tensor.
    pub fn new() -> Self {
        Self {
            dtype: None,
            tensors: Arc::from(Vec::new()),
        }
    }

    /// Create an empty sequence with the given element type.
    pub fn with_dtype(dtype: ScalarType) -> Self {
        Self {
            dtype: Some(dtype),
            tensors: Arc::from(Vec::new()),
        }
    }

    /// Create a sequence of the given tensors, in order.
    ///
    /// The element type is the type of the first tensor; an empty list creates an untyped sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the tensors do not all share one element type.
    pub fn from_tensors(tensors: Vec<Tensor>) -> Result<Self> {
        let dtype = tensors.first().map(Tensor::scalar_type);
        if let Some(expected) = dtype {
            for tensor in &tensors {
                check_type(expected, tensor)?;
            }
        }
        Ok(Self {
            dtype,
            tensors: Arc::from(tensors),
        })
    }

    /// Create a sequence of the given tensors with an explicit element type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if a tensor's element type is not `dtype`.
    pub fn from_tensors_with_dtype(dtype: ScalarType, tensors: Vec<Tensor>) -> Result<Self> {
        for tensor in &tensors {
            check_type(dtype, tensor)?;
        }
        Ok(Self {
            dtype: Some(dtype),
            tensors: Arc::from(tensors),
        })
    }

    /// The element type, or `None` for an empty sequence whose type is not fixed yet.
    pub fn dtype(&self) -> Option<ScalarType> {
        self.dtype
    }

    /// The number of tensors in the sequence.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the sequence holds no tensors.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// The tensors of the sequence, in order.
    pub fn tensors(&self) -> &[Tensor] {
        &self.tensors
    }

    /// Get the tensor at a non-negative position.
    pub fn get(&self, index: usize) -> Option<&Tensor> {
        self.tensors.get(index)
    }

    /// Iterate over the tensors of the sequence, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tensor> {
        self.tensors.iter()
    }

    /// Get the tensor at a possibly negative position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if the position is outside `[-len, len)`.
    pub fn at(&self, index: i64) -> Result<&Tensor> {
        let index = resolve_index(index, self.len())?;
        Ok(&self.tensors[index])
    }

    /// Create a new sequence with `tensor` inserted at `position`.
    ///
    /// A `None` position appends. Negative positions count from the end, so `-1` inserts before the last tensor.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if the sequence has an element type and the tensor is of a different type.
    /// - [`Error::IndexOutOfRange`] if the position is outside `[-len, len]`.
    pub fn insert(&self, tensor: Tensor, position: Option<i64>) -> Result<Self> {
        if let Some(dtype) = self.dtype {
            check_type(dtype, &tensor)?;
        }
        let position = match position {
            Some(position) => resolve_insert_position(position, self.len())?,
            None => self.len(),
        };

        let mut tensors = Vec::with_capacity(self.len() + 1);
        tensors.extend_from_slice(&self.tensors[..position]);
        let dtype = tensor.scalar_type();
        tensors.push(tensor);
        tensors.extend_from_slice(&self.tensors[position..]);
        Ok(Self {
            dtype: Some(dtype),
            tensors: Arc::from(tensors),
        })
    }

    /// Create a new sequence with the tensor at `position` removed.
    ///
    /// A `None` position removes the last tensor. The element type is preserved even if the result is empty.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the sequence is empty.
    /// - [`Error::IndexOutOfRange`] if the position is outside `[-len, len)`.
    pub fn erase(&self, position: Option<i64>) -> Result<Self> {
        if self.is_empty() {
            crate::log::error!("can not erase from an empty sequence");
            return Err(Error::InvalidArgument("erase from an empty sequence"));
        }
        let position = match position {
            Some(position) => resolve_index(position, self.len())?,
            None => self.len() - 1,
        };

        let mut tensors = Vec::with_capacity(self.len() - 1);
        tensors.extend_from_slice(&self.tensors[..position]);
        tensors.extend_from_slice(&self.tensors[position + 1..]);
        Ok(Self {
            dtype: self.dtype,
            tensors: Arc::from(tensors),
        })
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Tensor;
    type IntoIter = std::slice::Iter<'a, Tensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_type(expected: ScalarType, tensor: &Tensor) -> Result<()> {
    let got = tensor.scalar_type();
    if got != expected {
        crate::log::error!("sequence element type is {expected:?}, got a tensor of type {got:?}");
        return Err(Error::TypeMismatch { expected, got });
    }
    Ok(())
}
