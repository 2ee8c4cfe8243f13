//! Immutable tensor values, the elements of a [`Sequence`](crate::sequence::Sequence).
//!
//! A [`Tensor`] is an element type ([`ScalarType`]), a [`TensorShape`], and a reference counted [`Buffer`] holding
//! the elements in row-major order. Tensors are never mutated in place; operators that produce new data allocate
//! new buffers, and operators that only restructure values (sequence insert/erase, squeezing a dimension of size
//! one) share the existing buffers.
//!
//! The [`Scalar`] trait maps Rust element types to their [`ScalarType`], and is used for typed access to the
//! type-erased tensor through [`Tensor::as_slice`] and, with the `ndarray` feature, [`Tensor::as_array`].

mod scalar;
pub use scalar::{Scalar, ScalarType};

mod shape;
pub(crate) use shape::normalize_axis;
pub use shape::TensorShape;

mod buffer;
pub(crate) use buffer::dispatch_buffer;
pub use buffer::Buffer;

mod base;
pub use base::Tensor;

#[cfg(feature = "ndarray")]
mod array;

mod fmt;
