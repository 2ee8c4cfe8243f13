use crate::{Error, Result};

use super::{Buffer, Scalar, ScalarType, TensorShape};

/// An immutable, typed, shaped n-dimensional value.
///
/// A tensor is a [`TensorShape`] and a [`Buffer`] holding exactly `shape.size()` elements in row-major order.
/// Tensors are never mutated after construction. Cloning a tensor is cheap and shares the underlying buffer, so
/// the same tensor can be an element of many sequences at once without being copied.
///
/// ```rust
/// use tensor_seq::tensor::{ScalarType, Tensor};
///
/// let tensor = Tensor::from_vec([2, 3], vec![1_i32, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(tensor.scalar_type(), ScalarType::Int);
/// assert_eq!(tensor.sizes(), &[2, 3]);
///
/// let shared = tensor.clone();
/// assert!(shared.ptr_eq(&tensor));
/// ```
#[derive(Clone)]
pub struct Tensor {
    shape: TensorShape,
    buffer: Buffer,
}

impl Tensor {
    /// Create a tensor from a shape and a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the number of elements in the buffer is not the shape's size.
    pub fn from_buffer(shape: impl Into<TensorShape>, buffer: Buffer) -> Result<Self> {
        let shape = shape.into();
        if shape.checked_size() != Some(buffer.len()) {
            crate::log::error!(
                "buffer of {} elements does not match shape {:?}",
                buffer.len(),
                shape
            );
            return Err(Error::ShapeMismatch);
        }
        Ok(Self { shape, buffer })
    }

    /// Create a tensor from parts already known to agree.
    pub(super) fn from_parts(shape: TensorShape, buffer: Buffer) -> Self {
        debug_assert_eq!(shape.size(), buffer.len());
        Self { shape, buffer }
    }

    /// Create a tensor that takes ownership of the given row-major elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` is not the shape's size.
    pub fn from_vec<T: Scalar>(shape: impl Into<TensorShape>, data: Vec<T>) -> Result<Self> {
        Self::from_buffer(shape, Buffer::from_vec(data))
    }

    /// Create a tensor by copying the given row-major elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` is not the shape's size.
    pub fn from_slice<T: Scalar>(shape: impl Into<TensorShape>, data: &[T]) -> Result<Self> {
        Self::from_vec(shape, data.to_vec())
    }

    /// Create a rank 0 tensor holding a single value.
    pub fn scalar<T: Scalar>(value: T) -> Self {
        Self::from_parts(TensorShape::scalar(), Buffer::from_vec(vec![value]))
    }

    /// The scalar type of the tensor's elements.
    pub fn scalar_type(&self) -> ScalarType {
        self.buffer.scalar_type()
    }

    /// The shape of the tensor.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// The sizes of the tensor's dimensions.
    pub fn sizes(&self) -> &[usize] {
        self.shape.dims()
    }

    /// The size of the tensor's dimension `dim`.
    ///
    /// # Panics
    ///
    /// If `dim` is not smaller than the number of dimensions.
    pub fn size(&self, dim: usize) -> usize {
        self.shape.dims()[dim]
    }

    /// The number of dimensions of the tensor.
    pub fn dim(&self) -> usize {
        self.shape.rank()
    }

    /// The number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    /// The underlying element storage.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Get the elements as a slice of `T` in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `T` is not the tensor's scalar type.
    pub fn as_slice<T: Scalar>(&self) -> Result<&[T]> {
        self.buffer.as_slice().ok_or(Error::TypeMismatch {
            expected: T::TYPE,
            got: self.scalar_type(),
        })
    }

    /// Copy the elements into a new vector of `T` in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `T` is not the tensor's scalar type.
    pub fn to_vec<T: Scalar>(&self) -> Result<Vec<T>> {
        self.as_slice().map(<[T]>::to_vec)
    }

    /// Create a tensor with a different shape over the same buffer, without copying the elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the new shape's size differs from the number of elements.
    pub fn reshape(&self, shape: impl Into<TensorShape>) -> Result<Self> {
        Self::from_buffer(shape, self.buffer.clone())
    }

    /// Returns true if both tensors share the same buffer and have the same shape.
    ///
    /// This is identity, not value equality: two tensors with equal elements in distinct buffers are not
    /// `ptr_eq`.
    pub fn ptr_eq(&self, other: &Tensor) -> bool {
        self.buffer.ptr_eq(&other.buffer) && self.shape == other.shape
    }
}
