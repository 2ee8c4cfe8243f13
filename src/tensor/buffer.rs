use std::sync::Arc;

use crate::scalar::{bf16, f16, Complex};

use super::{Scalar, ScalarType};

/// Immutable, reference counted element storage of a tensor.
///
/// Each variant holds the elements of one [`ScalarType`] in row-major order. Cloning a buffer only increments a
/// reference count, the elements themselves are never copied or mutated, which is what allows tensors to be shared
/// between sequences and threads.
#[derive(Clone)]
pub enum Buffer {
    /// `f32` elements.
    Float(Arc<[f32]>),
    /// `u8` elements.
    Byte(Arc<[u8]>),
    /// `i8` elements.
    Char(Arc<[i8]>),
    /// `u16` elements.
    UInt16(Arc<[u16]>),
    /// `i16` elements.
    Short(Arc<[i16]>),
    /// `i32` elements.
    Int(Arc<[i32]>),
    /// `i64` elements.
    Long(Arc<[i64]>),
    /// `String` elements.
    String(Arc<[String]>),
    /// `bool` elements.
    Bool(Arc<[bool]>),
    /// [`f16`] elements.
    Half(Arc<[f16]>),
    /// `f64` elements.
    Double(Arc<[f64]>),
    /// `u32` elements.
    UInt32(Arc<[u32]>),
    /// `u64` elements.
    UInt64(Arc<[u64]>),
    /// [`Complex<f32>`] elements.
    ComplexFloat(Arc<[Complex<f32>]>),
    /// [`Complex<f64>`] elements.
    ComplexDouble(Arc<[Complex<f64>]>),
    /// [`bf16`] elements.
    BFloat16(Arc<[bf16]>),
}

/// Evaluate an expression with the typed elements of a [`Buffer`].
///
/// The body is expanded once per variant with `$data` bound to the variant's `Arc<[T]>`, so it must type check for
/// every [`Scalar`] type.
macro_rules! dispatch_buffer {
    ($buffer:expr, |$data:ident| $body:expr) => {
        match $buffer {
            $crate::tensor::Buffer::Float($data) => $body,
            $crate::tensor::Buffer::Byte($data) => $body,
            $crate::tensor::Buffer::Char($data) => $body,
            $crate::tensor::Buffer::UInt16($data) => $body,
            $crate::tensor::Buffer::Short($data) => $body,
            $crate::tensor::Buffer::Int($data) => $body,
            $crate::tensor::Buffer::Long($data) => $body,
            $crate::tensor::Buffer::String($data) => $body,
            $crate::tensor::Buffer::Bool($data) => $body,
            $crate::tensor::Buffer::Half($data) => $body,
            $crate::tensor::Buffer::Double($data) => $body,
            $crate::tensor::Buffer::UInt32($data) => $body,
            $crate::tensor::Buffer::UInt64($data) => $body,
            $crate::tensor::Buffer::ComplexFloat($data) => $body,
            $crate::tensor::Buffer::ComplexDouble($data) => $body,
            $crate::tensor::Buffer::BFloat16($data) => $body,
        }
    };
}
pub(crate) use dispatch_buffer;

impl Buffer {
    /// Create a buffer that takes ownership of the given elements.
    pub fn from_vec<T: Scalar>(data: Vec<T>) -> Self {
        T::__into_buffer(Arc::from(data))
    }

    /// The scalar type of the elements.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Buffer::Float(_) => ScalarType::Float,
            Buffer::Byte(_) => ScalarType::Byte,
            Buffer::Char(_) => ScalarType::Char,
            Buffer::UInt16(_) => ScalarType::UInt16,
            Buffer::Short(_) => ScalarType::Short,
            Buffer::Int(_) => ScalarType::Int,
            Buffer::Long(_) => ScalarType::Long,
            Buffer::String(_) => ScalarType::String,
            Buffer::Bool(_) => ScalarType::Bool,
            Buffer::Half(_) => ScalarType::Half,
            Buffer::Double(_) => ScalarType::Double,
            Buffer::UInt32(_) => ScalarType::UInt32,
            Buffer::UInt64(_) => ScalarType::UInt64,
            Buffer::ComplexFloat(_) => ScalarType::ComplexFloat,
            Buffer::ComplexDouble(_) => ScalarType::ComplexDouble,
            Buffer::BFloat16(_) => ScalarType::BFloat16,
        }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        dispatch_buffer!(self, |data| data.len())
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the elements as a slice of `T`, or `None` if `T` is not the buffer's scalar type.
    pub fn as_slice<T: Scalar>(&self) -> Option<&[T]> {
        T::__from_buffer(self).map(|data| &data[..])
    }

    /// Returns true if both buffers point to the same allocation.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }

    fn as_ptr(&self) -> *const () {
        dispatch_buffer!(self, |data| Arc::as_ptr(data) as *const ())
    }
}
