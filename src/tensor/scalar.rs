use std::sync::Arc;

use super::Buffer;

/// Data types (dtypes) that can be used as element types in tensors and sequences.
///
/// The discriminants are the ONNX `TensorProto.DataType` codes, which is also the encoding used by the `dtype`
/// attribute of [`SequenceEmpty`](crate::ops::SequenceEmpty).
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScalarType {
    /// 32-bit floating point, `f32`
    Float = 1,
    /// 8-bit unsigned integer, `u8`
    Byte = 2,
    /// 8-bit signed, integer, `i8`
    Char = 3,
    /// 16-bit unsigned integer, `u16`
    UInt16 = 4,
    /// 16-bit signed integer, `i16`
    Short = 5,
    /// 32-bit signed integer, `i32`
    Int = 6,
    /// 64-bit signed integer, `i64`
    Long = 7,
    /// Variable length UTF-8 string, `String`
    String = 8,
    /// Boolean, `bool`
    Bool = 9,
    /// 16-bit floating point, [`tensor_seq::scalar::f16`](`crate::scalar::f16`).
    Half = 10,
    /// 64-bit floating point, `f64`
    Double = 11,
    /// 32-bit unsigned integer, `u32`
    UInt32 = 12,
    /// 64-bit unsigned integer, `u64`
    UInt64 = 13,
    /// 32-bit complex floating point, [`tensor_seq::scalar::Complex<f32>`](`crate::scalar::Complex`).
    ComplexFloat = 14,
    /// 64-bit complex floating point, [`tensor_seq::scalar::Complex<f64>`](`crate::scalar::Complex`).
    ComplexDouble = 15,
    /// 16-bit floating point using the bfloat16 format, [`tensor_seq::scalar::bf16`](`crate::scalar::bf16`).
    BFloat16 = 16,
}
impl ScalarType {
    const ALL: [ScalarType; 16] = [
        ScalarType::Float,
        ScalarType::Byte,
        ScalarType::Char,
        ScalarType::UInt16,
        ScalarType::Short,
        ScalarType::Int,
        ScalarType::Long,
        ScalarType::String,
        ScalarType::Bool,
        ScalarType::Half,
        ScalarType::Double,
        ScalarType::UInt32,
        ScalarType::UInt64,
        ScalarType::ComplexFloat,
        ScalarType::ComplexDouble,
        ScalarType::BFloat16,
    ];

    /// Get the scalar type matching an ONNX `TensorProto.DataType` code, if it is supported.
    pub fn from_onnx(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.onnx() == code)
    }

    /// The ONNX `TensorProto.DataType` code of this scalar type.
    pub fn onnx(self) -> i64 {
        self as u8 as i64
    }
}

/// A trait for types that can be used as scalar types in tensors.
pub trait Scalar: Clone + Send + Sync + 'static {
    /// The [`ScalarType`] enum variant of the implementing type.
    const TYPE: ScalarType;

    #[doc(hidden)]
    fn __into_buffer(data: Arc<[Self]>) -> Buffer;

    #[doc(hidden)]
    fn __from_buffer(buffer: &Buffer) -> Option<&Arc<[Self]>>;

    private_decl! {}
}
macro_rules! impl_scalar {
    ($rust_type:ty, $scalar_type_variant:ident) => {
        impl Scalar for $rust_type {
            const TYPE: ScalarType = ScalarType::$scalar_type_variant;

            fn __into_buffer(data: Arc<[Self]>) -> Buffer {
                Buffer::$scalar_type_variant(data)
            }

            fn __from_buffer(buffer: &Buffer) -> Option<&Arc<[Self]>> {
                match buffer {
                    Buffer::$scalar_type_variant(data) => Some(data),
                    _ => None,
                }
            }

            private_impl! {}
        }
    };
}

impl_scalar!(f32, Float);
impl_scalar!(u8, Byte);
impl_scalar!(i8, Char);
impl_scalar!(u16, UInt16);
impl_scalar!(i16, Short);
impl_scalar!(i32, Int);
impl_scalar!(i64, Long);
impl_scalar!(String, String);
impl_scalar!(bool, Bool);
impl_scalar!(crate::scalar::f16, Half);
impl_scalar!(f64, Double);
impl_scalar!(u32, UInt32);
impl_scalar!(u64, UInt64);
impl_scalar!(crate::scalar::Complex<f32>, ComplexFloat);
impl_scalar!(crate::scalar::Complex<f64>, ComplexDouble);
impl_scalar!(crate::scalar::bf16, BFloat16);
