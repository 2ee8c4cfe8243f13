//! Position resolution shared by the sequence operators.
//!
//! Positions are signed. A negative position `p` over a sequence of length `n` is rewritten once to `p + n`, and
//! the result is then checked against the range accepted by the operation:
//! - element access ([`SequenceAt`](crate::ops::SequenceAt), [`SequenceErase`](crate::ops::SequenceErase)):
//!   `[0, n)`, so the caller may pass any position in `[-n, n)`.
//! - insertion ([`SequenceInsert`](crate::ops::SequenceInsert)): `[0, n]`, position `n` appends.

use crate::tensor::{ScalarType, Tensor};
use crate::{Error, Result};

/// Resolve a position of an existing element of a sequence of length `len`.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfRange`] if the position is outside `[-len, len)`, which is always the case for an
/// empty sequence.
pub fn resolve_index(index: i64, len: usize) -> Result<usize> {
    resolve(index, len, len)
}

/// Resolve an insertion position in a sequence of length `len`.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfRange`] if the position is outside `[-len, len]`.
pub fn resolve_insert_position(index: i64, len: usize) -> Result<usize> {
    resolve(index, len, len + 1)
}

fn resolve(index: i64, len: usize, end: usize) -> Result<usize> {
    let resolved = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if resolved < 0 || resolved >= end as i64 {
        crate::log::error!(
            "invalid sequence index {index} for a sequence of length {len}, accepted range is [{}, {})",
            -(len as i64),
            end
        );
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Read a position from an index tensor.
///
/// The tensor must hold exactly one element of type [`ScalarType::Int`] or [`ScalarType::Long`], usually as a rank
/// 0 tensor.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for any other element type or element count.
pub fn read_index(tensor: &Tensor) -> Result<i64> {
    if tensor.numel() != 1 {
        crate::log::error!(
            "sequence index must hold a single element, got a tensor of shape {:?}",
            tensor.shape()
        );
        return Err(Error::InvalidArgument("sequence index must be a scalar"));
    }
    match tensor.scalar_type() {
        ScalarType::Int => Ok(tensor.as_slice::<i32>()?[0] as i64),
        ScalarType::Long => Ok(tensor.as_slice::<i64>()?[0]),
        other => {
            crate::log::error!("sequence index must be of type Int or Long, got {other:?}");
            Err(Error::InvalidArgument(
                "sequence index must be a 32 or 64 bit integer",
            ))
        }
    }
}
