use ndarray::{ArrayBase, ArrayD, ArrayViewD, IxDyn};

use crate::{Error, Result};

use super::{Buffer, Scalar, Tensor};

impl Tensor {
    /// Create a tensor by copying the elements of an ndarray array.
    ///
    /// The elements are copied in logical (row-major) order, regardless of the memory layout of the array.
    pub fn from_array<A, S, D>(array: &ArrayBase<S, D>) -> Self
    where
        A: Scalar,
        S: ndarray::Data<Elem = A>,
        D: ndarray::Dimension,
    {
        let data = array.iter().cloned().collect::<Vec<A>>();
        Self::from_parts(array.shape().into(), Buffer::from_vec(data))
    }

    /// Get an array view of the tensor with dynamic number of dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `A` is not the tensor's scalar type.
    pub fn as_array<A: Scalar>(&self) -> Result<ArrayViewD<'_, A>> {
        let data = self.as_slice::<A>()?;
        ArrayViewD::from_shape(IxDyn(self.sizes()), data).map_err(|err| {
            crate::log::error!("failed to view tensor as array: {err}");
            Error::ShapeMismatch
        })
    }

    /// Copy the tensor into an owned ndarray array with dynamic number of dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `A` is not the tensor's scalar type.
    pub fn to_array<A: Scalar>(&self) -> Result<ArrayD<A>> {
        self.as_array().map(|array| array.to_owned())
    }
}

impl<A, S, D> From<&ArrayBase<S, D>> for Tensor
where
    A: Scalar,
    S: ndarray::Data<Elem = A>,
    D: ndarray::Dimension,
{
    fn from(array: &ArrayBase<S, D>) -> Self {
        Self::from_array(array)
    }
}
