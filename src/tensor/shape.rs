use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::{Error, Result};

/// Most tensors have 4 or fewer dimensions, so up to 4 are stored inline.
const STACK_DIMS: usize = 4;

/// The dimensions of a tensor.
///
/// An ordered sequence of non-negative dimension sizes. The rank is the number of dimensions, and a rank 0 shape
/// describes a scalar with a single element.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorShape(SmallVec<[usize; STACK_DIMS]>);

impl TensorShape {
    /// Create a shape from its dimensions.
    pub fn new(dims: &[usize]) -> Self {
        Self(SmallVec::from_slice(dims))
    }

    /// The rank 0 shape of a scalar.
    pub fn scalar() -> Self {
        Self(SmallVec::new())
    }

    /// The number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// The dimensions as a slice.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// The total number of elements, the product of all dimensions.
    ///
    /// Saturates at `usize::MAX` if the product does not fit, see [`checked_size`](Self::checked_size).
    pub fn size(&self) -> usize {
        product(&self.0)
    }

    /// The total number of elements, or `None` if it does not fit in `usize`.
    ///
    /// A shape with a zero dimension always has size 0, whatever its other dimensions are.
    pub fn checked_size(&self) -> Option<usize> {
        if self.0.contains(&0) {
            return Some(0);
        }
        self.0.iter().try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// The product of the dimensions `[0, dimension)`, saturating at `usize::MAX`.
    ///
    /// # Panics
    ///
    /// If `dimension` is greater than the rank.
    pub fn size_to_dimension(&self, dimension: usize) -> usize {
        product(&self.0[..dimension])
    }

    /// The product of the dimensions `[dimension, rank)`, saturating at `usize::MAX`.
    ///
    /// # Panics
    ///
    /// If `dimension` is greater than the rank.
    pub fn size_from_dimension(&self, dimension: usize) -> usize {
        product(&self.0[dimension..])
    }

    /// Normalize a possibly negative axis into `[0, rank)`.
    ///
    /// A negative axis is rewritten once by adding the rank. An axis that is still outside the range is an
    /// [`Error::InvalidArgument`].
    pub fn normalize_axis(&self, axis: i64) -> Result<usize> {
        normalize_axis(axis, self.rank())
    }

    /// A copy of this shape with the dimension `axis` set to `size`.
    ///
    /// # Panics
    ///
    /// If `axis` is not smaller than the rank.
    pub fn with_dim(&self, axis: usize, size: usize) -> Self {
        let mut dims = self.0.clone();
        dims[axis] = size;
        Self(dims)
    }

    /// A copy of this shape with the dimension `axis` removed.
    ///
    /// # Panics
    ///
    /// If `axis` is not smaller than the rank.
    pub fn without_dim(&self, axis: usize) -> Self {
        let mut dims = self.0.clone();
        dims.remove(axis);
        Self(dims)
    }

    /// A copy of this shape with a new dimension of size `size` inserted at `axis`.
    ///
    /// # Panics
    ///
    /// If `axis` is greater than the rank.
    pub fn with_inserted_dim(&self, axis: usize, size: usize) -> Self {
        let mut dims = self.0.clone();
        dims.insert(axis, size);
        Self(dims)
    }
}

// An empty tensor may have other dimensions whose product overflows.
fn product(dims: &[usize]) -> usize {
    if dims.contains(&0) {
        return 0;
    }
    dims.iter().fold(1, |acc, &dim| acc.saturating_mul(dim))
}

/// Normalize a possibly negative axis into `[0, rank)`.
pub(crate) fn normalize_axis(axis: i64, rank: usize) -> Result<usize> {
    let rank_i = rank as i64;
    let normalized = if axis < 0 { axis + rank_i } else { axis };
    if normalized < 0 || normalized >= rank_i {
        crate::log::error!("axis {axis} is out of range for a tensor of rank {rank}");
        return Err(Error::InvalidArgument("axis out of range"));
    }
    Ok(normalized as usize)
}

impl Deref for TensorShape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0[..], f)
    }
}

impl From<&[usize]> for TensorShape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims)
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(dims: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(dims))
    }
}

impl<const N: usize> From<[usize; N]> for TensorShape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(&dims)
    }
}

impl From<&TensorShape> for TensorShape {
    fn from(shape: &TensorShape) -> Self {
        shape.clone()
    }
}
