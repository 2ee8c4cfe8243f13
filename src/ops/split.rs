use crate::sequence::Sequence;
use crate::tensor::{dispatch_buffer, Buffer, Scalar, ScalarType, Tensor, TensorShape};
use crate::value::Value;
use crate::{Error, Result};

use super::{input_tensor, optional_tensor, Attributes, Operator};

/// How the split axis is partitioned, as given by the optional `split` input of [`SplitToSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitSpec {
    /// No `split` input: one chunk of size 1 per element along the axis.
    Absent,
    /// A rank 0 `split`: chunks of this size, with a trailing remainder chunk if the axis is not divisible by it.
    Chunk(i64),
    /// A rank 1 `split`: the explicit size of every chunk.
    Sizes(Vec<i64>),
}

impl SplitSpec {
    /// Read the split specification from the optional `split` input tensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the tensor is not of type `i32` or `i64`, or has a rank greater than 1.
    pub fn from_tensor(split: Option<&Tensor>) -> Result<Self> {
        let Some(split) = split else {
            return Ok(SplitSpec::Absent);
        };
        let values: Vec<i64> = match split.scalar_type() {
            ScalarType::Int => split.as_slice::<i32>()?.iter().map(|&v| v as i64).collect(),
            ScalarType::Long => split.to_vec::<i64>()?,
            other => {
                crate::log::error!("split must be of type Int or Long, got {other:?}");
                return Err(Error::InvalidArgument(
                    "split must be a 32 or 64 bit integer tensor",
                ));
            }
        };
        match split.dim() {
            0 => Ok(SplitSpec::Chunk(values[0])),
            1 => Ok(SplitSpec::Sizes(values)),
            rank => {
                crate::log::error!("split must be a scalar or a 1-D tensor, got rank {rank}");
                Err(Error::InvalidArgument("split must be a scalar or a 1-D tensor"))
            }
        }
    }
}

/// The partition of a tensor into chunks along an axis.
///
/// For a row-major buffer, chunk `i` is made of `before_dims` contiguous runs of
/// `split_sizes[i] * after_dims_excluding_split` elements, one run per outer block of
/// `after_dims_including_split_axis` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLayout {
    /// The normalized split axis.
    pub axis: usize,
    /// The product of the dimensions before the axis.
    pub before_dims: usize,
    /// The product of the dimensions from the axis (inclusive) to the end.
    pub after_dims_including_split_axis: usize,
    /// The product of the dimensions after the axis.
    pub after_dims_excluding_split: usize,
    /// The size of every chunk along the axis, in order.
    pub split_sizes: Vec<usize>,
}

impl SplitLayout {
    /// Compute the layout of splitting a tensor of shape `shape` along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the axis is outside `[-rank, rank)`, a chunk size is not positive, an
    /// explicit size is negative, or the explicit sizes do not sum to the dimension of the axis.
    pub fn new(shape: &TensorShape, axis: i64, split: &SplitSpec) -> Result<Self> {
        let axis = shape.normalize_axis(axis)?;
        let dim = shape[axis];

        let split_sizes = match split {
            SplitSpec::Absent => vec![1; dim],
            &SplitSpec::Chunk(chunk) => {
                if chunk <= 0 {
                    crate::log::error!("split chunk size must be positive, got {chunk}");
                    return Err(Error::InvalidArgument("split chunk size must be positive"));
                }
                let chunk = usize::try_from(chunk).unwrap_or(usize::MAX);
                let mut sizes = vec![chunk; dim / chunk];
                if dim % chunk != 0 {
                    sizes.push(dim % chunk);
                }
                sizes
            }
            SplitSpec::Sizes(sizes) => {
                if let Some(&size) = sizes.iter().find(|&&size| size < 0) {
                    crate::log::error!("split sizes must be non-negative, got {size}");
                    return Err(Error::InvalidArgument("split sizes must be non-negative"));
                }
                let total = sizes.iter().try_fold(0_usize, |acc, &size| {
                    acc.checked_add(usize::try_from(size).ok()?)
                });
                if total != Some(dim) {
                    crate::log::error!(
                        "split sizes {sizes:?} do not sum to {dim}, the dimension of axis {axis}"
                    );
                    return Err(Error::InvalidArgument(
                        "split sizes must sum to the dimension of the axis",
                    ));
                }
                // Every size is at most `dim` once the sum matched.
                sizes.iter().map(|&size| size as usize).collect()
            }
        };

        Ok(Self {
            axis,
            before_dims: shape.size_to_dimension(axis),
            after_dims_including_split_axis: shape.size_from_dimension(axis),
            after_dims_excluding_split: shape.size_from_dimension(axis + 1),
            split_sizes,
        })
    }

    /// The number of chunks.
    pub fn num_outputs(&self) -> usize {
        self.split_sizes.len()
    }
}

/// Splits a tensor into a sequence of chunks along an axis.
///
/// Attributes:
/// - `axis`: the axis to split along, negative values count from the last dimension. Defaults to 0.
/// - `keepdims`: when 0, chunks of size 1 along the axis have that dimension removed. Defaults to 1.
///
/// ```rust
/// use tensor_seq::ops::SplitToSequence;
/// use tensor_seq::tensor::Tensor;
///
/// let x = Tensor::from_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let columns = SplitToSequence::new(1, false).run(&x, None).unwrap();
/// assert_eq!(columns.len(), 3);
/// assert_eq!(columns.at(0).unwrap().sizes(), &[2]);
/// assert_eq!(columns.at(0).unwrap().as_slice::<i32>().unwrap(), &[1, 4]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SplitToSequence {
    axis: i64,
    keepdims: bool,
}

impl SplitToSequence {
    /// Create the operator.
    pub fn new(axis: i64, keepdims: bool) -> Self {
        Self { axis, keepdims }
    }

    /// Create the operator from the node attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `axis` is not an integer or `keepdims` is not 0 or 1.
    pub fn from_attributes(attributes: &Attributes) -> Result<Self> {
        let axis = attributes.get_int_or("axis", 0)?;
        let keepdims = attributes.get_bool_or("keepdims", true)?;
        Ok(Self::new(axis, keepdims))
    }

    /// The configured, not yet normalized, split axis.
    pub fn axis(&self) -> i64 {
        self.axis
    }

    /// Whether chunks of size 1 keep the split axis.
    pub fn keepdims(&self) -> bool {
        self.keepdims
    }

    /// Compute the chunk layout for an input of shape `shape` and the optional `split` input.
    ///
    /// # Errors
    ///
    /// See [`SplitSpec::from_tensor`] and [`SplitLayout::new`].
    pub fn prepare_for_compute(
        &self,
        shape: &TensorShape,
        split: Option<&Tensor>,
    ) -> Result<SplitLayout> {
        let split = SplitSpec::from_tensor(split)?;
        SplitLayout::new(shape, self.axis, &split)
    }

    /// Split `input` into a sequence of chunks, in increasing order along the axis.
    ///
    /// The sequence's element type is the input's, even when no chunks are produced.
    ///
    /// # Errors
    ///
    /// See [`SplitToSequence::prepare_for_compute`].
    pub fn run(&self, input: &Tensor, split: Option<&Tensor>) -> Result<Sequence> {
        let layout = self.prepare_for_compute(input.shape(), split)?;
        let buffers = dispatch_buffer!(input.buffer(), |data| split_buffer(&data[..], &layout));

        let tensors = layout
            .split_sizes
            .iter()
            .zip(buffers)
            .map(|(&size, buffer)| {
                let shape = if !self.keepdims && size == 1 {
                    input.shape().without_dim(layout.axis)
                } else {
                    input.shape().with_dim(layout.axis, size)
                };
                Tensor::from_buffer(shape, buffer)
            })
            .collect::<Result<Vec<_>>>()?;
        Sequence::from_tensors_with_dtype(input.scalar_type(), tensors)
    }
}

impl Default for SplitToSequence {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl Operator for SplitToSequence {
    fn op_type(&self) -> &'static str {
        "SplitToSequence"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let input = input_tensor(inputs, 0, self.op_type())?;
        let split = optional_tensor(inputs, 1)?;
        crate::log::trace!(
            "SplitToSequence: input of shape {:?}, axis {}, keepdims {}",
            input.shape(),
            self.axis,
            self.keepdims
        );
        Ok(vec![self.run(input, split)?.into()])
    }
}

fn split_buffer<T: Scalar>(data: &[T], layout: &SplitLayout) -> Vec<Buffer> {
    let mut offset = 0;
    layout
        .split_sizes
        .iter()
        .map(|&size| {
            let run = size.saturating_mul(layout.after_dims_excluding_split);
            let mut chunk = Vec::new();
            // Empty chunks copy nothing, their outer block count may be saturated.
            if run > 0 && layout.before_dims > 0 {
                chunk.reserve_exact(layout.before_dims * run);
                for outer in 0..layout.before_dims {
                    let start = outer * layout.after_dims_including_split_axis
                        + offset * layout.after_dims_excluding_split;
                    chunk.extend_from_slice(&data[start..start + run]);
                }
            }
            offset += size;
            Buffer::from_vec(chunk)
        })
        .collect()
}
