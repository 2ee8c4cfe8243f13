use crate::sequence::Sequence;
use crate::tensor::{dispatch_buffer, normalize_axis, Buffer, Scalar, Tensor, TensorShape};
use crate::value::Value;
use crate::{Error, Result};

use super::{input_sequence, Attributes, Operator};

/// Concatenates the tensors of a sequence into a single tensor, the inverse of
/// [`SplitToSequence`](super::SplitToSequence).
///
/// Attributes:
/// - `axis` (required): the axis to concatenate along, negative values count from the last dimension.
/// - `new_axis`: when 1, the tensors are stacked along a new dimension inserted at `axis`, and must all have the
///   same shape. Defaults to 0.
#[derive(Debug, Clone, Copy)]
pub struct ConcatFromSequence {
    axis: i64,
    new_axis: bool,
}

impl ConcatFromSequence {
    /// Create the operator.
    pub fn new(axis: i64, new_axis: bool) -> Self {
        Self { axis, new_axis }
    }

    /// Create the operator from the node attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `axis` is missing or not an integer, or `new_axis` is not 0 or 1.
    pub fn from_attributes(attributes: &Attributes) -> Result<Self> {
        let axis = attributes.get_int("axis")?;
        let new_axis = attributes.get_bool_or("new_axis", false)?;
        Ok(Self::new(axis, new_axis))
    }

    /// The configured, not yet normalized, axis.
    pub fn axis(&self) -> i64 {
        self.axis
    }

    /// Whether the tensors are stacked along a new axis.
    pub fn new_axis(&self) -> bool {
        self.new_axis
    }

    /// Concatenate the tensors of `sequence` in order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the sequence is empty or the axis is out of range.
    /// - [`Error::ShapeMismatch`] if the tensors' shapes differ other than along the axis, or differ at all when
    ///   stacking along a new axis.
    pub fn run(&self, sequence: &Sequence) -> Result<Tensor> {
        let Some(first) = sequence.get(0) else {
            crate::log::error!("ConcatFromSequence: the input sequence is empty");
            return Err(Error::InvalidArgument("can not concatenate an empty sequence"));
        };
        let rank = first.dim();

        let (axis, shape) = if self.new_axis {
            let axis = normalize_axis(self.axis, rank + 1)?;
            if let Some(other) = sequence.iter().find(|t| t.shape() != first.shape()) {
                crate::log::error!(
                    "ConcatFromSequence: can not stack tensors of shapes {:?} and {:?}",
                    first.shape(),
                    other.shape()
                );
                return Err(Error::ShapeMismatch);
            }
            (axis, first.shape().with_inserted_dim(axis, sequence.len()))
        } else {
            let axis = normalize_axis(self.axis, rank)?;
            let mut total = 0_usize;
            for tensor in sequence {
                if !same_except_axis(first.shape(), tensor.shape(), axis) {
                    crate::log::error!(
                        "ConcatFromSequence: can not concatenate tensors of shapes {:?} and {:?} along axis {axis}",
                        first.shape(),
                        tensor.shape()
                    );
                    return Err(Error::ShapeMismatch);
                }
                let Some(sum) = total.checked_add(tensor.size(axis)) else {
                    crate::log::error!("ConcatFromSequence: the concatenated dimension of axis {axis} overflows");
                    return Err(Error::ShapeMismatch);
                };
                total = sum;
            }
            (axis, first.shape().with_dim(axis, total))
        };

        let outer = first.shape().size_to_dimension(axis);
        let buffer = dispatch_buffer!(first.buffer(), |data| concat_buffers(
            &data[..],
            &sequence.tensors()[1..],
            outer,
            axis,
            shape.size()
        ))?;
        Tensor::from_buffer(shape, buffer)
    }
}

impl Operator for ConcatFromSequence {
    fn op_type(&self) -> &'static str {
        "ConcatFromSequence"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let sequence = input_sequence(inputs, 0, self.op_type())?;
        crate::log::trace!(
            "ConcatFromSequence: sequence of length {}, axis {}, new_axis {}",
            sequence.len(),
            self.axis,
            self.new_axis
        );
        Ok(vec![self.run(sequence)?.into()])
    }
}

fn same_except_axis(a: &TensorShape, b: &TensorShape, axis: usize) -> bool {
    a.rank() == b.rank()
        && a.iter()
            .zip(b.iter())
            .enumerate()
            .all(|(d, (x, y))| d == axis || x == y)
}

fn concat_buffers<T: Scalar>(
    first: &[T],
    rest: &[Tensor],
    outer: usize,
    axis: usize,
    size: usize,
) -> Result<Buffer> {
    let mut inputs = vec![(first, first.len() / outer.max(1))];
    for tensor in rest {
        inputs.push((tensor.as_slice::<T>()?, tensor.shape().size_from_dimension(axis)));
    }

    // The outer block count of an empty output may be saturated.
    if size == 0 {
        return Ok(Buffer::from_vec(Vec::<T>::new()));
    }
    let mut data = Vec::with_capacity(size);
    for block in 0..outer {
        for &(input, run) in &inputs {
            data.extend_from_slice(&input[block * run..(block + 1) * run]);
        }
    }
    Ok(Buffer::from_vec(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::SplitToSequence;
    use crate::tensor::ScalarType;

    fn range(shape: &[usize], start: i32) -> Tensor {
        let size = shape.iter().product::<usize>() as i32;
        Tensor::from_vec(shape, (start..start + size).collect()).unwrap()
    }

    #[test]
    fn concat_along_axis() {
        let seq = Sequence::from_tensors(vec![range(&[2, 1], 0), range(&[2, 2], 10)]).unwrap();
        let out = ConcatFromSequence::new(1, false).run(&seq).unwrap();
        assert_eq!(out.sizes(), &[2, 3]);
        assert_eq!(out.as_slice::<i32>().unwrap(), &[0, 10, 11, 1, 12, 13]);

        let out = ConcatFromSequence::new(-2, false)
            .run(&Sequence::from_tensors(vec![range(&[1, 2], 0), range(&[2, 2], 2)]).unwrap())
            .unwrap();
        assert_eq!(out.sizes(), &[3, 2]);
        assert_eq!(out.as_slice::<i32>().unwrap(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn concat_new_axis() {
        let seq = Sequence::from_tensors(vec![range(&[2], 0), range(&[2], 2), range(&[2], 4)]).unwrap();
        let out = ConcatFromSequence::new(0, true).run(&seq).unwrap();
        assert_eq!(out.sizes(), &[3, 2]);
        assert_eq!(out.as_slice::<i32>().unwrap(), &[0, 1, 2, 3, 4, 5]);

        let out = ConcatFromSequence::new(-1, true).run(&seq).unwrap();
        assert_eq!(out.sizes(), &[2, 3]);
        assert_eq!(out.as_slice::<i32>().unwrap(), &[0, 2, 4, 1, 3, 5]);

        let scalars =
            Sequence::from_tensors(vec![Tensor::scalar(1.0_f64), Tensor::scalar(2.0_f64)]).unwrap();
        let out = ConcatFromSequence::new(0, true).run(&scalars).unwrap();
        assert_eq!(out.sizes(), &[2]);
        assert_eq!(out.scalar_type(), ScalarType::Double);
    }

    #[test]
    fn concat_errors() {
        let op = ConcatFromSequence::new(0, false);
        assert!(matches!(
            op.run(&Sequence::with_dtype(ScalarType::Int)),
            Err(Error::InvalidArgument(_))
        ));

        let seq = Sequence::from_tensors(vec![range(&[2, 1], 0), range(&[3, 1], 0)]).unwrap();
        assert_eq!(
            ConcatFromSequence::new(1, false).run(&seq).err(),
            Some(Error::ShapeMismatch)
        );
        assert!(ConcatFromSequence::new(0, false).run(&seq).is_ok());
        assert_eq!(
            ConcatFromSequence::new(0, true).run(&seq).err(),
            Some(Error::ShapeMismatch)
        );
        assert!(matches!(
            ConcatFromSequence::new(2, false).run(&seq),
            Err(Error::InvalidArgument(_))
        ));
        assert!(ConcatFromSequence::new(2, true).run(&seq.erase(None).unwrap()).is_ok());

        let ranks = Sequence::from_tensors(vec![range(&[2], 0), range(&[2, 1], 0)]).unwrap();
        assert_eq!(
            ConcatFromSequence::new(0, false).run(&ranks).err(),
            Some(Error::ShapeMismatch)
        );

        let scalars = Sequence::from_tensors(vec![Tensor::scalar(1_i32)]).unwrap();
        assert!(matches!(
            ConcatFromSequence::new(0, false).run(&scalars),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn concat_inverts_split() {
        let x = range(&[3, 4, 2], 0);
        let split = Tensor::from_vec([3], vec![1_i64, 2, 1]).unwrap();
        let seq = SplitToSequence::new(1, true).run(&x, Some(&split)).unwrap();
        let out = ConcatFromSequence::new(1, false).run(&seq).unwrap();
        assert_eq!(out.sizes(), x.sizes());
        assert_eq!(out.as_slice::<i32>().unwrap(), x.as_slice::<i32>().unwrap());

        let seq = SplitToSequence::new(0, false).run(&x, None).unwrap();
        let out = ConcatFromSequence::new(0, true).run(&seq).unwrap();
        assert_eq!(out.sizes(), x.sizes());
        assert_eq!(out.as_slice::<i32>().unwrap(), x.as_slice::<i32>().unwrap());
    }

    #[test]
    fn from_attributes() {
        let op = ConcatFromSequence::from_attributes(&Attributes::new().with("axis", -1_i64)).unwrap();
        assert_eq!(op.axis(), -1);
        assert!(!op.new_axis());

        let attrs = Attributes::new().with("axis", 0_i64).with("new_axis", 1_i64);
        assert!(ConcatFromSequence::from_attributes(&attrs).unwrap().new_axis());

        for new_axis in [2_i64, -1] {
            let attrs = Attributes::new().with("axis", 0_i64).with("new_axis", new_axis);
            assert!(matches!(
                ConcatFromSequence::from_attributes(&attrs),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn concat_empty_with_huge_dims() {
        let empty = Tensor::from_vec([usize::MAX, 2, 0], Vec::<u8>::new()).unwrap();
        let seq = Sequence::from_tensors(vec![empty.clone(), empty]).unwrap();
        let out = ConcatFromSequence::new(2, false).run(&seq).unwrap();
        assert_eq!(out.sizes(), &[usize::MAX, 2, 0]);
        assert_eq!(out.numel(), 0);

        let out = ConcatFromSequence::new(-1, true).run(&seq).unwrap();
        assert_eq!(out.sizes(), &[usize::MAX, 2, 0, 2]);
        assert_eq!(out.numel(), 0);

        assert_eq!(
            ConcatFromSequence::new(0, false).run(&seq).err(),
            Some(Error::ShapeMismatch)
        );
    }
}
