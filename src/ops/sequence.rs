use crate::sequence::{read_index, Sequence};
use crate::tensor::{ScalarType, Tensor};
use crate::value::Value;
use crate::{Error, Result};

use super::{input_sequence, input_tensor, optional_tensor, Attributes, Operator};

/// Produces a scalar `i64` tensor holding the number of tensors in a sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceLength;

impl SequenceLength {
    /// The length of `sequence` as a rank 0 `i64` tensor.
    pub fn run(&self, sequence: &Sequence) -> Tensor {
        Tensor::scalar(sequence.len() as i64)
    }
}

impl Operator for SequenceLength {
    fn op_type(&self) -> &'static str {
        "SequenceLength"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let sequence = input_sequence(inputs, 0, self.op_type())?;
        crate::log::trace!("SequenceLength: sequence of length {}", sequence.len());
        Ok(vec![self.run(sequence).into()])
    }
}

/// Outputs the tensor at a position of a sequence.
///
/// The position is a scalar `i32` or `i64` tensor and may be negative, counting from the end of the sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceAt;

impl SequenceAt {
    /// Get the tensor of `sequence` at the position held by `position`.
    ///
    /// The returned tensor shares its buffer with the sequence element.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `position` is not a single `i32` or `i64` value.
    /// - [`Error::IndexOutOfRange`] if the position is outside `[-len, len)`.
    pub fn run(&self, sequence: &Sequence, position: &Tensor) -> Result<Tensor> {
        let position = read_index(position)?;
        sequence.at(position).cloned()
    }
}

impl Operator for SequenceAt {
    fn op_type(&self) -> &'static str {
        "SequenceAt"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let sequence = input_sequence(inputs, 0, self.op_type())?;
        let position = input_tensor(inputs, 1, self.op_type())?;
        crate::log::trace!("SequenceAt: sequence of length {}", sequence.len());
        Ok(vec![self.run(sequence, position)?.into()])
    }
}

/// Produces an empty sequence of a configured element type.
#[derive(Debug, Clone, Copy)]
pub struct SequenceEmpty {
    dtype: ScalarType,
}

impl SequenceEmpty {
    /// The element type used when the `dtype` attribute is not given.
    pub const DEFAULT_DTYPE: ScalarType = ScalarType::Float;

    /// Create the operator with the given element type.
    pub fn new(dtype: ScalarType) -> Self {
        Self { dtype }
    }

    /// Create the operator from the node attributes.
    ///
    /// The `dtype` attribute is an ONNX `TensorProto.DataType` code, 32-bit float by default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `dtype` is not an integer or not a supported data type code.
    pub fn from_attributes(attributes: &Attributes) -> Result<Self> {
        let code = attributes.get_int_or("dtype", Self::DEFAULT_DTYPE.onnx())?;
        match ScalarType::from_onnx(code) {
            Some(dtype) => Ok(Self::new(dtype)),
            None => {
                crate::log::error!("SequenceEmpty: unsupported dtype {code}");
                Err(Error::InvalidArgument("unsupported dtype"))
            }
        }
    }

    /// The element type of the produced sequences.
    pub fn dtype(&self) -> ScalarType {
        self.dtype
    }

    /// Create an empty sequence of the configured element type.
    pub fn run(&self) -> Sequence {
        Sequence::with_dtype(self.dtype)
    }
}

impl Default for SequenceEmpty {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DTYPE)
    }
}

impl Operator for SequenceEmpty {
    fn op_type(&self) -> &'static str {
        "SequenceEmpty"
    }

    fn compute(&self, _inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        Ok(vec![self.run().into()])
    }
}

/// Outputs a copy of a sequence with a tensor inserted at a position.
///
/// The position is optional and defaults to appending at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceInsert;

impl SequenceInsert {
    /// Insert `tensor` into `sequence` at the position held by `position`, or at the end.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if the tensor's type differs from the sequence's element type.
    /// - [`Error::InvalidArgument`] if `position` is not a single `i32` or `i64` value.
    /// - [`Error::IndexOutOfRange`] if the position is outside `[-len, len]`.
    pub fn run(
        &self,
        sequence: &Sequence,
        tensor: &Tensor,
        position: Option<&Tensor>,
    ) -> Result<Sequence> {
        let position = position.map(read_index).transpose()?;
        sequence.insert(tensor.clone(), position)
    }
}

impl Operator for SequenceInsert {
    fn op_type(&self) -> &'static str {
        "SequenceInsert"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let sequence = input_sequence(inputs, 0, self.op_type())?;
        let tensor = input_tensor(inputs, 1, self.op_type())?;
        let position = optional_tensor(inputs, 2)?;
        crate::log::trace!(
            "SequenceInsert: sequence of length {}, tensor of shape {:?}",
            sequence.len(),
            tensor.shape()
        );
        Ok(vec![self.run(sequence, tensor, position)?.into()])
    }
}

/// Outputs a copy of a sequence with the tensor at a position removed.
///
/// The position is optional and defaults to the last tensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceErase;

impl SequenceErase {
    /// Remove the tensor at the position held by `position`, or the last tensor, from `sequence`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the sequence is empty, or `position` is not a single `i32` or `i64` value.
    /// - [`Error::IndexOutOfRange`] if the position is outside `[-len, len)`.
    pub fn run(&self, sequence: &Sequence, position: Option<&Tensor>) -> Result<Sequence> {
        let position = position.map(read_index).transpose()?;
        sequence.erase(position)
    }
}

impl Operator for SequenceErase {
    fn op_type(&self) -> &'static str {
        "SequenceErase"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let sequence = input_sequence(inputs, 0, self.op_type())?;
        let position = optional_tensor(inputs, 1)?;
        crate::log::trace!("SequenceErase: sequence of length {}", sequence.len());
        Ok(vec![self.run(sequence, position)?.into()])
    }
}

/// Produces a sequence from one or more tensors of the same element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceConstruct;

impl SequenceConstruct {
    /// Create a sequence of `tensors`, in order. The tensors' shapes may differ.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if no tensors are given.
    /// - [`Error::TypeMismatch`] if the tensors do not all share one element type.
    pub fn run<'a>(&self, tensors: impl IntoIterator<Item = &'a Tensor>) -> Result<Sequence> {
        let tensors = tensors.into_iter().cloned().collect::<Vec<_>>();
        if tensors.is_empty() {
            crate::log::error!("SequenceConstruct: at least one input tensor is required");
            return Err(Error::InvalidArgument(
                "a sequence must be constructed from at least one tensor",
            ));
        }
        Sequence::from_tensors(tensors)
    }
}

impl Operator for SequenceConstruct {
    fn op_type(&self) -> &'static str {
        "SequenceConstruct"
    }

    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>> {
        let tensors = (0..inputs.len())
            .map(|i| input_tensor(inputs, i, self.op_type()))
            .collect::<Result<Vec<_>>>()?;
        crate::log::trace!("SequenceConstruct: {} tensors", tensors.len());
        Ok(vec![self.run(tensors)?.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(shape: &[usize], start: f32) -> Tensor {
        let size = shape.iter().product::<usize>();
        Tensor::from_vec(shape, (0..size).map(|i| start + i as f32).collect()).unwrap()
    }

    fn sequence_of(tensors: &[Tensor]) -> Sequence {
        SequenceConstruct.run(tensors).unwrap()
    }

    #[test]
    fn length() {
        let len = SequenceLength.run(&Sequence::with_dtype(ScalarType::Float));
        assert_eq!(len.dim(), 0);
        assert_eq!(len.as_slice::<i64>().unwrap(), &[0]);

        let seq = sequence_of(&[floats(&[2], 0.0), floats(&[3], 0.0)]);
        assert_eq!(SequenceLength.run(&seq).as_slice::<i64>().unwrap(), &[2]);
    }

    #[test]
    fn at() {
        let t0 = floats(&[2], 0.0);
        let t1 = floats(&[3, 1], 10.0);
        let seq = sequence_of(&[t0.clone(), t1.clone()]);

        assert!(SequenceAt.run(&seq, &Tensor::scalar(0_i64)).unwrap().ptr_eq(&t0));
        assert!(SequenceAt.run(&seq, &Tensor::scalar(1_i32)).unwrap().ptr_eq(&t1));
        assert!(SequenceAt.run(&seq, &Tensor::scalar(-1_i64)).unwrap().ptr_eq(&t1));
        assert!(SequenceAt.run(&seq, &Tensor::scalar(-2_i32)).unwrap().ptr_eq(&t0));
        assert_eq!(
            SequenceAt.run(&seq, &Tensor::scalar(2_i64)).err(),
            Some(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            SequenceAt.run(&seq, &Tensor::scalar(-3_i64)).err(),
            Some(Error::IndexOutOfRange { index: -3, len: 2 })
        );
        assert!(matches!(
            SequenceAt.run(&seq, &Tensor::scalar(0.0_f64)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty() {
        let seq = SequenceEmpty::default().run();
        assert!(seq.is_empty());
        assert_eq!(seq.dtype(), Some(ScalarType::Float));

        let op = SequenceEmpty::from_attributes(&Attributes::new().with("dtype", 7_i64)).unwrap();
        assert_eq!(op.dtype(), ScalarType::Long);
        assert_eq!(op.run().dtype(), Some(ScalarType::Long));

        let op = SequenceEmpty::from_attributes(&Attributes::new()).unwrap();
        assert_eq!(op.dtype(), ScalarType::Float);

        assert!(SequenceEmpty::from_attributes(&Attributes::new().with("dtype", 0_i64)).is_err());
    }

    #[test]
    fn insert() {
        let seq = SequenceEmpty::new(ScalarType::Float).run();
        let t0 = floats(&[1], 0.0);
        let t1 = floats(&[2], 0.0);
        let seq = SequenceInsert.run(&seq, &t0, None).unwrap();
        let seq = SequenceInsert
            .run(&seq, &t1, Some(&Tensor::scalar(0_i32)))
            .unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.at(0).unwrap().ptr_eq(&t1));
        assert!(seq.at(1).unwrap().ptr_eq(&t0));

        assert_eq!(
            SequenceInsert
                .run(&seq, &t0, Some(&Tensor::scalar(3_i64)))
                .err(),
            Some(Error::IndexOutOfRange { index: 3, len: 2 })
        );
        assert_eq!(
            SequenceInsert.run(&seq, &Tensor::scalar(1_i32), None).err(),
            Some(Error::TypeMismatch {
                expected: ScalarType::Float,
                got: ScalarType::Int
            })
        );
    }

    #[test]
    fn erase() {
        let t0 = floats(&[1], 0.0);
        let t1 = floats(&[1], 1.0);
        let t2 = floats(&[1], 2.0);
        let seq = sequence_of(&[t0.clone(), t1.clone(), t2.clone()]);

        let erased = SequenceErase.run(&seq, None).unwrap();
        assert_eq!(erased.len(), 2);
        assert!(erased.at(-1).unwrap().ptr_eq(&t1));

        let erased = SequenceErase
            .run(&seq, Some(&Tensor::scalar(-3_i64)))
            .unwrap();
        assert!(erased.at(0).unwrap().ptr_eq(&t1));
        assert!(erased.at(1).unwrap().ptr_eq(&t2));

        let empty = SequenceEmpty::default().run();
        assert!(matches!(
            SequenceErase.run(&empty, None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn construct() {
        let seq = sequence_of(&[floats(&[1], 0.0), floats(&[2, 2], 0.0), floats(&[], 0.0)]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.at(1).unwrap().sizes(), &[2, 2]);
        assert_eq!(seq.at(2).unwrap().dim(), 0);

        assert!(matches!(
            SequenceConstruct.run(std::iter::empty()),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            SequenceConstruct
                .run(&[floats(&[1], 0.0), Tensor::scalar(true)])
                .err(),
            Some(Error::TypeMismatch {
                expected: ScalarType::Float,
                got: ScalarType::Bool
            })
        );
    }

    #[test]
    fn construct_through_operator() {
        let inputs = [
            Some(Value::from(floats(&[1], 0.0))),
            Some(Value::from(floats(&[1], 1.0))),
        ];
        let outputs = SequenceConstruct.compute(&inputs).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].as_sequence().len(), 2);

        assert!(matches!(
            SequenceConstruct.compute(&[]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            SequenceConstruct.compute(&[Some(Value::from(floats(&[1], 0.0))), None]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
