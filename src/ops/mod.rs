//! The sequence operators.
//!
//! Every operator is a small immutable struct holding its attributes, and implements [`Operator`], the single
//! invocation contract used by an execution engine: positional inputs in, outputs or an error out. Each operator also
//! exposes a typed `run` method for direct use without wrapping values in [`Value`].
//!
//! | Op type | Inputs | Outputs |
//! |---|---|---|
//! | [`SequenceLength`] | sequence | `i64` scalar tensor |
//! | [`SequenceAt`] | sequence, position | tensor |
//! | [`SequenceEmpty`] | | sequence |
//! | [`SequenceInsert`] | sequence, tensor, position (optional) | sequence |
//! | [`SequenceErase`] | sequence, position (optional) | sequence |
//! | [`SequenceConstruct`] | tensor, ... (variadic) | sequence |
//! | [`SplitToSequence`] | tensor, split (optional) | sequence |
//! | [`ConcatFromSequence`] | sequence | tensor |
//!
//! Operators are created either directly or by op type name from the node's [`Attributes`] with
//! [`create_operator`]:
//!
//! ```rust
//! use tensor_seq::ops::{create_operator, Attributes};
//! use tensor_seq::tensor::Tensor;
//! use tensor_seq::value::Value;
//!
//! let split = create_operator("SplitToSequence", &Attributes::new().with("axis", 0_i64)).unwrap();
//! let input = Tensor::from_vec([7], (0..7).collect::<Vec<i64>>()).unwrap();
//! let chunk_size = Tensor::scalar(3_i64);
//!
//! let outputs = split
//!     .compute(&[Some(Value::from(input)), Some(Value::from(chunk_size))])
//!     .unwrap();
//! let sequence = outputs[0].as_sequence();
//! let sizes = sequence.iter().map(|t| t.sizes().to_vec()).collect::<Vec<_>>();
//! assert_eq!(sizes, vec![vec![3], vec![3], vec![1]]);
//! ```

mod attributes;
pub use attributes::{AttributeValue, Attributes};

mod sequence;
pub use sequence::{
    SequenceAt, SequenceConstruct, SequenceEmpty, SequenceErase, SequenceInsert, SequenceLength,
};

mod split;
pub use split::{SplitLayout, SplitSpec, SplitToSequence};

mod concat;
pub use concat::ConcatFromSequence;

use crate::sequence::Sequence;
use crate::tensor::Tensor;
use crate::value::Value;
use crate::{Error, Result};

/// The invocation contract shared by all operators.
///
/// An operator reads its positional inputs, validates them eagerly, and either returns all of its outputs or an
/// error without any partial output. Operators hold no state between invocations, so a single operator can be
/// invoked concurrently from multiple threads.
pub trait Operator: Send + Sync {
    /// The ONNX op type name of the operator, for example `"SequenceAt"`.
    fn op_type(&self) -> &'static str;

    /// Invoke the operator.
    ///
    /// `inputs[i]` is the `i`-th positional input, `None` for an omitted optional input. Trailing optional inputs
    /// may also be left out of the slice.
    ///
    /// # Errors
    ///
    /// Any validation failure of the operator, or [`Error::InvalidArgument`] for a missing required input and
    /// [`Error::InvalidType`] for an input of the wrong kind.
    fn compute(&self, inputs: &[Option<Value>]) -> Result<Vec<Value>>;
}

/// Create an operator by its ONNX op type name.
///
/// # Errors
///
/// - [`Error::OperatorMissing`] if no operator with the given op type exists.
/// - [`Error::InvalidArgument`] if the attributes are invalid for the operator.
pub fn create_operator(op_type: &str, attributes: &Attributes) -> Result<Box<dyn Operator>> {
    Ok(match op_type {
        "SequenceLength" => Box::new(SequenceLength),
        "SequenceAt" => Box::new(SequenceAt),
        "SequenceEmpty" => Box::new(SequenceEmpty::from_attributes(attributes)?),
        "SequenceInsert" => Box::new(SequenceInsert),
        "SequenceErase" => Box::new(SequenceErase),
        "SequenceConstruct" => Box::new(SequenceConstruct),
        "SplitToSequence" => Box::new(SplitToSequence::from_attributes(attributes)?),
        "ConcatFromSequence" => Box::new(ConcatFromSequence::from_attributes(attributes)?),
        _ => {
            crate::log::error!("no operator registered for op type '{op_type}'");
            return Err(Error::OperatorMissing);
        }
    })
}

fn required_input<'a>(
    inputs: &'a [Option<Value>],
    index: usize,
    op_type: &'static str,
) -> Result<&'a Value> {
    match inputs.get(index) {
        Some(Some(value)) => Ok(value),
        _ => {
            crate::log::error!("{op_type}: missing required input {index}");
            Err(Error::InvalidArgument("missing required input"))
        }
    }
}

fn input_sequence<'a>(
    inputs: &'a [Option<Value>],
    index: usize,
    op_type: &'static str,
) -> Result<&'a Sequence> {
    required_input(inputs, index, op_type)?.try_into()
}

fn input_tensor<'a>(
    inputs: &'a [Option<Value>],
    index: usize,
    op_type: &'static str,
) -> Result<&'a Tensor> {
    required_input(inputs, index, op_type)?.try_into()
}

fn optional_tensor(inputs: &[Option<Value>], index: usize) -> Result<Option<&Tensor>> {
    inputs
        .get(index)
        .and_then(Option::as_ref)
        .map(<&Tensor>::try_from)
        .transpose()
}

#[cfg(test)]
mod tests {
    use crate::tensor::ScalarType;
    use crate::tests::{check_send, check_sync};
    use crate::value::Tag;

    use super::*;

    #[test]
    fn create_all_operators() {
        let attrs = Attributes::new().with("axis", 0_i64);
        for op_type in [
            "SequenceLength",
            "SequenceAt",
            "SequenceEmpty",
            "SequenceInsert",
            "SequenceErase",
            "SequenceConstruct",
            "SplitToSequence",
            "ConcatFromSequence",
        ] {
            let op = create_operator(op_type, &attrs).unwrap();
            assert_eq!(op.op_type(), op_type);
        }
        assert_eq!(
            create_operator("Concat", &attrs).err().map(|e| e.to_string()),
            Some(Error::OperatorMissing.to_string())
        );
    }

    #[test]
    fn create_with_invalid_attributes() {
        let attrs = Attributes::new().with("dtype", 100_i64);
        assert!(matches!(
            create_operator("SequenceEmpty", &attrs).err(),
            Some(Error::InvalidArgument(_))
        ));
        // ConcatFromSequence requires an axis.
        assert!(matches!(
            create_operator("ConcatFromSequence", &Attributes::new()).err(),
            Some(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn input_helpers() {
        let inputs = [
            Some(Value::from(Sequence::with_dtype(ScalarType::Int))),
            None,
            Some(Value::from(Tensor::scalar(1_i64))),
        ];
        assert!(input_sequence(&inputs, 0, "Test").is_ok());
        assert_eq!(
            input_tensor(&inputs, 0, "Test").err(),
            Some(Error::InvalidType {
                expected: Tag::Tensor,
                got: Tag::Sequence
            })
        );
        assert!(matches!(
            input_tensor(&inputs, 1, "Test"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            input_tensor(&inputs, 3, "Test"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(optional_tensor(&inputs, 1).unwrap().is_none());
        assert!(optional_tensor(&inputs, 2).unwrap().is_some());
        assert!(optional_tensor(&inputs, 3).unwrap().is_none());
        assert!(optional_tensor(&inputs, 0).is_err());
    }

    #[test]
    fn operators_send_sync() {
        check_send::<Box<dyn Operator>>();
        check_sync::<Box<dyn Operator>>();
    }
}
