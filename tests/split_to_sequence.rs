use proptest::prelude::*;
use tensor_seq::ops::{create_operator, Attributes, ConcatFromSequence, SplitToSequence};
use tensor_seq::sequence::Sequence;
use tensor_seq::tensor::{ScalarType, Tensor};
use tensor_seq::value::Value;
use tensor_seq::Error;

#[ctor::ctor]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn range(shape: &[usize]) -> Tensor {
    let size = shape.iter().product::<usize>();
    Tensor::from_vec(shape, (0..size).map(|i| i as f32).collect()).unwrap()
}

fn split(
    x: &Tensor,
    split: Option<Tensor>,
    axis: i64,
    keepdims: i64,
) -> Result<Sequence, Error> {
    let attrs = Attributes::new()
        .with("axis", axis)
        .with("keepdims", keepdims);
    let op = create_operator("SplitToSequence", &attrs)?;
    let outputs = op.compute(&[Some(x.clone().into()), split.map(Value::from)])?;
    Ok(outputs[0].as_sequence().clone())
}

fn sizes(seq: &Sequence) -> Vec<Vec<usize>> {
    seq.iter().map(|t| t.sizes().to_vec()).collect()
}

#[test]
fn seven_without_split() {
    let x = range(&[7]);
    let seq = split(&x, None, 0, 1).unwrap();
    assert_eq!(sizes(&seq), vec![vec![1]; 7]);

    let seq = split(&x, None, 0, 0).unwrap();
    assert_eq!(sizes(&seq), vec![Vec::<usize>::new(); 7]);
    for (i, t) in seq.iter().enumerate() {
        assert_eq!(t.as_slice::<f32>().unwrap(), &[i as f32]);
    }
}

#[test]
fn seven_by_three() {
    let x = range(&[7]);
    let seq = split(&x, Some(Tensor::scalar(3_i64)), 0, 1).unwrap();
    assert_eq!(sizes(&seq), vec![vec![3], vec![3], vec![1]]);
    assert_eq!(seq.at(0).unwrap().as_slice::<f32>().unwrap(), &[0.0, 1.0, 2.0]);
    assert_eq!(seq.at(1).unwrap().as_slice::<f32>().unwrap(), &[3.0, 4.0, 5.0]);
    assert_eq!(seq.at(2).unwrap().as_slice::<f32>().unwrap(), &[6.0]);
}

#[test]
fn explicit_sizes_must_cover_axis() {
    let x = range(&[4, 5]);
    let uneven = Tensor::from_vec([2], vec![2_i64, 2]).unwrap();
    assert!(matches!(
        split(&x, Some(uneven), 1, 1),
        Err(Error::InvalidArgument(_))
    ));

    let covering = Tensor::from_vec([2], vec![2_i64, 3]).unwrap();
    let seq = split(&x, Some(covering), 1, 1).unwrap();
    assert_eq!(sizes(&seq), vec![vec![4, 2], vec![4, 3]]);

    let even = Tensor::from_vec([2], vec![2_i64, 2]).unwrap();
    let seq = split(&range(&[4, 4]), Some(even), 1, 1).unwrap();
    assert_eq!(sizes(&seq), vec![vec![4, 2], vec![4, 2]]);
}

#[test]
fn invalid_splits() {
    let x = range(&[4, 5]);
    for bad in [
        Tensor::scalar(0_i64),
        Tensor::scalar(-1_i32),
        Tensor::from_vec([2], vec![6_i64, -1]).unwrap(),
        Tensor::from_vec([3], vec![i64::MAX, i64::MAX, 7]).unwrap(),
        Tensor::from_vec([2], vec![i64::MAX, 6]).unwrap(),
        Tensor::from_vec([0], Vec::<i64>::new()).unwrap(),
        Tensor::scalar(2.0_f32),
    ] {
        assert!(matches!(
            split(&x, Some(bad), 1, 1),
            Err(Error::InvalidArgument(_))
        ));
    }
    assert!(matches!(split(&x, None, 2, 1), Err(Error::InvalidArgument(_))));
    assert!(matches!(split(&x, None, -3, 1), Err(Error::InvalidArgument(_))));
    assert!(split(&x, None, -2, 1).is_ok());

    let empty = range(&[0]);
    let wrapping = Tensor::from_vec([3], vec![i64::MAX, i64::MAX, 2]).unwrap();
    assert!(matches!(
        split(&empty, Some(wrapping), 0, 1),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn output_type_follows_input() {
    let x = Tensor::from_vec([3], vec![true, false, true]).unwrap();
    let seq = split(&x, None, 0, 1).unwrap();
    assert_eq!(seq.dtype(), Some(ScalarType::Bool));
    assert!(seq.iter().all(|t| t.scalar_type() == ScalarType::Bool));

    let empty = Tensor::from_vec([0, 3], Vec::<i32>::new()).unwrap();
    let seq = split(&empty, None, 0, 1).unwrap();
    assert!(seq.is_empty());
    assert_eq!(seq.dtype(), Some(ScalarType::Int));
}

#[test]
fn split_then_concat() {
    let x = range(&[2, 3, 4]);
    let chunks = Tensor::from_vec([3], vec![1_i64, 0, 2]).unwrap();
    let seq = split(&x, Some(chunks), 1, 1).unwrap();
    let attrs = Attributes::new().with("axis", 1_i64);
    let concat = create_operator("ConcatFromSequence", &attrs).unwrap();
    let out = concat.compute(&[Some(seq.into())]).unwrap();
    let out = out[0].as_tensor();
    assert_eq!(out.sizes(), x.sizes());
    assert_eq!(out.as_slice::<f32>().unwrap(), x.as_slice::<f32>().unwrap());
}

proptest! {
    #[test]
    fn concat_restores_split(
        dims in proptest::collection::vec(0_usize..5, 1..4),
        axis_seed in any::<usize>(),
        chunk in 1_i64..6,
        negative_axis in any::<bool>(),
    ) {
        let rank = dims.len();
        let axis = axis_seed % rank;
        let attr_axis = if negative_axis { axis as i64 - rank as i64 } else { axis as i64 };
        let x = range(&dims);

        let seq = SplitToSequence::new(attr_axis, true).run(&x, Some(&Tensor::scalar(chunk))).unwrap();
        prop_assert_eq!(seq.len(), dims[axis].div_ceil(chunk as usize));
        if seq.is_empty() {
            return Ok(());
        }
        let out = ConcatFromSequence::new(attr_axis, false).run(&seq).unwrap();
        prop_assert_eq!(out.sizes(), x.sizes());
        prop_assert_eq!(out.as_slice::<f32>().unwrap(), x.as_slice::<f32>().unwrap());
    }

    #[test]
    fn stack_restores_squeezed_split(
        dims in proptest::collection::vec(1_usize..5, 1..4),
        axis_seed in any::<usize>(),
    ) {
        let axis = (axis_seed % dims.len()) as i64;
        let x = range(&dims);

        let seq = SplitToSequence::new(axis, false).run(&x, None).unwrap();
        prop_assert!(seq.iter().all(|t| t.dim() == dims.len() - 1));
        let out = ConcatFromSequence::new(axis, true).run(&seq).unwrap();
        prop_assert_eq!(out.sizes(), x.sizes());
        prop_assert_eq!(out.as_slice::<f32>().unwrap(), x.as_slice::<f32>().unwrap());
    }
}
