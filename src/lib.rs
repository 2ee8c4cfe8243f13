#![cfg_attr(deny_warnings, deny(warnings))]
// some new clippy::lint annotations are supported in latest Rust but not recognized by older versions
#![cfg_attr(deny_warnings, allow(unknown_lints))]
#![cfg_attr(deny_warnings, deny(missing_docs))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Tensor sequences and the ONNX sequence operators, for tensor inference engines.
//!
//! A [`Sequence`](sequence::Sequence) is an ordered, dynamically sized collection of
//! [`Tensor`](tensor::Tensor)s that all share one element type. Graph nodes construct, query and restructure
//! sequences during a single inference pass using the operators of the [`ops`] module:
//! `SequenceEmpty`, `SequenceConstruct`, `SequenceLength`, `SequenceAt`, `SequenceInsert`, `SequenceErase`,
//! `SplitToSequence` and `ConcatFromSequence`.
//!
//! Tensors and sequences are immutable values. Cloning either is cheap, and every operator that "modifies" a
//! sequence returns a new one that shares the unchanged tensors with its input. Values can therefore be shared and
//! read from many threads without locking, and operators hold no state between invocations.
//!
//! ```rust
//! use tensor_seq::ops::{SequenceAt, SequenceInsert, SplitToSequence};
//! use tensor_seq::tensor::Tensor;
//!
//! let x = Tensor::from_vec([4, 5], (0..20).collect::<Vec<i64>>()).unwrap();
//! let sizes = Tensor::from_vec([2], vec![2_i64, 3]).unwrap();
//!
//! // Two chunks of shapes [4, 2] and [4, 3]
//! let chunks = SplitToSequence::new(1, true).run(&x, Some(&sizes)).unwrap();
//! assert_eq!(chunks.len(), 2);
//!
//! // Insert a third chunk at the front, the original sequence is untouched
//! let first = Tensor::from_vec([4, 1], vec![-1_i64; 4]).unwrap();
//! let extended = SequenceInsert.run(&chunks, &first, Some(&Tensor::scalar(0_i64))).unwrap();
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(extended.len(), 3);
//!
//! let last = SequenceAt.run(&extended, &Tensor::scalar(-1_i64)).unwrap();
//! assert_eq!(last.sizes(), &[4, 3]);
//! ```
//!
//! Execution engines that dispatch by op type name can create the operators with
//! [`create_operator`](ops::create_operator) and invoke them through the [`Operator`](ops::Operator) trait, passing
//! and receiving type-erased [`Value`](value::Value)s.
//!
//! ## Errors and logging
//! All operations return a [`Result`] with an [`Error`] describing the violated precondition. Operators validate
//! their inputs eagerly and never produce partial outputs. Every failure is also reported through the
//! [`log`](https://docs.rs/log) crate under the `tensor_seq` target, and operator invocations are traced at the
//! `trace` level.
//!
//! ## Cargo Features
//! - `ndarray`:
//!   Conversions between tensors and `ndarray` arrays.
//!   Adds a dependency to the `ndarray` crate.
//!   This feature is enabled by default.
//! - `half`:
//!   Use the [`half`](https://docs.rs/half/latest/half/) crate's `f16` and `bf16` types as the elements of half
//!   precision tensors. Without this feature the crate provides its own minimal bit-level `f16` and `bf16` types.
//! - `num-complex`:
//!   Use the [`num-complex`](https://docs.rs/num/latest/num/complex/struct.Complex.html) crate's `Complex` type as
//!   the elements of complex tensors. Without this feature the crate provides its own minimal `Complex` type.
//!
//! By default only the `ndarray` feature is enabled.

#[macro_use]
mod private;
mod error;
mod log;
pub mod ops;
pub mod scalar;
pub mod sequence;
pub mod tensor;
pub mod value;

pub use error::{Error, Result};

#[cfg(feature = "ndarray")]
pub use ndarray;

#[cfg(feature = "half")]
pub use half;

#[cfg(feature = "num-complex")]
pub use num_complex;
