//! Abstract values for shape/dtype-only evaluation.
//!
//! An ansatz is evaluated abstractly by replacing every array with an
//! `AbstractArray` that only carries a shape and a dtype. Transfer functions
//! (see `ansatz::tfuncs`) map abstract inputs to abstract outputs without
//! touching data, so the output dtype class of an ansatz can be inferred
//! before any concrete evaluation happens.
//!
//! # Module structure
//!
//! - `types`: `AbstractArray` and the `ShapeDtype` trait
//! - `ops`: shape operations (broadcasting, contraction, reduction, batch flattening)

pub mod ops;
pub mod types;

pub use ops::{broadcast_shapes, checked_size, contract_last, flatten_batch, reduce_last};
pub use types::{AbstractArray, Shape, ShapeDtype};
