//! Core types for phasemux multi-field images.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: field labels,
//! N-dimensional integer points, and the scalar value trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod point;
pub mod scalar;

pub use id::Label;
pub use point::{Coord, Point};
pub use scalar::Scalar;
