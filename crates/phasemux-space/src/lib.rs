//! Hyper-rectangular domains and point linearization for phasemux.
//!
//! This crate defines the [`Domain`] box every multi-field image lives on,
//! and the [`Linearizer`] that maps its points to flat storage indices.
//!
//! # Storage orders
//!
//! - [`ColMajor`]: axis 0 fastest. Used by all phasemux storage and by
//!   canonical domain iteration.
//! - [`RowMajor`]: last axis fastest. Provided for interop with row-major
//!   consumers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod linearizer;

#[cfg(test)]
pub(crate) mod compliance;

pub use domain::{Domain, DomainIter, Extent};
pub use error::SpaceError;
pub use linearizer::{ColMajor, Linearizer, RowMajor, StorageOrder};
