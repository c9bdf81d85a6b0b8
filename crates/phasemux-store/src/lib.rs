//! Approximated sparse storage for multi-field images.
//!
//! A [`MultiFieldStore`] multiplexes `L` scalar fields (labels) over one
//! [`Domain`](phasemux_space::Domain). Only values that the
//! [`Approximation`] policy considers significant are stored; everything
//! else reads back as the policy's default value. Per-label
//! [`BoundsTracker`]s follow the region where each label is present.
//!
//! # Architecture
//!
//! ```text
//! MultiFieldStore<A, R, B>
//! ├── Domain (shape, column-major linearization)
//! ├── Vec<R: SparseRow>        one row per point, (label, value) entries
//! ├── Vec<B: BoundsTracker>    one per label
//! └── A: Approximation         decides which values are elided
//! ```
//!
//! Every write funnels through `set_value_at`, which keeps the rows, the
//! stored-entry count and the trackers in agreement.
//!
//! # Policies
//!
//! - Approximation: [`NoApproximation`], [`ZeroApproximation`],
//!   [`ZeroTolApproximation`], [`NegativeApproximation`],
//!   [`NegativeTolApproximation`].
//! - Rows: [`SmallRow`] (unbounded labels), [`MaskedRow`] (up to 64).
//! - Trackers: [`AxisAlignedBoundingBox`] (exact), [`NoBoundingBox`]
//!   (always the full domain).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod access;
pub mod approx;
pub mod bbox;
mod check;
pub mod config;
pub mod error;
pub mod row;
pub mod store;
pub mod traits;

pub use access::LabelRef;
pub use approx::{
    Approximation, NegativeApproximation, NegativeTolApproximation, NoApproximation,
    ZeroApproximation, ZeroTolApproximation,
};
pub use bbox::{AxisAlignedBoundingBox, BoundsTracker, NoBoundingBox};
pub use config::StoreConfig;
pub use error::{ConfigError, ConsistencyError, RangeError};
pub use row::{MaskedRow, SmallRow, SparseRow};
pub use store::MultiFieldStore;
pub use traits::MultiImage;
