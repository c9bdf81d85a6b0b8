//! phasemux: many sparse scalar fields multiplexed over one N-dimensional grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all phasemux sub-crates. For most users, adding `phasemux` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use phasemux::prelude::*;
//!
//! // Four fields over an 11x11 grid; values <= 1e-10 are not stored.
//! let domain = Domain::new(Point::from([0, 0]), Point::from([10, 10])).unwrap();
//! let mut store: MultiFieldStore<_> =
//!     MultiFieldStore::new(domain, 4, NegativeTolApproximation::new(1e-10)).unwrap();
//!
//! store.set_value(&Point::from([2, 2]), Label(1), 0.7);
//! store.set_value(&Point::from([8, 8]), Label(1), 0.7);
//! assert_eq!(
//!     store.tight_bounding_box(Label(1)),
//!     Domain::new(Point::from([2, 2]), Point::from([8, 8])).unwrap()
//! );
//!
//! // Eliding a corner shrinks the box.
//! store.set_value(&Point::from([2, 2]), Label(1), -1e-12);
//! assert_eq!(store.get_value(&Point::from([2, 2]), Label(1)), 0.0);
//! assert_eq!(store.tight_bounding_box(Label(1)).size(), 1);
//!
//! // Iterate one field over its bounding box grown by one point.
//! let view = store.view_with(Label(1), BoundingBoxDomain::uniform(2, 1));
//! assert_eq!(view.domain().size(), 9);
//! assert_eq!(view.iter().sum::<f64>(), 0.7);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `phasemux-core` | Labels, points, scalar values |
//! | [`space`] | `phasemux-space` | Domains and linearization |
//! | [`store`] | `phasemux-store` | The multi-field store, policies, rows, trackers |
//! | [`view`] | `phasemux-view` | Single-label views, cursors, dense images |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Labels, points and scalar values (`phasemux-core`).
pub use phasemux_core as types;

/// Domains and point linearization (`phasemux-space`).
///
/// Provides [`space::Domain`] and [`space::Linearizer`] with the
/// [`space::ColMajor`] and [`space::RowMajor`] storage orders.
pub use phasemux_space as space;

/// Approximated sparse multi-field storage (`phasemux-store`).
///
/// [`store::MultiFieldStore`] is the container; approximation policies,
/// sparse rows and bounding-box trackers are its type parameters.
pub use phasemux_store as store;

/// Single-label image views (`phasemux-view`).
///
/// Build [`view::ImageView`]s with the [`view::ViewExt`] methods and
/// materialize them as [`view::DenseImage`]s.
pub use phasemux_view as view;

/// Common imports for typical phasemux usage.
///
/// ```rust
/// use phasemux::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use phasemux_core::{Label, Point, Scalar};

    // Space
    pub use phasemux_space::{ColMajor, Domain, Linearizer};

    // Store
    pub use phasemux_store::{
        Approximation, AxisAlignedBoundingBox, MaskedRow, MultiFieldStore, MultiImage,
        NegativeApproximation, NegativeTolApproximation, NoApproximation, NoBoundingBox,
        SmallRow, StoreConfig, ZeroApproximation, ZeroTolApproximation,
    };

    // Errors
    pub use phasemux_store::{ConfigError, ConsistencyError, RangeError};

    // Views
    pub use phasemux_view::{
        BoundingBoxDomain, DenseImage, FullDomain, Image, ImageMut, ImageView, ImageViewMut,
        ViewExt,
    };
}
