//! Single-label views over phasemux multi-field stores.
//!
//! An [`ImageView`] or [`ImageViewMut`] presents one label of a
//! [`MultiImage`](phasemux_store::MultiImage) as a standalone [`Image`],
//! without copying storage. A [`DomainPolicy`] picks the points the view
//! iterates: the whole store domain ([`FullDomain`]) or the label's
//! bounding box grown by a buffer ([`BoundingBoxDomain`]).
//!
//! Iteration walks the view domain with a [`ViewCursor`], which keeps the
//! storage linear index of the current point up to date across axis
//! carries so that no per-point re-linearization is needed.
//!
//! ```
//! use phasemux_core::{Label, Point};
//! use phasemux_space::Domain;
//! use phasemux_store::{MultiFieldStore, ZeroApproximation};
//! use phasemux_view::{BoundingBoxDomain, ViewExt};
//!
//! let domain = Domain::from_shape(&[8, 8]).unwrap();
//! let mut store: MultiFieldStore<_> =
//!     MultiFieldStore::new(domain, 3, ZeroApproximation::<f32>::new()).unwrap();
//! store.set_value(&Point::from([2, 3]), Label(1), 1.0);
//! store.set_value(&Point::from([4, 3]), Label(1), 2.0);
//!
//! let view = store.view_with(Label(1), BoundingBoxDomain::uniform(2, 0));
//! assert_eq!(view.domain().size(), 3);
//! assert_eq!(view.iter().sum::<f32>(), 3.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cursor;
pub mod image;
pub mod policy;
pub mod view;

pub use cursor::{ViewCursor, ViewGeometry, ViewPositions};
pub use image::{DenseImage, Image, ImageMut};
pub use policy::{BoundingBoxDomain, DomainPolicy, FullDomain};
pub use view::{ImageView, ImageViewMut, ViewExt};
