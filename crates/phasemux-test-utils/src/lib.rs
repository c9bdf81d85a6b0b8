//! Reference models and fixtures for phasemux development.
//!
//! [`ReferenceModel`] is a brute-force stand-in for a
//! [`MultiFieldStore`](phasemux_store::MultiFieldStore): a flat map of
//! stored entries with bounding boxes recomputed from scratch on every
//! query. Tests drive both with the same writes and compare.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;
use phasemux_core::{Label, Point};
use phasemux_space::{ColMajor, Domain, Linearizer};
use phasemux_store::{
    Approximation, AxisAlignedBoundingBox, BoundsTracker, MultiFieldStore, SparseRow,
};

/// Brute-force multi-field image.
///
/// Entries are keyed by `(linear index, label)` in insertion order; an
/// approximable write removes the key.
#[derive(Clone, Debug)]
pub struct ReferenceModel<A: Approximation> {
    domain: Domain,
    label_count: usize,
    approximation: A,
    entries: IndexMap<(usize, Label), A::Value>,
}

impl<A: Approximation> ReferenceModel<A> {
    pub fn new(domain: Domain, label_count: usize, approximation: A) -> Self {
        Self {
            domain,
            label_count,
            approximation,
            entries: IndexMap::new(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn set(&mut self, point: &Point, label: Label, value: A::Value) {
        let index = Linearizer::<ColMajor>::index_in(point, &self.domain);
        if self.approximation.eval(value) {
            self.entries.shift_remove(&(index, label));
        } else {
            self.entries.insert((index, label), value);
        }
    }

    pub fn get(&self, point: &Point, label: Label) -> A::Value {
        let index = Linearizer::<ColMajor>::index_in(point, &self.domain);
        self.entries
            .get(&(index, label))
            .copied()
            .unwrap_or_else(|| self.approximation.default_value())
    }

    pub fn stored_size(&self) -> usize {
        self.entries.len()
    }

    pub fn present_count(&self, label: Label) -> usize {
        self.entries.keys().filter(|(_, l)| *l == label).count()
    }

    /// Smallest box containing every stored point of `label`.
    pub fn bounding_box(&self, label: Label) -> Domain {
        let points = self
            .entries
            .keys()
            .filter(|(_, l)| *l == label)
            .map(|(i, _)| Linearizer::<ColMajor>::point_in(*i, &self.domain));
        brute_force_box(points, self.domain.ndim())
    }

    /// Panic unless `store` reads exactly like the model.
    pub fn assert_matches<R, B>(&self, store: &MultiFieldStore<A, R, B>)
    where
        R: SparseRow<A::Value>,
        B: BoundsTracker,
    {
        assert_eq!(store.domain(), &self.domain, "domain differs");
        assert_eq!(store.label_count(), self.label_count, "label count differs");
        assert_eq!(store.stored_size(), self.stored_size(), "stored size differs");
        for p in self.domain.iter() {
            for l in 0..self.label_count {
                let label = Label(l as u32);
                assert_eq!(
                    store.get_value(&p, label),
                    self.get(&p, label),
                    "value of label {label} differs at {p}"
                );
            }
        }
    }

    /// Panic unless every tracker of `store` reports the exact box.
    pub fn assert_boxes_match<R>(&self, store: &MultiFieldStore<A, R, AxisAlignedBoundingBox>)
    where
        R: SparseRow<A::Value>,
    {
        for l in 0..self.label_count {
            let label = Label(l as u32);
            assert_eq!(
                store.tight_bounding_box(label),
                self.bounding_box(label),
                "bounding box of label {label} differs"
            );
            assert_eq!(
                store.present_count(label),
                Some(self.present_count(label)),
                "present count of label {label} differs"
            );
        }
    }
}

/// Smallest domain containing every point, or `Domain::empty(ndim)`.
pub fn brute_force_box(points: impl IntoIterator<Item = Point>, ndim: usize) -> Domain {
    let mut bounds: Option<(Point, Point)> = None;
    for p in points {
        bounds = Some(match bounds {
            None => (p.clone(), p),
            Some((lo, hi)) => (lo.componentwise_min(&p), hi.componentwise_max(&p)),
        });
    }
    match bounds {
        Some((lo, hi)) => Domain::new(lo, hi).unwrap_or_else(|_| Domain::empty(ndim)),
        None => Domain::empty(ndim),
    }
}
