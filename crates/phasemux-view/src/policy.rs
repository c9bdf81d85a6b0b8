//! Iteration-domain policies for image views.
//!
//! A policy only decides which points a view iterates. Reads and writes
//! through a view reach the whole store domain whatever the policy.

use phasemux_core::{Label, Point};
use phasemux_space::Domain;
use phasemux_store::MultiImage;

/// Computes the iteration domain of a view of `label` over `image`.
pub trait DomainPolicy {
    /// The domain to iterate.
    fn compute<M: MultiImage + ?Sized>(&self, image: &M, label: Label) -> Domain;
}

/// Iterate the whole store domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FullDomain;

impl DomainPolicy for FullDomain {
    fn compute<M: MultiImage + ?Sized>(&self, image: &M, _label: Label) -> Domain {
        image.domain().clone()
    }
}

/// Iterate the label's bounding box grown by `buffer`, clipped to the
/// store domain. Empty when the label stores nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundingBoxDomain {
    buffer: Point,
}

impl BoundingBoxDomain {
    /// Grow the box by `buffer[i]` on both sides of axis `i`.
    pub fn new(buffer: Point) -> Self {
        Self { buffer }
    }

    /// Grow the box by `buffer` on every side.
    pub fn uniform(ndim: usize, buffer: i32) -> Self {
        Self::new(Point::diagonal(ndim, buffer))
    }

    /// The buffer.
    pub fn buffer(&self) -> &Point {
        &self.buffer
    }
}

impl DomainPolicy for BoundingBoxDomain {
    fn compute<M: MultiImage + ?Sized>(&self, image: &M, label: Label) -> Domain {
        image.bounding_box(label, &self.buffer)
    }
}
