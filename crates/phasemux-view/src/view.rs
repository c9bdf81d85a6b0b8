//! One label of a multi-field image, seen as a standalone image.

use phasemux_core::{Label, Point, Scalar};
use phasemux_space::{ColMajor, Domain, Linearizer};
use phasemux_store::{LabelRef, MultiImage, RangeError};
use tracing::debug;

use crate::cursor::{ViewCursor, ViewGeometry, ViewPositions};
use crate::image::{DenseImage, Image, ImageMut};
use crate::policy::{DomainPolicy, FullDomain};

// ── ImageView ───────────────────────────────────────────────────

/// Read-only view of one label.
///
/// The iteration domain is computed by the policy when the view is
/// created. Point reads reach the whole store domain.
pub struct ImageView<'a, M: MultiImage + ?Sized, P: DomainPolicy = FullDomain> {
    image: &'a M,
    label: Label,
    policy: P,
    geometry: ViewGeometry,
}

impl<'a, M: MultiImage + ?Sized, P: DomainPolicy> ImageView<'a, M, P> {
    /// View `label` of `image`, iterating the domain chosen by `policy`.
    pub fn new(image: &'a M, label: Label, policy: P) -> Self {
        debug_assert!(label.index() < image.label_count());
        let view = policy.compute(image, label);
        let geometry = ViewGeometry::new(view, image.domain());
        Self {
            image,
            label,
            policy,
            geometry,
        }
    }

    /// The viewed label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// The iteration domain.
    pub fn domain(&self) -> &Domain {
        self.geometry.view()
    }

    /// The domain policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Value at `point` of the store domain.
    #[inline]
    pub fn get_value(&self, point: &Point) -> M::Value {
        self.image.get_value(point, self.label)
    }

    /// Value at storage linear index `index`.
    #[inline]
    pub fn get_value_at(&self, index: usize) -> M::Value {
        self.image.get_value_at(index, self.label)
    }

    /// First and one-past-last cursors of the iteration domain.
    pub fn cursor_range(&self) -> (ViewCursor<'_>, ViewCursor<'_>) {
        (self.geometry.begin(), self.geometry.end())
    }

    /// `(point, storage index)` of every point of the iteration domain.
    pub fn positions(&self) -> ViewPositions<'_> {
        self.geometry.positions()
    }

    /// Values over the iteration domain in canonical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = M::Value> + ExactSizeIterator + '_ {
        self.positions().map(move |(_, i)| self.get_value_at(i))
    }

    /// `(point, value)` pairs over the iteration domain.
    pub fn indexed(&self) -> impl DoubleEndedIterator<Item = (Point, M::Value)> + ExactSizeIterator + '_ {
        self.positions().map(move |(p, i)| (p, self.get_value_at(i)))
    }

    /// Copy the iteration domain into a dense image.
    pub fn to_dense(&self) -> DenseImage<M::Value> {
        to_dense(&self.geometry, |i| self.get_value_at(i), self.label)
    }
}

impl<M: MultiImage + ?Sized, P: DomainPolicy> Image for ImageView<'_, M, P> {
    type Value = M::Value;

    fn domain(&self) -> &Domain {
        self.geometry.view()
    }

    fn get_value(&self, point: &Point) -> M::Value {
        self.image.get_value(point, self.label)
    }
}

// ── ImageViewMut ────────────────────────────────────────────────

/// Read-write view of one label.
///
/// Writes go through the store's `set_value_at`, so bounding boxes stay
/// exact. The iteration domain does not follow those writes until
/// [`refresh`](Self::refresh) is called.
pub struct ImageViewMut<'a, M: MultiImage + ?Sized, P: DomainPolicy = FullDomain> {
    image: &'a mut M,
    label: Label,
    policy: P,
    geometry: ViewGeometry,
}

impl<'a, M: MultiImage + ?Sized, P: DomainPolicy> ImageViewMut<'a, M, P> {
    /// Mutable view of `label` of `image`, iterating the domain chosen by `policy`.
    pub fn new(image: &'a mut M, label: Label, policy: P) -> Self {
        debug_assert!(label.index() < image.label_count());
        let view = policy.compute(&*image, label);
        let geometry = ViewGeometry::new(view, image.domain());
        Self {
            image,
            label,
            policy,
            geometry,
        }
    }

    /// Recompute the iteration domain from the current store state.
    pub fn refresh(&mut self) {
        let view = self.policy.compute(&*self.image, self.label);
        self.geometry = ViewGeometry::new(view, self.image.domain());
    }

    /// The viewed label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// The iteration domain.
    pub fn domain(&self) -> &Domain {
        self.geometry.view()
    }

    /// The domain policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Value at `point` of the store domain.
    #[inline]
    pub fn get_value(&self, point: &Point) -> M::Value {
        self.image.get_value(point, self.label)
    }

    /// Value at storage linear index `index`.
    #[inline]
    pub fn get_value_at(&self, index: usize) -> M::Value {
        self.image.get_value_at(index, self.label)
    }

    /// Write the value at `point` of the store domain.
    #[inline]
    pub fn set_value(&mut self, point: &Point, value: M::Value) {
        self.image.set_value(point, self.label, value);
    }

    /// Write the value at storage linear index `index`.
    #[inline]
    pub fn set_value_at(&mut self, index: usize, value: M::Value) {
        self.image.set_value_at(index, self.label, value);
    }

    /// Handle to the entry at `point`.
    pub fn entry(&mut self, point: &Point) -> LabelRef<'_, M> {
        let index = Linearizer::<ColMajor>::index_in(point, self.image.domain());
        LabelRef::new(&mut *self.image, index, self.label)
    }

    /// First and one-past-last cursors of the iteration domain.
    pub fn cursor_range(&self) -> (ViewCursor<'_>, ViewCursor<'_>) {
        (self.geometry.begin(), self.geometry.end())
    }

    /// `(point, storage index)` of every point of the iteration domain.
    pub fn positions(&self) -> ViewPositions<'_> {
        self.geometry.positions()
    }

    /// Values over the iteration domain in canonical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = M::Value> + ExactSizeIterator + '_ {
        self.positions().map(move |(_, i)| self.get_value_at(i))
    }

    /// `(point, value)` pairs over the iteration domain.
    pub fn indexed(&self) -> impl DoubleEndedIterator<Item = (Point, M::Value)> + ExactSizeIterator + '_ {
        self.positions().map(move |(p, i)| (p, self.get_value_at(i)))
    }

    /// Replace every value of the iteration domain with `f(point, value)`.
    pub fn update(&mut self, mut f: impl FnMut(&Point, M::Value) -> M::Value) {
        let label = self.label;
        for (p, i) in self.geometry.positions() {
            let value = f(&p, self.image.get_value_at(i, label));
            self.image.set_value_at(i, label, value);
        }
    }

    /// Write every value of `source` at the same points of this label.
    ///
    /// Fails without writing anything if `source`'s domain is not inside
    /// the store domain.
    pub fn copy_from<I>(&mut self, source: &I) -> Result<(), RangeError>
    where
        I: Image<Value = M::Value> + ?Sized,
    {
        let full = self.image.domain();
        if !source.domain().is_subset_of(full) {
            let corner = source.domain().lower_bound();
            let point = if full.contains(corner) {
                source.domain().upper_bound().clone()
            } else {
                corner.clone()
            };
            return Err(RangeError::PointOutOfDomain {
                point,
                domain: full.clone(),
            });
        }
        for p in source.domain().iter() {
            self.image.set_value(&p, self.label, source.get_value(&p));
        }
        Ok(())
    }

    /// Copy the iteration domain into a dense image.
    pub fn to_dense(&self) -> DenseImage<M::Value> {
        to_dense(&self.geometry, |i| self.get_value_at(i), self.label)
    }
}

impl<M: MultiImage + ?Sized, P: DomainPolicy> Image for ImageViewMut<'_, M, P> {
    type Value = M::Value;

    fn domain(&self) -> &Domain {
        self.geometry.view()
    }

    fn get_value(&self, point: &Point) -> M::Value {
        self.image.get_value(point, self.label)
    }
}

impl<M: MultiImage + ?Sized, P: DomainPolicy> ImageMut for ImageViewMut<'_, M, P> {
    fn set_value(&mut self, point: &Point, value: M::Value) {
        self.image.set_value(point, self.label, value);
    }
}

fn to_dense<V: Scalar>(
    geometry: &ViewGeometry,
    read: impl Fn(usize) -> V,
    label: Label,
) -> DenseImage<V> {
    let values = geometry.positions().map(|(_, i)| read(i)).collect();
    let dense = DenseImage::from_parts(geometry.view().clone(), values);
    debug!(
        label = %label,
        domain = %geometry.view(),
        points = geometry.view().size(),
        "view materialized"
    );
    dense
}

// ── ViewExt ─────────────────────────────────────────────────────

/// View constructors for every [`MultiImage`].
pub trait ViewExt: MultiImage {
    /// Read-only view of `label` over the whole domain.
    fn view(&self, label: Label) -> ImageView<'_, Self, FullDomain> {
        ImageView::new(self, label, FullDomain)
    }

    /// Read-only view of `label` with a custom domain policy.
    fn view_with<P: DomainPolicy>(&self, label: Label, policy: P) -> ImageView<'_, Self, P> {
        ImageView::new(self, label, policy)
    }

    /// Read-write view of `label` over the whole domain.
    fn view_mut(&mut self, label: Label) -> ImageViewMut<'_, Self, FullDomain> {
        ImageViewMut::new(self, label, FullDomain)
    }

    /// Read-write view of `label` with a custom domain policy.
    fn view_mut_with<P: DomainPolicy>(&mut self, label: Label, policy: P) -> ImageViewMut<'_, Self, P> {
        ImageViewMut::new(self, label, policy)
    }
}

impl<M: MultiImage + ?Sized> ViewExt for M {}
