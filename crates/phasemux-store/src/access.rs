//! Write-through handle to one `(point, label)` entry.

use phasemux_core::{Label, Point};
use phasemux_space::{ColMajor, Linearizer};

use crate::traits::MultiImage;

/// Handle to the value of one label at one point.
///
/// Reads and writes go straight to the image, so a write through the handle
/// keeps storage and bounding boxes in sync exactly like
/// [`MultiImage::set_value_at`].
pub struct LabelRef<'a, M: MultiImage + ?Sized> {
    image: &'a mut M,
    index: usize,
    label: Label,
}

impl<'a, M: MultiImage + ?Sized> LabelRef<'a, M> {
    /// Handle to `label` at linear index `index` of `image`.
    pub fn new(image: &'a mut M, index: usize, label: Label) -> Self {
        debug_assert!(index < image.domain().size());
        debug_assert!(label.index() < image.label_count());
        Self {
            image,
            index,
            label,
        }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> M::Value {
        self.image.get_value_at(self.index, self.label)
    }

    /// Overwrite the value.
    #[inline]
    pub fn set(&mut self, value: M::Value) {
        self.image.set_value_at(self.index, self.label, value);
    }

    /// Replace the value with `f(current)`.
    pub fn update(&mut self, f: impl FnOnce(M::Value) -> M::Value) {
        let value = f(self.get());
        self.set(value);
    }

    /// Linear index of the entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Label of the entry.
    pub fn label(&self) -> Label {
        self.label
    }

    /// Point of the entry.
    pub fn point(&self) -> Point {
        Linearizer::<ColMajor>::point_in(self.index, self.image.domain())
    }
}
