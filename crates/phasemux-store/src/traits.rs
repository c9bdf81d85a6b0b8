//! Image access trait consumed by single-label views.

use phasemux_core::{Label, Point, Scalar};
use phasemux_space::Domain;

/// Read/write surface of a multi-field image.
///
/// Indices are column-major linear indices within [`domain`](Self::domain).
/// Callers guarantee that points lie in the domain and labels are below
/// [`label_count`](Self::label_count).
pub trait MultiImage {
    /// Value type.
    type Value: Scalar;

    /// Domain shared by every label.
    fn domain(&self) -> &Domain;

    /// Number of labels.
    fn label_count(&self) -> usize;

    /// Value read where nothing is stored.
    fn default_value(&self) -> Self::Value;

    /// Value of `label` at `point`.
    fn get_value(&self, point: &Point, label: Label) -> Self::Value;

    /// Value of `label` at linear index `index`.
    fn get_value_at(&self, index: usize, label: Label) -> Self::Value;

    /// Write the value of `label` at `point`.
    fn set_value(&mut self, point: &Point, label: Label, value: Self::Value);

    /// Write the value of `label` at linear index `index`.
    fn set_value_at(&mut self, index: usize, label: Label, value: Self::Value);

    /// Bounding box of `label` grown by `buffer`, clipped to the domain.
    fn bounding_box(&self, label: Label, buffer: &Point) -> Domain;
}
