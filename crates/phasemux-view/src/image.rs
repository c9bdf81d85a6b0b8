//! Single-field image traits and a dense reference image.

use phasemux_core::{Point, Scalar};
use phasemux_space::{ColMajor, Domain, Linearizer};

/// A scalar field over a domain.
pub trait Image {
    /// Value type.
    type Value: Scalar;

    /// Points the image is defined on.
    fn domain(&self) -> &Domain;

    /// Value at `point`, which must lie in [`domain`](Self::domain).
    fn get_value(&self, point: &Point) -> Self::Value;
}

/// A writable [`Image`].
pub trait ImageMut: Image {
    /// Overwrite the value at `point`.
    fn set_value(&mut self, point: &Point, value: Self::Value);
}

/// Dense image storing one value per point in column-major order.
///
/// Used to materialize views for export and as the dense baseline in
/// benchmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseImage<V> {
    domain: Domain,
    values: Vec<V>,
}

impl<V: Scalar> DenseImage<V> {
    /// Image over `domain` with every value set to `fill`.
    pub fn new(domain: Domain, fill: V) -> Self {
        let values = vec![fill; domain.size()];
        Self { domain, values }
    }

    /// Image over `domain` with values computed per point in canonical order.
    pub fn from_fn(domain: Domain, mut f: impl FnMut(&Point) -> V) -> Self {
        let values = domain.iter().map(|p| f(&p)).collect();
        Self { domain, values }
    }

    pub(crate) fn from_parts(domain: Domain, values: Vec<V>) -> Self {
        debug_assert_eq!(values.len(), domain.size());
        Self { domain, values }
    }

    /// Values in column-major order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Mutable values in column-major order.
    pub fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    /// Consume the image, returning its values.
    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<V: Scalar> Image for DenseImage<V> {
    type Value = V;

    fn domain(&self) -> &Domain {
        &self.domain
    }

    #[inline]
    fn get_value(&self, point: &Point) -> V {
        self.values[Linearizer::<ColMajor>::index_in(point, &self.domain)]
    }
}

impl<V: Scalar> ImageMut for DenseImage<V> {
    #[inline]
    fn set_value(&mut self, point: &Point, value: V) {
        let index = Linearizer::<ColMajor>::index_in(point, &self.domain);
        self.values[index] = value;
    }
}
