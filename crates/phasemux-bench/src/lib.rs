//! Benchmark workloads for phasemux.
//!
//! The reference workload is a phase-field layout: `n^d` labels, each a
//! smooth `tanh` bump centred on a regular lattice over the domain. Every
//! point is significant for only the few labels whose bump reaches it, so
//! the multi-field store holds a small fraction of the `size * labels`
//! values a vector of dense images would.
//!
//! - [`PhaseLayout`]: lattice of phase centres and the profile function.
//! - [`fill_store`] / [`fill_dense`]: populate both representations.
//! - `sum_*`: the read patterns compared in the benches.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use phasemux_core::{Label, Point};
use phasemux_space::Domain;
use phasemux_store::{Approximation, BoundsTracker, MultiFieldStore, SparseRow};
use phasemux_view::{BoundingBoxDomain, DenseImage, ImageMut, ViewExt};

/// `n^d` phase bumps over a domain.
///
/// `radius` is given in lattice cells along axis 0; `eps` is the interface
/// width in grid points.
#[derive(Clone, Debug)]
pub struct PhaseLayout {
    domain: Domain,
    centers: Vec<Vec<f64>>,
    radius: f64,
    eps: f64,
}

impl PhaseLayout {
    /// Lattice of `n` phases per axis over `domain`.
    pub fn new(domain: Domain, n: usize, radius: f64, eps: f64) -> Self {
        let ndim = domain.ndim();
        let spacing: Vec<f64> = domain
            .extent()
            .iter()
            .map(|&e| e as f64 / n as f64)
            .collect();
        let lattice = Domain::from_shape(&vec![n; ndim]).expect("lattice shape");
        let centers = lattice
            .iter()
            .map(|pos| {
                (0..ndim)
                    .map(|d| {
                        f64::from(domain.lower_bound()[d]) + spacing[d] * (f64::from(pos[d]) + 0.5)
                    })
                    .collect()
            })
            .collect();
        Self {
            radius: radius * spacing[0],
            domain,
            centers,
            eps,
        }
    }

    /// The domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of labels (`n^d`).
    pub fn label_count(&self) -> usize {
        self.centers.len()
    }

    /// Value of phase `label` at `point`: `0.5 * (1 - tanh((r - R) / (2 eps)))`.
    pub fn value(&self, point: &Point, label: usize) -> f64 {
        let center = &self.centers[label];
        let r = point
            .iter()
            .zip(center)
            .map(|(&p, &c)| (f64::from(p) - c).powi(2))
            .sum::<f64>()
            .sqrt();
        0.5 * (1.0 - (0.5 * (r - self.radius) / self.eps).tanh())
    }
}

/// Write every phase value into `store`; returns the sum of written values.
pub fn fill_store<A, R, B>(layout: &PhaseLayout, store: &mut MultiFieldStore<A, R, B>) -> f64
where
    A: Approximation<Value = f64>,
    R: SparseRow<f64>,
    B: BoundsTracker,
{
    let mut sum = 0.0;
    for p in layout.domain().iter() {
        for l in 0..layout.label_count() {
            let v = layout.value(&p, l);
            store.set_value(&p, Label(l as u32), v);
            sum += v;
        }
    }
    sum
}

/// One dense image per phase.
pub fn fill_dense(layout: &PhaseLayout) -> Vec<DenseImage<f64>> {
    (0..layout.label_count())
        .map(|l| {
            let mut image = DenseImage::new(layout.domain().clone(), 0.0);
            for p in layout.domain().iter() {
                image.set_value(&p, layout.value(&p, l));
            }
            image
        })
        .collect()
}

/// Sum of every stored value, read row by row.
pub fn sum_store_rows<A, R, B>(store: &MultiFieldStore<A, R, B>) -> f64
where
    A: Approximation<Value = f64>,
    R: SparseRow<f64>,
    B: BoundsTracker,
{
    store
        .rows()
        .iter()
        .flat_map(|row| row.iter().map(|(_, v)| v))
        .sum()
}

/// Sum of one label over its tight bounding box.
pub fn sum_store_label<A, R, B>(store: &MultiFieldStore<A, R, B>, label: Label) -> f64
where
    A: Approximation<Value = f64>,
    R: SparseRow<f64>,
    B: BoundsTracker,
{
    let ndim = store.domain().ndim();
    store
        .view_with(label, BoundingBoxDomain::uniform(ndim, 0))
        .iter()
        .sum()
}

/// Sum of one label over the full domain.
pub fn sum_store_label_full<A, R, B>(store: &MultiFieldStore<A, R, B>, label: Label) -> f64
where
    A: Approximation<Value = f64>,
    R: SparseRow<f64>,
    B: BoundsTracker,
{
    store.view(label).iter().sum()
}

/// Sum of every value of every dense image.
pub fn sum_dense(images: &[DenseImage<f64>]) -> f64 {
    images.iter().flat_map(|i| i.values().iter()).sum()
}
