//! Reusable domains, stores and seeded write streams.

use phasemux_core::{Label, Point};
use phasemux_space::Domain;
use phasemux_store::{MultiFieldStore, ZeroTolApproximation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tolerance of the scenario store.
pub const SCENARIO_TOL: f64 = 0.1;

/// `[(0, 0), (10, 10)]`: 121 points.
pub fn scenario_domain() -> Domain {
    Domain::from_shape(&[11, 11]).expect("11x11 domain")
}

/// Two labels over [`scenario_domain`] with `|v| <= 0.1` approximated.
pub fn scenario_store() -> MultiFieldStore<ZeroTolApproximation<f64>> {
    MultiFieldStore::new(scenario_domain(), 2, ZeroTolApproximation::new(SCENARIO_TOL))
        .expect("scenario store")
}

/// One `set_value` call.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteOp {
    pub point: Point,
    pub label: Label,
    pub value: f64,
}

/// `count` writes at uniformly random points and labels of `domain`.
///
/// Half of the values fall inside `[-tol, tol]` so that erasures are as
/// frequent as insertions. Deterministic for a given seed.
pub fn random_writes(
    seed: u64,
    domain: &Domain,
    label_count: usize,
    tol: f64,
    count: usize,
) -> Vec<WriteOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let point: Point = (0..domain.ndim())
                .map(|d| rng.random_range(domain.lower_bound()[d]..=domain.upper_bound()[d]))
                .collect();
            let label = Label(rng.random_range(0..label_count as u32));
            let value = if rng.random::<bool>() {
                rng.random_range(-tol..=tol)
            } else {
                let magnitude = rng.random_range(tol * 1.5..=tol * 10.0);
                if rng.random::<bool>() {
                    magnitude
                } else {
                    -magnitude
                }
            };
            WriteOp {
                point,
                label,
                value,
            }
        })
        .collect()
}
