//! Linearization compliance test helpers.
//!
//! Reused by the linearizer and domain test modules to check that a
//! storage order is a bijection on a domain and that canonical iteration
//! agrees with column-major indexing.

use crate::domain::Domain;
use crate::linearizer::{ColMajor, Linearizer, StorageOrder};
use indexmap::IndexSet;

/// Assert `point(index(p)) == p` for every point and
/// `index(point(i)) == i` for every index of the domain.
pub fn assert_linearizer_bijection<O: StorageOrder>(domain: &Domain) {
    let mut seen = IndexSet::with_capacity(domain.size());
    for p in domain.iter() {
        let i = Linearizer::<O>::index_in(&p, domain);
        assert!(i < domain.size(), "index {i} of {p} exceeds size {}", domain.size());
        assert_eq!(Linearizer::<O>::point_in(i, domain), p, "point(index({p})) != {p}");
        assert!(seen.insert(i), "index {i} produced twice");
    }
    for i in 0..domain.size() {
        let p = Linearizer::<O>::point_in(i, domain);
        assert_eq!(Linearizer::<O>::index_in(&p, domain), i, "index(point({i})) != {i}");
    }
}

/// Assert that canonical iteration visits points in column-major index order.
pub fn assert_col_major_matches_iteration(domain: &Domain) {
    let mut count = 0usize;
    for (expected, p) in domain.iter().enumerate() {
        assert_eq!(
            Linearizer::<ColMajor>::index_in(&p, domain),
            expected,
            "canonical iteration out of order at {p}"
        );
        count += 1;
    }
    assert_eq!(count, domain.size(), "iteration length != domain size");
}
