//! Bijection between grid points and flat indices.
//!
//! A flat index is `sum_d (p[d] - lower[d]) * stride[d]` where the strides
//! follow the storage order: with [`ColMajor`] axis 0 varies fastest, with
//! [`RowMajor`] the last axis varies fastest.

use crate::domain::Domain;
use crate::error::SpaceError;
use phasemux_core::Point;
use std::marker::PhantomData;

/// Storage order of a linearization.
///
/// `axis(step, ndim)` returns the axis handled at `step`, where step 0 is
/// the slowest-varying axis and step `ndim - 1` the fastest.
pub trait StorageOrder {
    /// Axis processed at the given step (0 = slowest).
    fn axis(step: usize, ndim: usize) -> usize;
}

/// Last axis fastest (C order).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowMajor;

/// Axis 0 fastest (Fortran order). Matches canonical domain iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColMajor;

impl StorageOrder for RowMajor {
    #[inline]
    fn axis(step: usize, _ndim: usize) -> usize {
        step
    }
}

impl StorageOrder for ColMajor {
    #[inline]
    fn axis(step: usize, ndim: usize) -> usize {
        ndim - 1 - step
    }
}

/// Linearization and de-linearization for a given storage order.
///
/// All functions are associated (no state). The unchecked variants assume
/// the point lies in the described box; the `try_` variants validate first.
///
/// # Examples
///
/// ```
/// use phasemux_core::Point;
/// use phasemux_space::{ColMajor, Domain, Linearizer, RowMajor};
///
/// let domain = Domain::new(Point::from([1, 2]), Point::from([3, 5])).unwrap();
/// let p = Point::from([2, 4]);
/// assert_eq!(Linearizer::<ColMajor>::index_in(&p, &domain), 7);
/// assert_eq!(Linearizer::<RowMajor>::index_in(&p, &domain), 6);
/// assert_eq!(Linearizer::<ColMajor>::point_in(7, &domain), p);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Linearizer<O: StorageOrder = ColMajor>(PhantomData<O>);

impl<O: StorageOrder> Linearizer<O> {
    /// Flat index of `point` in the box starting at `lower` with the given extent.
    #[inline]
    pub fn index(point: &Point, lower: &Point, extent: &[usize]) -> usize {
        let ndim = extent.len();
        debug_assert_eq!(point.ndim(), ndim);
        let mut index = 0usize;
        for step in 0..ndim {
            let axis = O::axis(step, ndim);
            let offset = (i64::from(point[axis]) - i64::from(lower[axis])) as usize;
            index = index * extent[axis] + offset;
        }
        index
    }

    /// Flat index of `point` within `domain`.
    #[inline]
    pub fn index_in(point: &Point, domain: &Domain) -> usize {
        Self::index(point, domain.lower_bound(), domain.extent())
    }

    /// Point whose flat index in the box (`lower`, `extent`) is `index`.
    ///
    /// The slowest axis receives the undivided quotient, so `index == size`
    /// maps to the point just past the upper bound on that axis. That
    /// coordinate saturates at `i32::MAX`.
    #[inline]
    pub fn point(index: usize, lower: &Point, extent: &[usize]) -> Point {
        let ndim = extent.len();
        let mut point = lower.clone();
        let mut rest = index;
        for step in (1..ndim).rev() {
            let axis = O::axis(step, ndim);
            point[axis] = offset_by(lower[axis], rest % extent[axis]);
            rest /= extent[axis];
        }
        let axis = O::axis(0, ndim);
        point[axis] = offset_by(lower[axis], rest);
        point
    }

    /// Point whose flat index within `domain` is `index`.
    #[inline]
    pub fn point_in(index: usize, domain: &Domain) -> Point {
        Self::point(index, domain.lower_bound(), domain.extent())
    }

    /// Checked [`index_in`](Self::index_in).
    pub fn try_index_in(point: &Point, domain: &Domain) -> Result<usize, SpaceError> {
        if point.ndim() != domain.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: domain.ndim(),
                got: point.ndim(),
            });
        }
        if !domain.contains(point) {
            return Err(SpaceError::PointOutOfBounds {
                point: point.clone(),
                bounds: domain.to_string(),
            });
        }
        Ok(Self::index_in(point, domain))
    }

    /// Checked [`point_in`](Self::point_in).
    pub fn try_point_in(index: usize, domain: &Domain) -> Result<Point, SpaceError> {
        if index >= domain.size() {
            return Err(SpaceError::IndexOutOfBounds {
                index,
                size: domain.size(),
            });
        }
        Ok(Self::point_in(index, domain))
    }
}

/// `base + offset`, saturating at the `i32` range.
#[inline]
fn offset_by(base: i32, offset: usize) -> i32 {
    let shifted = i64::from(base).saturating_add(i64::try_from(offset).unwrap_or(i64::MAX));
    i32::try_from(shifted).unwrap_or(i32::MAX)
}
