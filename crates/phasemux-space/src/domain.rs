//! Axis-aligned hyper-rectangular domains.

use crate::error::SpaceError;
use phasemux_core::Point;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FusedIterator;

/// Per-axis number of points of a domain.
pub type Extent = SmallVec<[usize; 4]>;

/// An axis-aligned box of integer points, bounds inclusive on both sides.
///
/// A domain is either non-empty (`lower <= upper` on every axis) or the
/// canonical empty domain returned by [`Domain::empty`]. Iteration visits
/// points in canonical order: axis 0 varies fastest, which is the order
/// of [`ColMajor`](crate::ColMajor) linearization.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    lower: Point,
    upper: Point,
    extent: Extent,
    size: usize,
}

impl Domain {
    /// Build a domain from its inclusive lower and upper bounds.
    ///
    /// Returns an error if the bounds disagree on dimensionality, have zero
    /// dimensions, are inverted on some axis, or describe more points than
    /// fit in `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use phasemux_core::Point;
    /// use phasemux_space::Domain;
    ///
    /// let domain = Domain::new(Point::from([0, 0]), Point::from([10, 10])).unwrap();
    /// assert_eq!(domain.size(), 121);
    /// assert_eq!(domain.extent().as_slice(), &[11, 11]);
    /// ```
    pub fn new(lower: Point, upper: Point) -> Result<Self, SpaceError> {
        if lower.ndim() == 0 {
            return Err(SpaceError::ZeroDimensions);
        }
        if lower.ndim() != upper.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: lower.ndim(),
                got: upper.ndim(),
            });
        }
        let mut extent = Extent::with_capacity(lower.ndim());
        let mut size: usize = 1;
        for axis in 0..lower.ndim() {
            let (lo, hi) = (lower[axis], upper[axis]);
            if lo > hi {
                return Err(SpaceError::InvertedBounds {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
            let len = usize::try_from(i64::from(hi) - i64::from(lo) + 1)
                .map_err(|_| SpaceError::DomainTooLarge { axis })?;
            size = size
                .checked_mul(len)
                .ok_or(SpaceError::DomainTooLarge { axis })?;
            extent.push(len);
        }
        Ok(Self {
            lower,
            upper,
            extent,
            size,
        })
    }

    /// Domain `[0, shape[i] - 1]` on every axis.
    pub fn from_shape(shape: &[usize]) -> Result<Self, SpaceError> {
        let mut upper = Point::zeros(shape.len());
        for (axis, &len) in shape.iter().enumerate() {
            if len == 0 {
                return Err(SpaceError::InvertedBounds {
                    axis,
                    lower: 0,
                    upper: -1,
                });
            }
            upper[axis] = i32::try_from(len - 1).map_err(|_| SpaceError::DomainTooLarge { axis })?;
        }
        Self::new(Point::zeros(shape.len()), upper)
    }

    /// The canonical empty domain in `ndim` dimensions.
    ///
    /// It contains no point and iterates zero times.
    pub fn empty(ndim: usize) -> Self {
        Self {
            lower: Point::zeros(ndim),
            upper: Point::diagonal(ndim, -1),
            extent: smallvec::smallvec![0; ndim],
            size: 0,
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.lower.ndim()
    }

    /// Inclusive lower corner.
    #[inline]
    pub fn lower_bound(&self) -> &Point {
        &self.lower
    }

    /// Inclusive upper corner.
    #[inline]
    pub fn upper_bound(&self) -> &Point {
        &self.upper
    }

    /// Number of points along each axis.
    #[inline]
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Total number of points.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if the domain contains no point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `true` if `point` lies inside the domain.
    pub fn contains(&self, point: &Point) -> bool {
        !self.is_empty()
            && point.ndim() == self.ndim()
            && self.lower.all_le(point)
            && point.all_le(&self.upper)
    }

    /// `true` if every point of `self` is in `other`. The empty domain is a
    /// subset of everything.
    pub fn is_subset_of(&self, other: &Domain) -> bool {
        self.is_empty() || (other.contains(&self.lower) && other.contains(&self.upper))
    }

    /// The domain grown by `buffer[i]` points on both sides of axis `i`.
    ///
    /// The empty domain stays empty. A negative buffer shrinks the domain
    /// and yields the empty domain once it inverts.
    pub fn grow(&self, buffer: &Point) -> Domain {
        if self.is_empty() {
            return self.clone();
        }
        debug_assert_eq!(buffer.ndim(), self.ndim());
        let lower: Point = self
            .lower
            .iter()
            .zip(buffer.iter())
            .map(|(l, b)| l.saturating_sub(*b))
            .collect();
        let upper: Point = self
            .upper
            .iter()
            .zip(buffer.iter())
            .map(|(u, b)| u.saturating_add(*b))
            .collect();
        Self::new_or_empty(lower, upper)
    }

    /// Intersection of two domains; empty when they are disjoint.
    pub fn intersect(&self, other: &Domain) -> Domain {
        if self.is_empty() || other.is_empty() {
            return Self::empty(self.ndim());
        }
        Self::new_or_empty(
            self.lower.componentwise_max(&other.lower),
            self.upper.componentwise_min(&other.upper),
        )
    }

    /// Iterate over all points in canonical order (axis 0 fastest).
    pub fn iter(&self) -> DomainIter {
        DomainIter {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            current: self.lower.clone(),
            remaining: self.size,
        }
    }

    fn new_or_empty(lower: Point, upper: Point) -> Domain {
        let ndim = lower.ndim();
        Self::new(lower, upper).unwrap_or_else(|_| Self::empty(ndim))
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty {}D]", self.ndim())
        } else {
            write!(f, "[{}, {}]", self.lower, self.upper)
        }
    }
}

impl<'a> IntoIterator for &'a Domain {
    type Item = Point;
    type IntoIter = DomainIter;

    fn into_iter(self) -> DomainIter {
        self.iter()
    }
}

/// Canonical-order iterator over the points of a [`Domain`].
#[derive(Clone, Debug)]
pub struct DomainIter {
    lower: Point,
    upper: Point,
    current: Point,
    remaining: usize,
}

impl Iterator for DomainIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            for axis in 0..self.current.ndim() {
                if self.current[axis] < self.upper[axis] {
                    self.current[axis] += 1;
                    break;
                }
                self.current[axis] = self.lower[axis];
            }
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DomainIter {}

impl FusedIterator for DomainIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(lo: [i32; 2], hi: [i32; 2]) -> Domain {
        Domain::new(Point::from(lo), Point::from(hi)).unwrap()
    }

    #[test]
    fn size_and_extent() {
        let dom = d([1, 2], [10, 20]);
        assert_eq!(dom.extent().as_slice(), &[10, 19]);
        assert_eq!(dom.size(), 190);
        assert!(!dom.is_empty());
    }

    #[test]
    fn new_rejects_bad_bounds() {
        assert_eq!(
            Domain::new(Point::from([0, 5]), Point::from([3, 4])),
            Err(SpaceError::InvertedBounds {
                axis: 1,
                lower: 5,
                upper: 4
            })
        );
        assert_eq!(
            Domain::new(Point::from([0]), Point::from([3, 4])),
            Err(SpaceError::DimensionMismatch {
                expected: 1,
                got: 2
            })
        );
        assert_eq!(
            Domain::new(Point::zeros(0), Point::zeros(0)),
            Err(SpaceError::ZeroDimensions)
        );
    }

    #[test]
    fn new_rejects_overflowing_size() {
        let lo = Point::diagonal(4, i32::MIN);
        let hi = Point::diagonal(4, i32::MAX);
        assert!(matches!(
            Domain::new(lo, hi),
            Err(SpaceError::DomainTooLarge { .. })
        ));
    }

    #[test]
    fn from_shape_starts_at_origin() {
        let dom = Domain::from_shape(&[3, 4, 5]).unwrap();
        assert_eq!(dom.lower_bound(), &Point::zeros(3));
        assert_eq!(dom.upper_bound(), &Point::from([2, 3, 4]));
        assert!(Domain::from_shape(&[3, 0]).is_err());
    }

    #[test]
    fn contains_respects_bounds() {
        let dom = d([0, 0], [4, 4]);
        assert!(dom.contains(&Point::from([0, 4])));
        assert!(!dom.contains(&Point::from([5, 0])));
        assert!(!dom.contains(&Point::from([-1, 0])));
        assert!(!dom.contains(&Point::from([1])));
        assert!(!Domain::empty(2).contains(&Point::from([0, 0])));
    }

    #[test]
    fn empty_domain_iterates_nothing() {
        let empty = Domain::empty(3);
        assert!(empty.is_empty());
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.iter().count(), 0);
        assert!(empty.is_subset_of(&d([0, 0], [0, 0])));
    }

    #[test]
    fn iteration_is_axis_zero_fastest() {
        let pts: Vec<Point> = d([0, 0], [1, 1]).iter().collect();
        assert_eq!(
            pts,
            vec![
                Point::from([0, 0]),
                Point::from([1, 0]),
                Point::from([0, 1]),
                Point::from([1, 1]),
            ]
        );
    }

    #[test]
    fn grow_and_intersect() {
        let full = d([0, 0], [10, 10]);
        let bbox = d([1, 5], [2, 9]);
        let grown = bbox.grow(&Point::from([2, 2]));
        assert_eq!(grown, d([-1, 3], [4, 11]));
        assert_eq!(grown.intersect(&full), d([0, 3], [4, 10]));
        assert!(d([0, 0], [1, 1]).intersect(&d([3, 3], [4, 4])).is_empty());
        assert!(Domain::empty(2).grow(&Point::diagonal(2, 3)).is_empty());
        assert!(bbox.grow(&Point::diagonal(2, -1)).is_empty());
    }

    #[test]
    fn subset() {
        let full = d([0, 0], [10, 10]);
        assert!(d([2, 2], [3, 3]).is_subset_of(&full));
        assert!(!d([2, 2], [11, 3]).is_subset_of(&full));
    }

    #[test]
    fn display() {
        assert_eq!(d([0, 1], [2, 3]).to_string(), "[(0, 1), (2, 3)]");
        assert_eq!(Domain::empty(2).to_string(), "[empty 2D]");
    }
}
