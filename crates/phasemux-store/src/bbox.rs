//! Per-label bounding-box trackers.
//!
//! A tracker is told about every point that starts or stops storing a
//! value for its label, and reports the smallest box containing all such
//! points. [`AxisAlignedBoundingBox`] keeps that box exact after every
//! call. [`NoBoundingBox`] does no work and always reports the full domain.

use std::fmt;

use phasemux_core::Point;
use phasemux_space::Domain;
use smallvec::SmallVec;
use tracing::trace;

/// Tracks the region occupied by one label's stored points.
pub trait BoundsTracker: Clone + fmt::Debug + Send + Sync {
    /// Short tracker name, used in log events.
    const KIND: &'static str;

    /// `false` if [`add_point`](Self::add_point) and
    /// [`remove_point`](Self::remove_point) ignore their point. A store
    /// writing by linear index then skips recovering the point and the call.
    const NEEDS_POINTS: bool = true;

    /// A tracker with no present point over `domain`.
    fn new(domain: &Domain) -> Self;

    /// Record that `point` now stores a value.
    fn add_point(&mut self, point: &Point);

    /// Record that `point` no longer stores a value.
    fn remove_point(&mut self, point: &Point);

    /// Tracked box grown by `buffer` on each side of each axis, clipped to
    /// the full domain.
    fn bounding_box(&self, buffer: &Point) -> Domain;

    /// `true` if no point is present.
    fn is_empty(&self) -> bool;

    /// Number of present points, if the tracker counts them.
    fn present_count(&self) -> Option<usize>;

    /// Forget every present point.
    fn reset(&mut self);
}

// ── AxisAlignedBoundingBox ──────────────────────────────────────

/// Exact axis-aligned bounding box maintained by per-axis occupancy counts.
///
/// For each axis `d` and each offset `k` along it, `counts[d][k]` is the
/// number of present points whose coordinate on `d` is `lower[d] + k`. The
/// box on axis `d` is the first and last non-zero counter. Adding a point
/// is O(ndim). Removing a point that held a boundary scans inward to the
/// next non-zero counter.
#[derive(Clone)]
pub struct AxisAlignedBoundingBox {
    full: Domain,
    counts: SmallVec<[Vec<usize>; 4]>,
    lo: SmallVec<[usize; 4]>,
    hi: SmallVec<[usize; 4]>,
    present: usize,
}

impl AxisAlignedBoundingBox {
    #[inline]
    fn offset(&self, point: &Point, axis: usize) -> usize {
        (i64::from(point[axis]) - i64::from(self.full.lower_bound()[axis])) as usize
    }
}

impl BoundsTracker for AxisAlignedBoundingBox {
    const KIND: &'static str = "axis-aligned";

    fn new(domain: &Domain) -> Self {
        let ndim = domain.ndim();
        Self {
            full: domain.clone(),
            counts: domain.extent().iter().map(|&n| vec![0; n]).collect(),
            lo: smallvec::smallvec![0; ndim],
            hi: smallvec::smallvec![0; ndim],
            present: 0,
        }
    }

    fn add_point(&mut self, point: &Point) {
        debug_assert!(self.full.contains(point), "{point} outside {}", self.full);
        let first = self.present == 0;
        for axis in 0..self.counts.len() {
            let k = self.offset(point, axis);
            self.counts[axis][k] += 1;
            if first {
                self.lo[axis] = k;
                self.hi[axis] = k;
            } else {
                self.lo[axis] = self.lo[axis].min(k);
                self.hi[axis] = self.hi[axis].max(k);
            }
        }
        self.present += 1;
    }

    fn remove_point(&mut self, point: &Point) {
        debug_assert!(self.present > 0, "remove_point on empty tracker");
        debug_assert!(self.full.contains(point), "{point} outside {}", self.full);
        self.present -= 1;
        for axis in 0..self.counts.len() {
            let k = self.offset(point, axis);
            let counts = &mut self.counts[axis];
            debug_assert!(counts[k] > 0, "axis {axis} offset {k} not occupied");
            counts[k] -= 1;
            if self.present == 0 || counts[k] > 0 {
                continue;
            }
            // Some point is still present, so a non-zero counter exists in [lo, hi].
            if k == self.lo[axis] {
                let from = k;
                while counts[self.lo[axis]] == 0 {
                    self.lo[axis] += 1;
                }
                trace!(axis, from, to = self.lo[axis], "bounding box lower face moved");
            } else if k == self.hi[axis] {
                let from = k;
                while counts[self.hi[axis]] == 0 {
                    self.hi[axis] -= 1;
                }
                trace!(axis, from, to = self.hi[axis], "bounding box upper face moved");
            }
        }
    }

    fn bounding_box(&self, buffer: &Point) -> Domain {
        let ndim = self.full.ndim();
        if self.present == 0 {
            return Domain::empty(ndim);
        }
        debug_assert_eq!(buffer.ndim(), ndim);
        let full_lo = self.full.lower_bound();
        let full_hi = self.full.upper_bound();
        let mut lower = Point::zeros(ndim);
        let mut upper = Point::zeros(ndim);
        for axis in 0..ndim {
            let base = i64::from(full_lo[axis]);
            let b = i64::from(buffer[axis]);
            let l = (base + self.lo[axis] as i64 - b).max(base);
            let u = (base + self.hi[axis] as i64 + b).min(i64::from(full_hi[axis]));
            if l > u {
                return Domain::empty(ndim);
            }
            // Both lie within the full domain's i32 bounds.
            lower[axis] = l as i32;
            upper[axis] = u as i32;
        }
        Domain::new(lower, upper).unwrap_or_else(|_| Domain::empty(ndim))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.present == 0
    }

    #[inline]
    fn present_count(&self) -> Option<usize> {
        Some(self.present)
    }

    fn reset(&mut self) {
        for counts in &mut self.counts {
            counts.fill(0);
        }
        self.lo.fill(0);
        self.hi.fill(0);
        self.present = 0;
    }
}

impl fmt::Debug for AxisAlignedBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisAlignedBoundingBox")
            .field("present", &self.present)
            .field("box", &self.bounding_box(&Point::zeros(self.full.ndim())))
            .finish()
    }
}

// ── NoBoundingBox ───────────────────────────────────────────────

/// Tracker that keeps no state and always reports the full domain.
#[derive(Clone, Debug)]
pub struct NoBoundingBox {
    full: Domain,
}

impl BoundsTracker for NoBoundingBox {
    const KIND: &'static str = "none";
    const NEEDS_POINTS: bool = false;

    fn new(domain: &Domain) -> Self {
        Self {
            full: domain.clone(),
        }
    }

    #[inline]
    fn add_point(&mut self, _point: &Point) {}

    #[inline]
    fn remove_point(&mut self, _point: &Point) {}

    fn bounding_box(&self, _buffer: &Point) -> Domain {
        self.full.clone()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    fn present_count(&self) -> Option<usize> {
        None
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom(lo: &[i32], hi: &[i32]) -> Domain {
        Domain::new(Point::from(lo), Point::from(hi)).unwrap()
    }

    fn tight(b: &AxisAlignedBoundingBox) -> Domain {
        b.bounding_box(&Point::zeros(2))
    }

    #[test]
    fn new_tracker_is_empty() {
        let b = AxisAlignedBoundingBox::new(&dom(&[0, 0], &[10, 10]));
        assert!(b.is_empty());
        assert_eq!(b.present_count(), Some(0));
        assert!(b.bounding_box(&Point::from([5, 5])).is_empty());
    }

    #[test]
    fn add_extends_and_remove_shrinks() {
        let mut b = AxisAlignedBoundingBox::new(&dom(&[0, 0], &[10, 10]));
        b.add_point(&Point::from([3, 4]));
        assert_eq!(tight(&b), dom(&[3, 4], &[3, 4]));
        b.add_point(&Point::from([7, 1]));
        assert_eq!(tight(&b), dom(&[3, 1], &[7, 4]));
        b.add_point(&Point::from([5, 9]));
        assert_eq!(tight(&b), dom(&[3, 1], &[7, 9]));

        b.remove_point(&Point::from([5, 9]));
        assert_eq!(tight(&b), dom(&[3, 1], &[7, 4]));
        b.remove_point(&Point::from([3, 4]));
        assert_eq!(tight(&b), dom(&[7, 1], &[7, 1]));
        b.remove_point(&Point::from([7, 1]));
        assert!(b.is_empty());
        assert!(tight(&b).is_empty());
    }

    #[test]
    fn shared_face_survives_partial_removal() {
        let mut b = AxisAlignedBoundingBox::new(&dom(&[0, 0], &[4, 4]));
        b.add_point(&Point::from([0, 1]));
        b.add_point(&Point::from([0, 3]));
        b.add_point(&Point::from([2, 2]));
        b.remove_point(&Point::from([0, 1]));
        assert_eq!(tight(&b), dom(&[0, 2], &[2, 3]));
    }

    #[test]
    fn buffer_grows_and_clips() {
        let mut b = AxisAlignedBoundingBox::new(&dom(&[-5, -5], &[5, 5]));
        b.add_point(&Point::from([-4, 0]));
        assert_eq!(b.bounding_box(&Point::from([2, 1])), dom(&[-5, -1], &[-2, 1]));
        assert_eq!(b.bounding_box(&Point::from([100, 100])), dom(&[-5, -5], &[5, 5]));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut b = AxisAlignedBoundingBox::new(&dom(&[0, 0], &[3, 3]));
        b.add_point(&Point::from([1, 1]));
        b.add_point(&Point::from([2, 3]));
        b.reset();
        assert!(b.is_empty());
        b.add_point(&Point::from([0, 0]));
        assert_eq!(tight(&b), dom(&[0, 0], &[0, 0]));
    }

    #[test]
    fn no_bounding_box_is_always_full() {
        let full = dom(&[0, 0], &[10, 10]);
        let mut b = NoBoundingBox::new(&full);
        assert_eq!(b.bounding_box(&Point::zeros(2)), full);
        b.add_point(&Point::from([1, 1]));
        b.remove_point(&Point::from([1, 1]));
        assert_eq!(b.bounding_box(&Point::from([3, 3])), full);
        assert!(!b.is_empty());
        assert_eq!(b.present_count(), None);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        fn brute_force(points: &BTreeSet<(i32, i32, i32)>) -> Domain {
            let mut it = points.iter();
            let Some(&(x, y, z)) = it.next() else {
                return Domain::empty(3);
            };
            let (mut lo, mut hi) = ([x, y, z], [x, y, z]);
            for &(x, y, z) in it {
                for (d, c) in [x, y, z].into_iter().enumerate() {
                    lo[d] = lo[d].min(c);
                    hi[d] = hi[d].max(c);
                }
            }
            Domain::new(Point::from(lo), Point::from(hi)).unwrap()
        }

        proptest! {
            #[test]
            fn tracker_matches_brute_force(
                ops in proptest::collection::vec((any::<bool>(), -2i32..3, 0i32..4, 5i32..7), 1..80)
            ) {
                let full = Domain::new(Point::from([-2, 0, 5]), Point::from([2, 3, 6])).unwrap();
                let mut b = AxisAlignedBoundingBox::new(&full);
                let mut present = BTreeSet::new();
                for (insert, x, y, z) in ops {
                    let p = Point::from([x, y, z]);
                    if insert {
                        if present.insert((x, y, z)) {
                            b.add_point(&p);
                        }
                    } else if present.remove(&(x, y, z)) {
                        b.remove_point(&p);
                    }
                    prop_assert_eq!(b.bounding_box(&Point::zeros(3)), brute_force(&present));
                    prop_assert_eq!(b.present_count(), Some(present.len()));
                }
            }
        }
    }
}
