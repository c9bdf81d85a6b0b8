//! Cursors over a sub-domain of a larger storage domain.
//!
//! A view iterates its own domain `V`, which sits inside the storage domain
//! `F`. Consecutive points of `V` are not consecutive in `F`'s linear
//! order: when axis `i` wraps from `V`'s upper to its lower bound, the
//! storage index has to skip the `F[i] - V[i]` points of that axis that
//! lie outside the view, scaled by the stride of axis `i` in `F`.
//!
//! ```text
//! F: 6 x 4, V: columns 1..=3, rows 1..=2
//!
//!   . . . . . .      stepping from (3, 1) to (1, 2):
//!   . a b c . .      storage index += 1 + (6 - 3) * 1
//!   . d e f . .
//!   . . . . . .
//! ```

use std::cmp::Ordering;
use std::iter::FusedIterator;

use phasemux_core::Point;
use phasemux_space::{ColMajor, Domain, Extent, Linearizer};
use smallvec::SmallVec;

type Lin = Linearizer<ColMajor>;

/// Precomputed relation between a view domain and its storage domain.
#[derive(Clone, Debug)]
pub struct ViewGeometry {
    view: Domain,
    full_lower: Point,
    full_extent: Extent,
    /// `jumps[i]`: extra storage-index step when axis `i` carries.
    jumps: SmallVec<[usize; 4]>,
}

impl ViewGeometry {
    /// Geometry of `view` inside `full`. `view` must be a subset of `full`.
    pub fn new(view: Domain, full: &Domain) -> Self {
        debug_assert!(view.is_subset_of(full), "{view} not inside {full}");
        let ndim = full.ndim();
        let mut jumps = SmallVec::with_capacity(ndim);
        let mut stride = 1usize;
        for axis in 0..ndim {
            let f = full.extent()[axis];
            let v = view.extent()[axis];
            jumps.push((f - v.min(f)) * stride);
            stride *= f;
        }
        Self {
            view,
            full_lower: full.lower_bound().clone(),
            full_extent: full.extent().clone(),
            jumps,
        }
    }

    /// The view domain.
    pub fn view(&self) -> &Domain {
        &self.view
    }

    /// Cursor at the first point of the view.
    pub fn begin(&self) -> ViewCursor<'_> {
        self.cursor_at(0)
    }

    /// Cursor one past the last point of the view.
    pub fn end(&self) -> ViewCursor<'_> {
        self.cursor_at(self.view.size())
    }

    /// Cursor at view position `pos` (`0..=size`).
    pub fn cursor_at(&self, pos: usize) -> ViewCursor<'_> {
        let size = self.view.size();
        debug_assert!(pos <= size);
        if self.view.is_empty() {
            return ViewCursor {
                geometry: self,
                point: self.view.lower_bound().clone(),
                full_index: 0,
                pos: 0,
            };
        }
        if pos == size {
            let mut end = self.cursor_at(size - 1);
            end.increment();
            return end;
        }
        let point = Lin::point(pos, self.view.lower_bound(), self.view.extent());
        let full_index = Lin::index(&point, &self.full_lower, &self.full_extent);
        ViewCursor {
            geometry: self,
            point,
            full_index,
            pos,
        }
    }

    /// Iterator over `(point, storage index)` of every view point.
    pub fn positions(&self) -> ViewPositions<'_> {
        ViewPositions {
            front: self.begin(),
            back: self.end(),
            remaining: self.view.size(),
        }
    }
}

/// Position in a view: the current point and its storage linear index.
///
/// Two cursors are equal when their storage indices are equal. The cursor
/// one past the end lies just beyond the view's upper bound on the last
/// axis (saturating at `i32::MAX`); it must not be dereferenced.
#[derive(Clone, Debug)]
pub struct ViewCursor<'g> {
    geometry: &'g ViewGeometry,
    point: Point,
    full_index: usize,
    pos: usize,
}

impl<'g> ViewCursor<'g> {
    /// Current point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Linear index of the current point in the storage domain.
    pub fn full_index(&self) -> usize {
        self.full_index
    }

    /// Position within the view, `0..=size`.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Step to the next point of the view.
    pub fn increment(&mut self) {
        let geometry = self.geometry;
        let view = &geometry.view;
        debug_assert!(self.pos < view.size(), "increment past end");
        let (lower, upper) = (view.lower_bound(), view.upper_bound());
        let last = self.point.ndim() - 1;
        self.pos += 1;
        self.full_index += 1;
        for axis in 0..last {
            if self.point[axis] < upper[axis] {
                self.point[axis] += 1;
                return;
            }
            self.point[axis] = lower[axis];
            self.full_index += geometry.jumps[axis];
        }
        // Only the step onto the end cursor can leave the i32 range.
        self.point[last] = self.point[last].saturating_add(1);
    }

    /// Step to the previous point of the view.
    pub fn decrement(&mut self) {
        let geometry = self.geometry;
        let view = &geometry.view;
        debug_assert!(self.pos > 0, "decrement before begin");
        if self.pos == view.size() {
            *self = geometry.cursor_at(self.pos - 1);
            return;
        }
        let (lower, upper) = (view.lower_bound(), view.upper_bound());
        let last = self.point.ndim() - 1;
        self.pos -= 1;
        self.full_index -= 1;
        for axis in 0..last {
            if self.point[axis] > lower[axis] {
                self.point[axis] -= 1;
                return;
            }
            self.point[axis] = upper[axis];
            self.full_index -= geometry.jumps[axis];
        }
        self.point[last] -= 1;
    }

    /// Move `n` view positions forward (negative: backward).
    pub fn advance(&mut self, n: isize) {
        let pos = self.pos as isize + n;
        debug_assert!(
            pos >= 0 && pos as usize <= self.geometry.view.size(),
            "advance out of view"
        );
        let geometry = self.geometry;
        *self = geometry.cursor_at(pos as usize);
    }

    /// Number of view positions from `self` to `other`.
    pub fn distance(&self, other: &ViewCursor<'_>) -> isize {
        other.pos as isize - self.pos as isize
    }
}

impl PartialEq for ViewCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.full_index == other.full_index
    }
}

impl Eq for ViewCursor<'_> {}

impl PartialOrd for ViewCursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ViewCursor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full_index.cmp(&other.full_index)
    }
}

/// Iterator over `(point, storage index)` of a view, in canonical order.
#[derive(Clone, Debug)]
pub struct ViewPositions<'g> {
    front: ViewCursor<'g>,
    back: ViewCursor<'g>,
    remaining: usize,
}

impl Iterator for ViewPositions<'_> {
    type Item = (Point, usize);

    fn next(&mut self) -> Option<(Point, usize)> {
        if self.remaining == 0 {
            return None;
        }
        let item = (self.front.point.clone(), self.front.full_index);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front.increment();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for ViewPositions<'_> {
    fn next_back(&mut self) -> Option<(Point, usize)> {
        if self.remaining == 0 {
            return None;
        }
        self.back.decrement();
        self.remaining -= 1;
        Some((self.back.point.clone(), self.back.full_index))
    }
}

impl ExactSizeIterator for ViewPositions<'_> {}

impl FusedIterator for ViewPositions<'_> {}
