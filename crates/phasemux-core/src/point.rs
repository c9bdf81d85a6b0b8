//! N-dimensional integer points.

use smallvec::SmallVec;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

/// Raw coordinate storage: inline for up to four dimensions.
pub type Coord = SmallVec<[i32; 4]>;

/// A point on an N-dimensional integer grid.
///
/// Supports per-axis indexing and component-wise vector arithmetic.
/// Arithmetic between points of different dimensionality is a logic
/// error (checked with `debug_assert!`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point(Coord);

impl Point {
    /// Build a point from raw coordinates.
    pub fn new(coords: Coord) -> Self {
        Self(coords)
    }

    /// The origin in `ndim` dimensions.
    pub fn zeros(ndim: usize) -> Self {
        Self::diagonal(ndim, 0)
    }

    /// A point with every coordinate equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use phasemux_core::Point;
    ///
    /// let p = Point::diagonal(3, 2);
    /// assert_eq!(p, Point::from([2, 2, 2]));
    /// ```
    pub fn diagonal(ndim: usize, value: i32) -> Self {
        Self(smallvec::smallvec![value; ndim])
    }

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Coordinates as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Iterate over the coordinates.
    pub fn iter(&self) -> std::slice::Iter<'_, i32> {
        self.0.iter()
    }

    /// Component-wise minimum.
    pub fn componentwise_min(&self, other: &Point) -> Point {
        debug_assert_eq!(self.ndim(), other.ndim());
        self.iter().zip(other.iter()).map(|(a, b)| *a.min(b)).collect()
    }

    /// Component-wise maximum.
    pub fn componentwise_max(&self, other: &Point) -> Point {
        debug_assert_eq!(self.ndim(), other.ndim());
        self.iter().zip(other.iter()).map(|(a, b)| *a.max(b)).collect()
    }

    /// `true` if every coordinate is `<=` the matching coordinate of `other`.
    pub fn all_le(&self, other: &Point) -> bool {
        self.ndim() == other.ndim() && self.iter().zip(other.iter()).all(|(a, b)| a <= b)
    }

    /// Consume the point and return its raw coordinates.
    pub fn into_inner(self) -> Coord {
        self.0
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

impl Index<usize> for Point {
    type Output = i32;

    #[inline]
    fn index(&self, axis: usize) -> &i32 {
        &self.0[axis]
    }
}

impl IndexMut<usize> for Point {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut i32 {
        &mut self.0[axis]
    }
}

impl AddAssign<&Point> for Point {
    fn add_assign(&mut self, rhs: &Point) {
        debug_assert_eq!(self.ndim(), rhs.ndim());
        for (a, b) in self.0.iter_mut().zip(rhs.iter()) {
            *a += b;
        }
    }
}

impl SubAssign<&Point> for Point {
    fn sub_assign(&mut self, rhs: &Point) {
        debug_assert_eq!(self.ndim(), rhs.ndim());
        for (a, b) in self.0.iter_mut().zip(rhs.iter()) {
            *a -= b;
        }
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Point {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Point {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl Add for Point {
    type Output = Point;

    fn add(mut self, rhs: Point) -> Point {
        self += &rhs;
        self
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(mut self, rhs: Point) -> Point {
        self -= &rhs;
        self
    }
}

impl<const N: usize> From<[i32; N]> for Point {
    fn from(coords: [i32; N]) -> Self {
        Self(SmallVec::from_slice(&coords))
    }
}

impl From<&[i32]> for Point {
    fn from(coords: &[i32]) -> Self {
        Self(SmallVec::from_slice(coords))
    }
}

impl From<Vec<i32>> for Point {
    fn from(coords: Vec<i32>) -> Self {
        Self(SmallVec::from_vec(coords))
    }
}

impl From<Coord> for Point {
    fn from(coords: Coord) -> Self {
        Self(coords)
    }
}

impl FromIterator<i32> for Point {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
