//! Error types for domain construction and linearization.

use phasemux_core::Point;
use std::fmt;

/// Errors arising from domain construction or checked point/index lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to build a domain with zero dimensions.
    ZeroDimensions,
    /// Lower and upper bounds (or a point and a domain) disagree on dimensionality.
    DimensionMismatch {
        /// Dimensionality that was expected.
        expected: usize,
        /// Dimensionality that was supplied.
        got: usize,
    },
    /// `lower > upper` on some axis.
    InvertedBounds {
        /// The offending axis.
        axis: usize,
        /// Lower bound on that axis.
        lower: i32,
        /// Upper bound on that axis.
        upper: i32,
    },
    /// The number of points does not fit in `usize`.
    DomainTooLarge {
        /// Axis at which the running product overflowed.
        axis: usize,
    },
    /// A point lies outside the domain.
    PointOutOfBounds {
        /// The offending point.
        point: Point,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A flat index is not below the domain size.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of points in the domain.
        size: usize,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimensions => write!(f, "domain must have at least one dimension"),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "expected {expected}D coordinates, got {got}D")
            }
            Self::InvertedBounds { axis, lower, upper } => {
                write!(f, "axis {axis}: lower bound {lower} > upper bound {upper}")
            }
            Self::DomainTooLarge { axis } => {
                write!(f, "domain point count overflows usize at axis {axis}")
            }
            Self::PointOutOfBounds { point, bounds } => {
                write!(f, "point {point} out of bounds: {bounds}")
            }
            Self::IndexOutOfBounds { index, size } => {
                write!(f, "index {index} out of bounds for domain of size {size}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
