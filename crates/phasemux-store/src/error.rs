//! Store-specific error types.

use std::error::Error;
use std::fmt;

use phasemux_core::{Label, Point};
use phasemux_space::{Domain, SpaceError};

/// Errors detected while validating a [`StoreConfig`](crate::StoreConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A store must multiplex at least one field.
    NoLabels,
    /// The chosen row representation cannot address that many labels.
    LabelCapacity {
        /// Number of labels requested.
        requested: usize,
        /// Maximum supported by the row representation.
        capacity: usize,
    },
    /// Row or tracker storage would not fit in one allocation.
    StorageOverflow {
        /// Number of points in the domain.
        points: usize,
        /// Number of labels requested.
        labels: usize,
    },
    /// The domain contains no point.
    EmptyDomain,
    /// The domain itself is malformed.
    Space(SpaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLabels => write!(f, "label count must be at least 1"),
            Self::LabelCapacity {
                requested,
                capacity,
            } => write!(
                f,
                "row representation supports at most {capacity} labels, {requested} requested"
            ),
            Self::StorageOverflow { points, labels } => write!(
                f,
                "storage for {points} points and {labels} labels exceeds one allocation"
            ),
            Self::EmptyDomain => write!(f, "domain contains no point"),
            Self::Space(e) => write!(f, "invalid domain: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

/// Errors returned by the checked accessors (`try_*`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// The label is not below the store's label count.
    LabelOutOfRange {
        /// The rejected label.
        label: Label,
        /// Number of labels of the store.
        label_count: usize,
    },
    /// The point lies outside the store's domain.
    PointOutOfDomain {
        /// The rejected point.
        point: Point,
        /// The store's domain.
        domain: Domain,
    },
    /// The linear index is not below the store's size.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of points of the store.
        size: usize,
    },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelOutOfRange { label, label_count } => {
                write!(f, "label {label} out of range (label count {label_count})")
            }
            Self::PointOutOfDomain { point, domain } => {
                write!(f, "point {point} outside domain {domain}")
            }
            Self::IndexOutOfRange { index, size } => {
                write!(f, "linear index {index} out of range (size {size})")
            }
        }
    }
}

impl Error for RangeError {}

/// A broken internal invariant found by
/// [`check_consistency`](crate::MultiFieldStore::check_consistency).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A tracker's box differs from the box of the stored points.
    BoundingBoxMismatch {
        /// Label whose tracker disagrees.
        label: Label,
        /// Box reported by the tracker.
        tracked: Domain,
        /// Box recomputed from storage.
        actual: Domain,
    },
    /// A stored value satisfies the approximation predicate.
    ElidableValueStored {
        /// Linear index of the offending row.
        index: usize,
        /// Label of the offending entry.
        label: Label,
    },
    /// A row holds a label not below the label count.
    LabelOutOfRange {
        /// Linear index of the offending row.
        index: usize,
        /// The offending label.
        label: Label,
    },
    /// The cached stored-entry count differs from a recount.
    StoredSizeMismatch {
        /// Entries found in the rows.
        counted: usize,
        /// Entries recorded by the store.
        tracked: usize,
    },
    /// A tracker's present-point count differs from a recount.
    PresentCountMismatch {
        /// Label whose tracker disagrees.
        label: Label,
        /// Entries of that label found in the rows.
        counted: usize,
        /// Count reported by the tracker.
        tracked: usize,
    },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundingBoxMismatch {
                label,
                tracked,
                actual,
            } => write!(
                f,
                "label {label}: tracked box {tracked} differs from stored box {actual}"
            ),
            Self::ElidableValueStored { index, label } => write!(
                f,
                "row {index} stores an approximable value for label {label}"
            ),
            Self::LabelOutOfRange { index, label } => {
                write!(f, "row {index} stores out-of-range label {label}")
            }
            Self::StoredSizeMismatch { counted, tracked } => write!(
                f,
                "stored size mismatch: counted {counted}, tracked {tracked}"
            ),
            Self::PresentCountMismatch {
                label,
                counted,
                tracked,
            } => write!(
                f,
                "label {label}: counted {counted} stored points, tracker reports {tracked}"
            ),
        }
    }
}

impl Error for ConsistencyError {}
