//! Full recount of a store's cached state.

use phasemux_core::{Label, Point};
use phasemux_space::Domain;
use tracing::warn;

use crate::approx::Approximation;
use crate::bbox::BoundsTracker;
use crate::error::ConsistencyError;
use crate::row::SparseRow;
use crate::store::MultiFieldStore;

impl<A, R, B> MultiFieldStore<A, R, B>
where
    A: Approximation,
    R: SparseRow<A::Value>,
    B: BoundsTracker,
{
    /// Recompute every cached quantity from the rows and compare.
    ///
    /// Checks that no row stores an approximable value or an out-of-range
    /// label, that `stored_size` equals the number of stored entries, and
    /// that each tracker's box equals the box of the label's stored points.
    /// A tracker that does not count points only has to contain that box.
    ///
    /// O(size + stored_size). Intended for tests and debugging.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let result = self.recount();
        if let Err(e) = &result {
            warn!(error = %e, "multi-field store consistency check failed");
        }
        result
    }

    fn recount(&self) -> Result<(), ConsistencyError> {
        let labels = self.label_count();
        let ndim = self.domain().ndim();
        let mut counts = vec![0usize; labels];
        let mut boxes: Vec<Option<(Point, Point)>> = vec![None; labels];
        let mut stored = 0usize;

        for (index, (point, row)) in self.domain().iter().zip(self.rows()).enumerate() {
            for (label, value) in row.iter() {
                let l = label.index();
                if l >= labels {
                    return Err(ConsistencyError::LabelOutOfRange { index, label });
                }
                if self.approximation().eval(value) {
                    return Err(ConsistencyError::ElidableValueStored { index, label });
                }
                counts[l] += 1;
                stored += 1;
                boxes[l] = Some(match boxes[l].take() {
                    None => (point.clone(), point.clone()),
                    Some((lo, hi)) => (lo.componentwise_min(&point), hi.componentwise_max(&point)),
                });
            }
        }

        if stored != self.stored_size() {
            return Err(ConsistencyError::StoredSizeMismatch {
                counted: stored,
                tracked: self.stored_size(),
            });
        }

        for (l, (counted, bounds)) in counts.into_iter().zip(boxes).enumerate() {
            let label = Label(l as u32);
            let actual = match bounds {
                Some((lo, hi)) => Domain::new(lo, hi).unwrap_or_else(|_| Domain::empty(ndim)),
                None => Domain::empty(ndim),
            };
            let tracked = self.tight_bounding_box(label);
            match self.present_count(label) {
                Some(present) => {
                    if present != counted {
                        return Err(ConsistencyError::PresentCountMismatch {
                            label,
                            counted,
                            tracked: present,
                        });
                    }
                    if tracked != actual {
                        return Err(ConsistencyError::BoundingBoxMismatch {
                            label,
                            tracked,
                            actual,
                        });
                    }
                }
                None => {
                    if !actual.is_subset_of(&tracked) {
                        return Err(ConsistencyError::BoundingBoxMismatch {
                            label,
                            tracked,
                            actual,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
