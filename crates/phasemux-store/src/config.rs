//! Store construction parameters.

use std::mem::size_of;

use phasemux_core::Scalar;
use phasemux_space::Domain;

use crate::error::ConfigError;
use crate::row::SparseRow;

/// Shape of a [`MultiFieldStore`](crate::MultiFieldStore): the domain it
/// lives on and the number of fields multiplexed over it.
///
/// Validated once at construction; a store never changes shape afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Domain of the image. Every label shares it.
    pub domain: Domain,
    /// Number of labels `L`. Valid labels are `0..L`.
    pub label_count: usize,
}

impl StoreConfig {
    /// Create a config for `label_count` fields over `domain`.
    pub fn new(domain: Domain, label_count: usize) -> Self {
        Self {
            domain,
            label_count,
        }
    }

    /// Check the config against a row representation.
    ///
    /// Rejects zero labels, label counts above `R::MAX_LABELS`, empty
    /// domains, and shapes whose row or tracker storage would not fit in a
    /// single allocation (`isize::MAX` bytes).
    pub fn validate<V: Scalar, R: SparseRow<V>>(&self) -> Result<(), ConfigError> {
        if self.label_count == 0 {
            return Err(ConfigError::NoLabels);
        }
        if self.label_count > R::MAX_LABELS {
            return Err(ConfigError::LabelCapacity {
                requested: self.label_count,
                capacity: R::MAX_LABELS,
            });
        }
        if self.domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        let rows = allocation(self.domain.size(), size_of::<R>());
        let counters = self
            .domain
            .extent()
            .iter()
            .sum::<usize>()
            .checked_mul(self.label_count)
            .and_then(|n| allocation(n, size_of::<usize>()));
        if rows.is_none() || counters.is_none() {
            return Err(ConfigError::StorageOverflow {
                points: self.domain.size(),
                labels: self.label_count,
            });
        }
        Ok(())
    }
}

/// Bytes taken by `count` elements of `elem` bytes, if one allocation can hold them.
fn allocation(count: usize, elem: usize) -> Option<usize> {
    count
        .checked_mul(elem)
        .filter(|&bytes| bytes <= isize::MAX as usize)
}
