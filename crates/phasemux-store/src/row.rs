//! Sparse per-point rows of `(label, value)` entries.
//!
//! A row holds the stored values of every label at one point. Absent
//! labels are approximated; the row does not know which policy is in use.

use std::fmt;

use phasemux_core::{Label, Scalar};
use smallvec::SmallVec;

/// A small sparse map from labels to values.
pub trait SparseRow<V: Scalar>: Clone + Default + fmt::Debug + Send + Sync {
    /// Largest label count this representation can address.
    const MAX_LABELS: usize;

    /// Short representation name, used in log events.
    const NAME: &'static str;

    /// Value stored for `label`, if any.
    fn get(&self, label: Label) -> Option<V>;

    /// Mutable access to the value stored for `label`, if any.
    fn get_mut(&mut self, label: Label) -> Option<&mut V>;

    /// Store `value` for `label`, returning the previous value.
    fn set(&mut self, label: Label, value: V) -> Option<V>;

    /// Remove the entry for `label`, returning its value.
    fn erase(&mut self, label: Label) -> Option<V>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// `true` if no entry is stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if `label` has a stored entry.
    #[inline]
    fn contains(&self, label: Label) -> bool {
        self.get(label).is_some()
    }

    /// Stored entries. Order is representation-specific.
    fn iter(&self) -> impl Iterator<Item = (Label, V)> + '_;

    /// Remove every entry.
    fn clear(&mut self);
}

// ── SmallRow ────────────────────────────────────────────────────

/// Unordered `(label, value)` pairs with two entries inline.
///
/// Lookups scan linearly. Erasing swaps the last entry into the hole, so
/// iteration order is unspecified.
#[derive(Clone, Debug, PartialEq)]
pub struct SmallRow<V> {
    entries: SmallVec<[(Label, V); 2]>,
}

impl<V> Default for SmallRow<V> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<V: Scalar> SmallRow<V> {
    fn position(&self, label: Label) -> Option<usize> {
        self.entries.iter().position(|(l, _)| *l == label)
    }
}

impl<V: Scalar> SparseRow<V> for SmallRow<V> {
    const MAX_LABELS: usize = u32::MAX as usize;
    const NAME: &'static str = "small";

    #[inline]
    fn get(&self, label: Label) -> Option<V> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }

    #[inline]
    fn get_mut(&mut self, label: Label) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v)
    }

    fn set(&mut self, label: Label, value: V) -> Option<V> {
        match self.get_mut(label) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((label, value));
                None
            }
        }
    }

    fn erase(&mut self, label: Label) -> Option<V> {
        let pos = self.position(label)?;
        Some(self.entries.swap_remove(pos).1)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> impl Iterator<Item = (Label, V)> + '_ {
        self.entries.iter().copied()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

// ── MaskedRow ───────────────────────────────────────────────────

/// Presence bitmask plus values packed in ascending label order.
///
/// The value of label `l` sits at the number of set bits below bit `l`.
/// Supports at most 64 labels; iteration is ascending by label.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedRow<V> {
    mask: u64,
    values: SmallVec<[V; 2]>,
}

impl<V> Default for MaskedRow<V> {
    fn default() -> Self {
        Self {
            mask: 0,
            values: SmallVec::new(),
        }
    }
}

impl<V> MaskedRow<V> {
    /// Presence bitmask: bit `l` is set iff label `l` is stored.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    #[inline]
    fn bit(label: Label) -> Option<u64> {
        1u64.checked_shl(label.0)
    }

    #[inline]
    fn rank(&self, bit: u64) -> usize {
        (self.mask & (bit - 1)).count_ones() as usize
    }
}

impl<V: Scalar> SparseRow<V> for MaskedRow<V> {
    const MAX_LABELS: usize = 64;
    const NAME: &'static str = "masked";

    #[inline]
    fn get(&self, label: Label) -> Option<V> {
        let bit = Self::bit(label)?;
        (self.mask & bit != 0).then(|| self.values[self.rank(bit)])
    }

    #[inline]
    fn get_mut(&mut self, label: Label) -> Option<&mut V> {
        let bit = Self::bit(label)?;
        if self.mask & bit == 0 {
            return None;
        }
        let rank = self.rank(bit);
        Some(&mut self.values[rank])
    }

    fn set(&mut self, label: Label, value: V) -> Option<V> {
        let bit = match Self::bit(label) {
            Some(bit) => bit,
            None => panic!("label {label} exceeds masked row capacity of 64"),
        };
        let rank = self.rank(bit);
        if self.mask & bit != 0 {
            return Some(std::mem::replace(&mut self.values[rank], value));
        }
        self.mask |= bit;
        self.values.insert(rank, value);
        None
    }

    fn erase(&mut self, label: Label) -> Option<V> {
        let bit = Self::bit(label)?;
        if self.mask & bit == 0 {
            return None;
        }
        let rank = self.rank(bit);
        self.mask &= !bit;
        Some(self.values.remove(rank))
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> impl Iterator<Item = (Label, V)> + '_ {
        let mut bits = self.mask;
        self.values.iter().map(move |&v| {
            let label = Label(bits.trailing_zeros());
            bits &= bits - 1;
            (label, v)
        })
    }

    fn clear(&mut self) {
        self.mask = 0;
        self.values.clear();
    }
}
