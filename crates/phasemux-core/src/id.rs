//! Strongly-typed field label.

use std::fmt;

/// Identifies one logical field multiplexed over the grid.
///
/// A store created for `L` fields accepts labels `Label(0)..Label(L-1)`.
/// `Label(n)` is also the index of the field's bounding-box tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Label(pub u32);

impl Label {
    /// The label as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Label {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
