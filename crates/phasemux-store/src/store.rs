//! The approximated multi-field store.

use std::fmt;

use phasemux_core::{Label, Point};
use phasemux_space::{ColMajor, Domain, Linearizer};
use tracing::debug;

use crate::access::LabelRef;
use crate::approx::Approximation;
use crate::bbox::{AxisAlignedBoundingBox, BoundsTracker};
use crate::config::StoreConfig;
use crate::error::{ConfigError, RangeError};
use crate::row::{SmallRow, SparseRow};
use crate::traits::MultiImage;

type Lin = Linearizer<ColMajor>;

/// `L` scalar fields over one domain, storing only non-approximable values.
///
/// Each point of the domain owns one sparse row `R` holding the values of
/// the labels that are present there. Writing an approximable value (as
/// decided by `A`) erases the entry, and reading an absent entry returns
/// `A::default_value()`. One tracker `B` per label follows the region
/// occupied by the label's present points.
///
/// Every mutation goes through [`set_value_at`](Self::set_value_at), so
/// `stored_size`, the rows and the trackers agree after every call.
///
/// # Examples
///
/// ```
/// use phasemux_core::{Label, Point};
/// use phasemux_space::Domain;
/// use phasemux_store::{MultiFieldStore, ZeroTolApproximation};
///
/// let domain = Domain::from_shape(&[11, 11]).unwrap();
/// let mut store: MultiFieldStore<_> =
///     MultiFieldStore::new(domain, 2, ZeroTolApproximation::new(0.1)).unwrap();
///
/// store.set_value(&Point::from([2, 5]), Label(1), 0.5);
/// store.set_value(&Point::from([3, 5]), Label(1), 0.05);
///
/// assert_eq!(store.get_value(&Point::from([2, 5]), Label(1)), 0.5);
/// assert_eq!(store.get_value(&Point::from([3, 5]), Label(1)), 0.0);
/// assert_eq!(store.stored_size(), 1);
/// assert_eq!(
///     store.tight_bounding_box(Label(1)),
///     Domain::new(Point::from([2, 5]), Point::from([2, 5])).unwrap()
/// );
/// ```
pub struct MultiFieldStore<
    A: Approximation,
    R: SparseRow<A::Value> = SmallRow<<A as Approximation>::Value>,
    B: BoundsTracker = AxisAlignedBoundingBox,
> {
    domain: Domain,
    rows: Vec<R>,
    trackers: Vec<B>,
    approximation: A,
    stored: usize,
}

impl<A, R, B> MultiFieldStore<A, R, B>
where
    A: Approximation,
    R: SparseRow<A::Value>,
    B: BoundsTracker,
{
    /// Create a store of `label_count` fields over `domain`, every entry
    /// approximated.
    pub fn new(domain: Domain, label_count: usize, approximation: A) -> Result<Self, ConfigError> {
        Self::from_config(StoreConfig::new(domain, label_count), approximation)
    }

    /// Create a store from a validated [`StoreConfig`].
    pub fn from_config(config: StoreConfig, approximation: A) -> Result<Self, ConfigError> {
        config.validate::<A::Value, R>()?;
        let StoreConfig {
            domain,
            label_count,
        } = config;
        let rows = vec![R::default(); domain.size()];
        let trackers = vec![B::new(&domain); label_count];
        debug!(
            domain = %domain,
            points = domain.size(),
            labels = label_count,
            approximation = approximation.name(),
            row = R::NAME,
            tracker = B::KIND,
            "multi-field store created"
        );
        Ok(Self {
            domain,
            rows,
            trackers,
            approximation,
            stored: 0,
        })
    }

    // ── Shape ───────────────────────────────────────────────────

    /// Domain shared by every label.
    #[inline]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of labels.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.trackers.len()
    }

    /// Number of points of the domain.
    #[inline]
    pub fn size(&self) -> usize {
        self.domain.size()
    }

    /// Number of stored `(point, label)` entries.
    #[inline]
    pub fn stored_size(&self) -> usize {
        self.stored
    }

    /// The approximation policy.
    #[inline]
    pub fn approximation(&self) -> &A {
        &self.approximation
    }

    /// Linear index of `point`.
    #[inline]
    pub fn index_of(&self, point: &Point) -> usize {
        Lin::index_in(point, &self.domain)
    }

    /// Point at linear index `index`.
    #[inline]
    pub fn point_of(&self, index: usize) -> Point {
        Lin::point_in(index, &self.domain)
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Value of `label` at `point`; the default value if not stored.
    #[inline]
    pub fn get_value(&self, point: &Point, label: Label) -> A::Value {
        debug_assert!(self.domain.contains(point), "{point} outside {}", self.domain);
        self.get_value_at(self.index_of(point), label)
    }

    /// Value of `label` at linear index `index`.
    #[inline]
    pub fn get_value_at(&self, index: usize, label: Label) -> A::Value {
        debug_assert!(label.index() < self.label_count());
        self.rows[index]
            .get(label)
            .unwrap_or_else(|| self.approximation.default_value())
    }

    /// Sparse row of `point`.
    #[inline]
    pub fn row(&self, point: &Point) -> &R {
        &self.rows[self.index_of(point)]
    }

    /// Sparse row at linear index `index`.
    #[inline]
    pub fn row_at(&self, index: usize) -> &R {
        &self.rows[index]
    }

    /// All rows in linear index order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Tracker of `label`.
    pub fn tracker(&self, label: Label) -> &B {
        &self.trackers[label.index()]
    }

    /// Number of points where `label` is stored, if the tracker counts them.
    pub fn present_count(&self, label: Label) -> Option<usize> {
        self.trackers[label.index()].present_count()
    }

    /// Smallest box holding every stored point of `label`, grown by
    /// `buffer[i]` on both sides of axis `i` and clipped to the domain.
    ///
    /// Empty when `label` stores nothing, whatever the buffer.
    pub fn bounding_box(&self, label: Label, buffer: &Point) -> Domain {
        self.trackers[label.index()].bounding_box(buffer)
    }

    /// [`bounding_box`](Self::bounding_box) with a zero buffer.
    pub fn tight_bounding_box(&self, label: Label) -> Domain {
        self.bounding_box(label, &Point::zeros(self.domain.ndim()))
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Set the value of `label` at `point`.
    ///
    /// Approximable values erase the entry; others insert or overwrite it.
    #[inline]
    pub fn set_value(&mut self, point: &Point, label: Label, value: A::Value) {
        debug_assert!(self.domain.contains(point), "{point} outside {}", self.domain);
        let index = self.index_of(point);
        self.write(index, Some(point), label, value);
    }

    /// Set the value of `label` at linear index `index`.
    #[inline]
    pub fn set_value_at(&mut self, index: usize, label: Label, value: A::Value) {
        self.write(index, None, label, value);
    }

    fn write(&mut self, index: usize, point: Option<&Point>, label: Label, value: A::Value) {
        debug_assert!(label.index() < self.label_count());
        let row = &mut self.rows[index];
        if self.approximation.eval(value) {
            if row.erase(label).is_some() {
                self.stored -= 1;
                if B::NEEDS_POINTS {
                    let point = point.cloned().unwrap_or_else(|| Lin::point_in(index, &self.domain));
                    self.trackers[label.index()].remove_point(&point);
                }
            }
        } else if let Some(slot) = row.get_mut(label) {
            *slot = value;
        } else {
            row.set(label, value);
            self.stored += 1;
            if B::NEEDS_POINTS {
                let point = point.cloned().unwrap_or_else(|| Lin::point_in(index, &self.domain));
                self.trackers[label.index()].add_point(&point);
            }
        }
    }

    /// Handle to the entry of `label` at `point`.
    pub fn entry(&mut self, point: &Point, label: Label) -> LabelRef<'_, Self> {
        let index = self.index_of(point);
        LabelRef::new(self, index, label)
    }

    /// Handle to the entry of `label` at linear index `index`.
    pub fn entry_at(&mut self, index: usize, label: Label) -> LabelRef<'_, Self> {
        LabelRef::new(self, index, label)
    }

    /// Approximate every entry of every label.
    pub fn clear(&mut self) {
        let dropped = self.stored;
        for row in &mut self.rows {
            row.clear();
        }
        for tracker in &mut self.trackers {
            tracker.reset();
        }
        self.stored = 0;
        debug!(dropped, "multi-field store cleared");
    }

    // ── Checked access ──────────────────────────────────────────

    fn check_label(&self, label: Label) -> Result<(), RangeError> {
        if label.index() < self.label_count() {
            Ok(())
        } else {
            Err(RangeError::LabelOutOfRange {
                label,
                label_count: self.label_count(),
            })
        }
    }

    fn check_point(&self, point: &Point) -> Result<usize, RangeError> {
        if self.domain.contains(point) {
            Ok(self.index_of(point))
        } else {
            Err(RangeError::PointOutOfDomain {
                point: point.clone(),
                domain: self.domain.clone(),
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<(), RangeError> {
        if index < self.size() {
            Ok(())
        } else {
            Err(RangeError::IndexOutOfRange {
                index,
                size: self.size(),
            })
        }
    }

    /// Checked [`get_value`](Self::get_value).
    pub fn try_get_value(&self, point: &Point, label: Label) -> Result<A::Value, RangeError> {
        self.check_label(label)?;
        let index = self.check_point(point)?;
        Ok(self.get_value_at(index, label))
    }

    /// Checked [`get_value_at`](Self::get_value_at).
    pub fn try_get_value_at(&self, index: usize, label: Label) -> Result<A::Value, RangeError> {
        self.check_label(label)?;
        self.check_index(index)?;
        Ok(self.get_value_at(index, label))
    }

    /// Checked [`set_value`](Self::set_value).
    pub fn try_set_value(
        &mut self,
        point: &Point,
        label: Label,
        value: A::Value,
    ) -> Result<(), RangeError> {
        self.check_label(label)?;
        let index = self.check_point(point)?;
        self.write(index, Some(point), label, value);
        Ok(())
    }

    /// Checked [`set_value_at`](Self::set_value_at).
    pub fn try_set_value_at(
        &mut self,
        index: usize,
        label: Label,
        value: A::Value,
    ) -> Result<(), RangeError> {
        self.check_label(label)?;
        self.check_index(index)?;
        self.write(index, None, label, value);
        Ok(())
    }

    /// Checked [`entry`](Self::entry).
    pub fn try_entry(&mut self, point: &Point, label: Label) -> Result<LabelRef<'_, Self>, RangeError> {
        self.check_label(label)?;
        let index = self.check_point(point)?;
        Ok(LabelRef::new(self, index, label))
    }
}

impl<A, R, B> Clone for MultiFieldStore<A, R, B>
where
    A: Approximation,
    R: SparseRow<A::Value>,
    B: BoundsTracker,
{
    fn clone(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            rows: self.rows.clone(),
            trackers: self.trackers.clone(),
            approximation: self.approximation,
            stored: self.stored,
        }
    }
}

impl<A, R, B> fmt::Debug for MultiFieldStore<A, R, B>
where
    A: Approximation,
    R: SparseRow<A::Value>,
    B: BoundsTracker,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFieldStore")
            .field("domain", &self.domain)
            .field("labels", &self.label_count())
            .field("stored", &self.stored)
            .field("approximation", &self.approximation)
            .finish_non_exhaustive()
    }
}

impl<A, R, B> MultiImage for MultiFieldStore<A, R, B>
where
    A: Approximation,
    R: SparseRow<A::Value>,
    B: BoundsTracker,
{
    type Value = A::Value;

    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn label_count(&self) -> usize {
        self.trackers.len()
    }

    fn default_value(&self) -> A::Value {
        self.approximation.default_value()
    }

    #[inline]
    fn get_value(&self, point: &Point, label: Label) -> A::Value {
        MultiFieldStore::get_value(self, point, label)
    }

    #[inline]
    fn get_value_at(&self, index: usize, label: Label) -> A::Value {
        MultiFieldStore::get_value_at(self, index, label)
    }

    #[inline]
    fn set_value(&mut self, point: &Point, label: Label, value: A::Value) {
        MultiFieldStore::set_value(self, point, label, value);
    }

    #[inline]
    fn set_value_at(&mut self, index: usize, label: Label, value: A::Value) {
        MultiFieldStore::set_value_at(self, index, label, value);
    }

    fn bounding_box(&self, label: Label, buffer: &Point) -> Domain {
        MultiFieldStore::bounding_box(self, label, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::{NoApproximation, ZeroApproximation, ZeroTolApproximation};
    use crate::bbox::NoBoundingBox;
    use crate::row::MaskedRow;

    type Store = MultiFieldStore<ZeroTolApproximation<f64>>;

    fn dom(lo: &[i32], hi: &[i32]) -> Domain {
        Domain::new(Point::from(lo), Point::from(hi)).unwrap()
    }

    fn scenario_store() -> Store {
        Store::new(dom(&[0, 0], &[10, 10]), 2, ZeroTolApproximation::new(0.1)).unwrap()
    }

    #[test]
    fn fresh_store_reads_default_everywhere() {
        let s = scenario_store();
        assert_eq!(s.size(), 121);
        assert_eq!(s.label_count(), 2);
        assert_eq!(s.stored_size(), 0);
        for p in s.domain().iter() {
            assert_eq!(s.get_value(&p, Label(0)), 0.0);
            assert_eq!(s.get_value(&p, Label(1)), 0.0);
        }
        assert!(s.tight_bounding_box(Label(0)).is_empty());
        s.check_consistency().unwrap();
    }

    #[test]
    fn write_then_overwrite_with_approximable_value() {
        let mut s = scenario_store();
        let p = Point::from([2, 5]);
        s.set_value(&p, Label(1), 0.5);
        assert_eq!(s.stored_size(), 1);
        assert_eq!(s.tight_bounding_box(Label(1)), dom(&[2, 5], &[2, 5]));
        assert!(s.tight_bounding_box(Label(0)).is_empty());

        s.set_value(&p, Label(1), 0.05);
        assert_eq!(s.get_value(&p, Label(1)), 0.0);
        assert_eq!(s.stored_size(), 0);
        assert!(s.tight_bounding_box(Label(1)).is_empty());
        s.check_consistency().unwrap();
    }

    #[test]
    fn bounding_box_with_buffer_is_clipped() {
        let mut s = scenario_store();
        s.set_value(&Point::from([1, 1]), Label(0), 1.0);
        s.set_value(&Point::from([3, 4]), Label(0), 1.0);
        assert_eq!(s.tight_bounding_box(Label(0)), dom(&[1, 1], &[3, 4]));
        assert_eq!(
            s.bounding_box(Label(0), &Point::from([2, 2])),
            dom(&[0, 0], &[5, 6])
        );
        assert!(s.bounding_box(Label(1), &Point::from([2, 2])).is_empty());
    }

    #[test]
    fn overwriting_stored_value_keeps_counts() {
        let mut s = scenario_store();
        let p = Point::from([7, 7]);
        s.set_value(&p, Label(0), 1.0);
        s.set_value(&p, Label(0), 2.0);
        assert_eq!(s.stored_size(), 1);
        assert_eq!(s.present_count(Label(0)), Some(1));
        assert_eq!(s.get_value(&p, Label(0)), 2.0);
    }

    #[test]
    fn writing_approximable_value_at_absent_entry_is_noop() {
        let mut s = scenario_store();
        s.set_value(&Point::from([4, 4]), Label(0), -0.1);
        assert_eq!(s.stored_size(), 0);
        assert!(s.row(&Point::from([4, 4])).is_empty());
    }

    #[test]
    fn linear_and_point_access_agree() {
        let mut s = scenario_store();
        let p = Point::from([3, 2]);
        let i = s.index_of(&p);
        assert_eq!(i, 25);
        assert_eq!(s.point_of(i), p);
        s.set_value_at(i, Label(1), 4.0);
        assert_eq!(s.get_value(&p, Label(1)), 4.0);
        assert_eq!(s.tight_bounding_box(Label(1)), dom(&[3, 2], &[3, 2]));
        assert_eq!(s.row_at(i).get(Label(1)), Some(4.0));
    }

    #[test]
    fn entry_writes_through() {
        let mut s = scenario_store();
        let p = Point::from([9, 10]);
        {
            let mut e = s.entry(&p, Label(0));
            assert_eq!(e.get(), 0.0);
            e.set(3.0);
            e.update(|v| v * 2.0);
            assert_eq!(e.get(), 6.0);
            assert_eq!(e.point(), p);
            assert_eq!(e.label(), Label(0));
        }
        assert_eq!(s.stored_size(), 1);
        let i = s.index_of(&p);
        s.entry_at(i, Label(0)).set(0.0);
        assert_eq!(s.stored_size(), 0);
        s.check_consistency().unwrap();
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = scenario_store();
        for p in s.domain().clone().iter().step_by(7) {
            s.set_value(&p, Label(0), 1.0);
            s.set_value(&p, Label(1), -1.0);
        }
        assert!(s.stored_size() > 0);
        s.clear();
        assert_eq!(s.stored_size(), 0);
        assert!(s.tight_bounding_box(Label(0)).is_empty());
        assert!(s.tight_bounding_box(Label(1)).is_empty());
        s.check_consistency().unwrap();
    }

    #[test]
    fn checked_accessors_reject_out_of_range() {
        let mut s = scenario_store();
        assert_eq!(
            s.try_get_value(&Point::from([0, 0]), Label(2)),
            Err(RangeError::LabelOutOfRange {
                label: Label(2),
                label_count: 2
            })
        );
        assert!(matches!(
            s.try_set_value(&Point::from([11, 0]), Label(0), 1.0),
            Err(RangeError::PointOutOfDomain { .. })
        ));
        assert_eq!(
            s.try_set_value_at(121, Label(0), 1.0),
            Err(RangeError::IndexOutOfRange {
                index: 121,
                size: 121
            })
        );
        assert!(s.try_entry(&Point::from([0, -1]), Label(0)).is_err());
        assert_eq!(s.stored_size(), 0);

        s.try_set_value(&Point::from([1, 0]), Label(1), 2.0).unwrap();
        assert_eq!(s.try_get_value_at(1, Label(1)), Ok(2.0));
    }

    #[test]
    fn construction_validates_config() {
        let d = dom(&[0, 0], &[2, 2]);
        assert_eq!(
            Store::new(d.clone(), 0, ZeroTolApproximation::new(0.1)).unwrap_err(),
            ConfigError::NoLabels
        );
        let masked = MultiFieldStore::<ZeroApproximation<i32>, MaskedRow<i32>>::new(
            d,
            65,
            ZeroApproximation::new(),
        );
        assert!(matches!(masked, Err(ConfigError::LabelCapacity { .. })));
    }

    #[test]
    fn no_approximation_stores_zero() {
        let mut s: MultiFieldStore<NoApproximation<i32>> =
            MultiFieldStore::new(dom(&[0], &[4]), 1, NoApproximation::new()).unwrap();
        s.set_value(&Point::from([2]), Label(0), 0);
        assert_eq!(s.stored_size(), 1);
        assert_eq!(s.tight_bounding_box(Label(0)), dom(&[2], &[2]));
    }

    #[test]
    fn no_bounding_box_reports_full_domain() {
        let d = dom(&[0, 0], &[10, 10]);
        let mut s = MultiFieldStore::<ZeroApproximation<f32>, SmallRow<f32>, NoBoundingBox>::new(
            d.clone(),
            2,
            ZeroApproximation::new(),
        )
        .unwrap();
        assert_eq!(s.tight_bounding_box(Label(0)), d);
        s.set_value(&Point::from([1, 1]), Label(0), 1.0);
        assert_eq!(s.bounding_box(Label(0), &Point::from([1, 1])), d);
        assert_eq!(s.present_count(Label(0)), None);
        s.check_consistency().unwrap();
    }

    #[test]
    fn many_labels_per_point() {
        let d = dom(&[0, 0, 0], &[3, 3, 3]);
        let mut s = MultiFieldStore::<ZeroApproximation<i64>, MaskedRow<i64>>::new(
            d,
            40,
            ZeroApproximation::new(),
        )
        .unwrap();
        let p = Point::from([1, 2, 3]);
        for l in 0..40 {
            s.set_value(&p, Label(l), i64::from(l) + 1);
        }
        assert_eq!(s.row(&p).len(), 40);
        assert_eq!(s.stored_size(), 40);
        for l in (0..40).step_by(2) {
            s.set_value(&p, Label(l), 0);
        }
        assert_eq!(s.row(&p).len(), 20);
        assert_eq!(s.get_value(&p, Label(39)), 40);
        s.check_consistency().unwrap();
    }

    /// Reports the full domain and refuses to be told about points.
    #[derive(Clone, Debug)]
    struct BlindTracker(Domain);

    impl BoundsTracker for BlindTracker {
        const KIND: &'static str = "blind";
        const NEEDS_POINTS: bool = false;

        fn new(domain: &Domain) -> Self {
            Self(domain.clone())
        }
        fn add_point(&mut self, point: &Point) {
            panic!("add_point({point}) on a tracker that needs no points");
        }
        fn remove_point(&mut self, point: &Point) {
            panic!("remove_point({point}) on a tracker that needs no points");
        }
        fn bounding_box(&self, _buffer: &Point) -> Domain {
            self.0.clone()
        }
        fn is_empty(&self) -> bool {
            false
        }
        fn present_count(&self) -> Option<usize> {
            None
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn pointless_trackers_are_not_told_about_writes() {
        assert!(!NoBoundingBox::NEEDS_POINTS);
        assert!(AxisAlignedBoundingBox::NEEDS_POINTS);

        let d = dom(&[0, 0], &[4, 4]);
        let mut s = MultiFieldStore::<ZeroApproximation<f64>, SmallRow<f64>, BlindTracker>::new(
            d.clone(),
            2,
            ZeroApproximation::new(),
        )
        .unwrap();
        s.set_value_at(7, Label(1), 2.0);
        s.set_value(&Point::from([3, 3]), Label(0), 1.0);
        assert_eq!(s.stored_size(), 2);
        s.set_value_at(7, Label(1), 0.0);
        s.set_value(&Point::from([3, 3]), Label(0), 0.0);
        assert_eq!(s.stored_size(), 0);
        assert_eq!(s.tight_bounding_box(Label(0)), d);
    }

    #[test]
    fn stores_at_the_i32_extremes() {
        let mut s = Store::new(
            dom(&[i32::MIN, i32::MAX - 2], &[i32::MIN + 2, i32::MAX]),
            1,
            ZeroTolApproximation::new(0.1),
        )
        .unwrap();
        let low = Point::from([i32::MIN, i32::MAX]);
        let high = Point::from([i32::MIN + 2, i32::MAX - 2]);
        s.set_value(&low, Label(0), 1.0);
        s.set_value_at(2, Label(0), 2.0);
        assert_eq!(s.point_of(2), high);
        assert_eq!(s.get_value(&high, Label(0)), 2.0);
        assert_eq!(s.index_of(&low), 6);
        assert_eq!(s.tight_bounding_box(Label(0)), *s.domain());
        assert_eq!(s.bounding_box(Label(0), &Point::from([5, 5])), *s.domain());

        s.set_value(&low, Label(0), 0.0);
        let corner = [i32::MIN + 2, i32::MAX - 2];
        assert_eq!(s.tight_bounding_box(Label(0)), dom(&corner, &corner));
        s.check_consistency().unwrap();
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_domain_is_a_config_error() {
        let huge = Domain::from_shape(&[1 << 31, 1 << 31]).unwrap();
        let err = MultiFieldStore::<ZeroApproximation<f64>>::new(huge, 1, ZeroApproximation::new())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::StorageOverflow {
                points: 1 << 62,
                labels: 1
            }
        );
    }
}
