//! Scalar value types storable in a multi-field image.

use std::fmt::Debug;

/// A per-(point, label) value.
///
/// Implemented for the primitive float and signed integer types. The
/// approximation policies only need ordering, a zero, and `abs`.
pub trait Scalar: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Additive identity. Used as the default value of every policy.
    const ZERO: Self;

    /// Absolute value.
    fn abs(self) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = $zero;

                #[inline]
                fn abs(self) -> Self {
                    <$t>::abs(self)
                }
            }
        )*
    };
}

impl_scalar!(f32 => 0.0, f64 => 0.0, i32 => 0, i64 => 0);
