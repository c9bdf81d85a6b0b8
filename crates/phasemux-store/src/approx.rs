//! Approximation policies.
//!
//! A policy is a predicate over values: a value for which [`eval`] returns
//! `true` is *approximable* and is never stored. Reading an absent entry
//! returns the policy's [`default_value`], which is zero for every policy
//! shipped here.
//!
//! | policy                        | approximable when |
//! |-------------------------------|-------------------|
//! | [`NoApproximation`]           | never             |
//! | [`ZeroApproximation`]         | `v == 0`          |
//! | [`ZeroTolApproximation`]      | `\|v\| <= tol`    |
//! | [`NegativeApproximation`]     | `v <= 0`          |
//! | [`NegativeTolApproximation`]  | `v <= tol`        |
//!
//! [`eval`]: Approximation::eval
//! [`default_value`]: Approximation::default_value

use std::fmt;
use std::marker::PhantomData;

use phasemux_core::Scalar;

/// Decides which values are elided from storage.
pub trait Approximation: Copy + fmt::Debug + Send + Sync + 'static {
    /// Value type of the image.
    type Value: Scalar;

    /// `true` if `value` is approximable and must not be stored.
    fn eval(&self, value: Self::Value) -> bool;

    /// Value read for an entry that is not stored.
    #[inline]
    fn default_value(&self) -> Self::Value {
        Self::Value::ZERO
    }

    /// Short policy name, used in log events.
    fn name(&self) -> &'static str;
}

macro_rules! stateless_policy {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T>(PhantomData<T>);

        impl<T> $name<T> {
            /// Create the policy.
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

stateless_policy!(
    /// Stores every value that is written, including zero.
    NoApproximation
);
stateless_policy!(
    /// Elides exact zeros.
    ZeroApproximation
);
stateless_policy!(
    /// Elides every value `<= 0`.
    NegativeApproximation
);

impl<T: Scalar> Approximation for NoApproximation<T> {
    type Value = T;

    #[inline]
    fn eval(&self, _value: T) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

impl<T: Scalar> Approximation for ZeroApproximation<T> {
    type Value = T;

    #[inline]
    fn eval(&self, value: T) -> bool {
        value == T::ZERO
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

impl<T: Scalar> Approximation for NegativeApproximation<T> {
    type Value = T;

    #[inline]
    fn eval(&self, value: T) -> bool {
        value <= T::ZERO
    }

    fn name(&self) -> &'static str {
        "negative"
    }
}

/// Elides values whose magnitude is at most `tol`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZeroTolApproximation<T> {
    tol: T,
}

impl<T: Scalar> ZeroTolApproximation<T> {
    /// Create the policy with tolerance `tol`.
    pub fn new(tol: T) -> Self {
        Self { tol }
    }

    /// The tolerance.
    pub fn tolerance(&self) -> T {
        self.tol
    }
}

impl<T: Scalar> Approximation for ZeroTolApproximation<T> {
    type Value = T;

    #[inline]
    fn eval(&self, value: T) -> bool {
        value.abs() <= self.tol
    }

    fn name(&self) -> &'static str {
        "zero-tol"
    }
}

/// Elides values at most `tol`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NegativeTolApproximation<T> {
    tol: T,
}

impl<T: Scalar> NegativeTolApproximation<T> {
    /// Create the policy with tolerance `tol`.
    pub fn new(tol: T) -> Self {
        Self { tol }
    }

    /// The tolerance.
    pub fn tolerance(&self) -> T {
        self.tol
    }
}

impl<T: Scalar> Approximation for NegativeTolApproximation<T> {
    type Value = T;

    #[inline]
    fn eval(&self, value: T) -> bool {
        value <= self.tol
    }

    fn name(&self) -> &'static str {
        "negative-tol"
    }
}
