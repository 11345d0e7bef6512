//! Double-precision coefficients with a fixed cancellation tolerance.

use rand::Rng;

use super::{Field, Ring};

/// Coefficient magnitudes below this count as zero. The tolerance is
/// applied only through [`FloatField`]'s zero test, which every insert and
/// merge site consults; rendering never re-filters.
pub const EPSILON: f64 = 1e-9;

/// The field of `f64` coefficients with [`EPSILON`]-tolerant zero
/// detection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FloatField;

impl Ring for FloatField {
    type Element = f64;

    #[inline(always)]
    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    #[inline(always)]
    fn sub(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    #[inline(always)]
    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut f64, b: &f64) {
        *a += b;
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut f64, b: &f64) {
        *a -= b;
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut f64, b: &f64) {
        *a *= b;
    }

    #[inline(always)]
    fn neg(&self, a: &f64) -> f64 {
        -a
    }

    #[inline(always)]
    fn zero(&self) -> f64 {
        0.
    }

    #[inline(always)]
    fn one(&self) -> f64 {
        1.
    }

    #[inline(always)]
    fn is_zero(a: &f64) -> bool {
        a.abs() < EPSILON
    }

    #[inline(always)]
    fn is_one(&self, a: &f64) -> bool {
        (a - 1.).abs() < EPSILON
    }

    #[inline(always)]
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> f64 {
        rng.gen_range(range.0..range.1) as f64
    }
}

impl Field for FloatField {
    #[inline(always)]
    fn div(&self, a: &f64, b: &f64) -> f64 {
        a / b
    }

    #[inline(always)]
    fn div_assign(&self, a: &mut f64, b: &f64) {
        *a /= b;
    }

    #[inline(always)]
    fn inv(&self, a: &f64) -> f64 {
        1. / a
    }
}
