//! Exact rational arithmetic, wrapping `rug::Rational`.
//!
//! All zero tests compare against exact rational zero (`rug::Rational::cmp0`), never
//! floating-point tolerance. `Hash` is implemented over the canonical (already-reduced)
//! numerator/denominator digit representation so the `a == b ⇒ hash(a) == hash(b)`
//! invariant holds; this is what lets [`Rational`] key the integration-constant memo table.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use rug::integer::Order;

/// Arbitrary-precision rational number.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Rational(pub(crate) rug::Rational);

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let numer = self.0.numer();
        let denom = self.0.denom();
        numer.to_digits::<u8>(Order::Msf).hash(state);
        numer.cmp0().hash(state);
        denom.to_digits::<u8>(Order::Msf).hash(state);
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Constructors ---

impl Rational {
    /// The exact rational zero.
    pub fn zero() -> Self {
        Rational(rug::Rational::from(0))
    }

    /// The exact rational one.
    pub fn one() -> Self {
        Rational(rug::Rational::from(1))
    }

    /// Construct from an exact integer numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn from_integers(num: i64, den: i64) -> Self {
        assert!(den != 0, "Rational denominator must be nonzero");
        Rational(rug::Rational::from((rug::Integer::from(num), rug::Integer::from(den))))
    }

    /// Construct an exact rational equal to a given `f64`, via exact IEEE-754 bit-pattern
    /// decomposition (sign, exponent, mantissa). No precision is lost: the result is exactly
    /// the value the `f64` represents, not a rounded decimal approximation of it.
    ///
    /// `NaN` and infinities have no rational value and panic.
    pub fn from_f64_exact(x: f64) -> Self {
        assert!(x.is_finite(), "Rational::from_f64_exact requires a finite value");
        if x == 0.0 {
            return Rational::zero();
        }
        let bits = x.to_bits();
        let sign: i64 = if (bits >> 63) & 1 == 1 { -1 } else { 1 };
        let raw_exponent = ((bits >> 52) & 0x7ff) as i64;
        let raw_mantissa = bits & 0x000f_ffff_ffff_ffff;
        let (mantissa, exponent) = if raw_exponent == 0 {
            // subnormal: value = mantissa * 2^-1074
            (raw_mantissa, -1074i64)
        } else {
            // normal: implicit leading 1 bit, value = mantissa * 2^(exponent-1075)
            (raw_mantissa | (1u64 << 52), raw_exponent - 1075)
        };
        let magnitude = rug::Integer::from(mantissa) * rug::Integer::from(sign);
        let mut result = rug::Rational::from((magnitude, rug::Integer::from(1)));
        if exponent >= 0 {
            result *= rug::Integer::from(1) << (exponent as u32);
        } else {
            result /= rug::Integer::from(1) << ((-exponent) as u32);
        }
        Rational(result)
    }

    /// True iff this rational is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    /// True iff this rational is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            Rational(rug::Rational::from(-&self.0))
        } else {
            self.clone()
        }
    }

    /// Lossy conversion to `f64`, used only for the one admitted floating-point step in
    /// [`crate::series::analytic::squareroot`].
    pub fn to_f64_lossy(&self) -> f64 {
        self.0.numer().to_f64() / self.0.denom().to_f64()
    }
}

impl From<i64> for Rational {
    fn from(val: i64) -> Self {
        Rational(rug::Rational::from(val))
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Rational::from_integers(num, den)
    }
}

// --- Arithmetic ---

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 + &rhs.0))
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;
    fn add(self, rhs: &'a Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 + &rhs.0))
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 - &rhs.0))
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;
    fn sub(self, rhs: &'a Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 - &rhs.0))
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 * &rhs.0))
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;
    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational(rug::Rational::from(&self.0 * &rhs.0))
    }
}

impl Div for Rational {
    type Output = Rational;
    /// Exact rational division. Panics if the divisor is zero.
    fn div(self, rhs: Rational) -> Rational {
        assert!(!rhs.is_zero(), "Rational division by zero");
        Rational(rug::Rational::from(&self.0 / &rhs.0))
    }
}

impl<'a> Div<&'a Rational> for &'a Rational {
    type Output = Rational;
    fn div(self, rhs: &'a Rational) -> Rational {
        assert!(!rhs.is_zero(), "Rational division by zero");
        Rational(rug::Rational::from(&self.0 / &rhs.0))
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(rug::Rational::from(-&self.0))
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(rug::Rational::from(-&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(val: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        val.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn hash_invariant_holds_for_equal_values() {
        let a = Rational::from_integers(6, 4);
        let b = Rational::from_integers(3, 2);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn arithmetic_is_exact() {
        let half = Rational::from_integers(1, 2);
        let third = Rational::from_integers(1, 3);
        assert_eq!(half.clone() + third.clone(), Rational::from_integers(5, 6));
        assert_eq!(half.clone() * third, Rational::from_integers(1, 6));
    }

    #[test]
    fn from_f64_exact_round_trips_through_lossy_conversion() {
        for x in [0.5f64, 1.25, -3.75, 0.1, 100.0, 1e-10] {
            let r = Rational::from_f64_exact(x);
            assert_eq!(r.to_f64_lossy(), x, "round trip failed for {x}");
        }
    }

    #[test]
    fn from_f64_exact_zero() {
        assert!(Rational::from_f64_exact(0.0).is_zero());
    }

    #[test]
    fn abs_and_zero_predicate() {
        let neg = Rational::from_integers(-5, 3);
        assert_eq!(neg.abs(), Rational::from_integers(5, 3));
        assert!(Rational::zero().is_zero());
        assert!(!Rational::one().is_zero());
    }
}
