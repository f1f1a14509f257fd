//! Addition, subtraction, scalar and series multiplication, negation, and division.
//!
//! See SPEC_FULL.md §4.3. Multiplication is the key recursive operation the analytic
//! operations in [`super::analytic`] build on; its productive form avoids ever demanding a
//! coefficient of a sub-multiplication before that sub-multiplication itself has emitted it.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::SeriesError;
use crate::rational::Rational;

use super::Series;

/// `S + T`, coefficientwise, treating either operand's exhaustion as trailing zeros.
/// Memoized per right-operand identity.
pub fn add(s: &Series, t: &Series) -> Series {
    if let Some(cached) = s.add_memo().borrow().get(&t.id()).cloned() {
        return cached;
    }
    let mut cs = s.coeffs_cursor();
    let mut ct = t.coeffs_cursor();
    let result = Series::from_infinite_producer(move || cs.next() + ct.next());
    s.add_memo().borrow_mut().insert(t.id(), result.clone());
    result
}

/// `S + c`, lifting the `Rational` `c` to the constant series `(c, 0, 0, …)` before adding.
pub fn add_scalar(s: &Series, c: &Rational) -> Series {
    let mut cursor = s.coeffs_cursor();
    let mut first = Some(c.clone());
    Series::from_infinite_producer(move || {
        let term = cursor.next();
        match first.take() {
            Some(c) => c + term,
            None => term,
        }
    })
}

/// `S - T = S + (-1)·T`.
pub fn sub(s: &Series, t: &Series) -> Series {
    add(s, &neg(t))
}

/// `c · S`. Fast paths: `c = 0` yields the all-zero series without consulting `S`;
/// `c = 1` returns `S` itself (a cheap handle clone, no new producer).
pub fn scale(s: &Series, c: &Rational) -> Series {
    if c.is_zero() {
        return Series::empty();
    }
    if *c == Rational::one() {
        return s.clone();
    }
    let mut cursor = s.coeffs_cursor();
    let c = c.clone();
    Series::from_infinite_producer(move || c.clone() * cursor.next())
}

/// `-S = (-1) · S`.
pub fn neg(s: &Series) -> Series {
    scale(s, &Rational::from_integers(-1, 1))
}

/// `S · T`, via the productive recurrence
/// `S·T = (S₀·T₀) :: (tail(S)·tail(T)).xmul + S₀·tail(T) + T₀·tail(S)`.
/// The head coefficient is produced without consulting any recursive multiplication, which
/// is what makes the recursive reference to `S·T` inside its own tail productive. Memoized
/// per operand identity.
pub fn mul(s: &Series, t: &Series) -> Series {
    if let Some(cached) = s.mul_memo().borrow().get(&t.id()).cloned() {
        return cached;
    }
    let s0 = s.zero_of();
    let t0 = t.zero_of();
    let head = s0.clone() * t0.clone();
    let s_tail = s.tail();
    let t_tail = t.tail();
    let mut pending = Some(head);
    let mut cursor = None;
    let result = Series::from_infinite_producer(move || {
        if let Some(v) = pending.take() {
            return v;
        }
        if cursor.is_none() {
            let mut rest = mul(&s_tail, &t_tail).xmul();
            if !s0.is_zero() {
                rest = add(&rest, &scale(&t_tail, &s0));
            }
            if !t0.is_zero() {
                rest = add(&rest, &scale(&s_tail, &t0));
            }
            cursor = Some(rest.coeffs_cursor());
        }
        cursor.as_mut().unwrap().next()
    });
    s.mul_memo().borrow_mut().insert(t.id(), result.clone());
    result
}

/// `S / T = S · (1/T)`. Fails with `InvalidDomain` exactly when `T₀ = 0`
/// (see [`super::analytic::reciprocal`]).
pub fn div(s: &Series, t: &Series) -> Result<Series, SeriesError> {
    Ok(mul(s, &super::analytic::reciprocal(t)?))
}

/// `S / c`, i.e. scalar multiplication by `1/c`.
///
/// # Panics
///
/// Panics if `c` is zero (division by the rational zero).
pub fn div_scalar(s: &Series, c: &Rational) -> Series {
    scale(s, &(Rational::one() / c.clone()))
}

impl Add for Series {
    type Output = Series;
    fn add(self, rhs: Series) -> Series {
        add(&self, &rhs)
    }
}

impl Add<Rational> for Series {
    type Output = Series;
    fn add(self, rhs: Rational) -> Series {
        add_scalar(&self, &rhs)
    }
}

impl Add<Series> for Rational {
    type Output = Series;
    fn add(self, rhs: Series) -> Series {
        add_scalar(&rhs, &self)
    }
}

impl Sub for Series {
    type Output = Series;
    fn sub(self, rhs: Series) -> Series {
        sub(&self, &rhs)
    }
}

impl Mul for Series {
    type Output = Series;
    fn mul(self, rhs: Series) -> Series {
        mul(&self, &rhs)
    }
}

impl Mul<Rational> for Series {
    type Output = Series;
    fn mul(self, rhs: Rational) -> Series {
        scale(&self, &rhs)
    }
}

impl Mul<Series> for Rational {
    type Output = Series;
    fn mul(self, rhs: Series) -> Series {
        scale(&rhs, &self)
    }
}

impl Div for Series {
    type Output = Result<Series, SeriesError>;
    fn div(self, rhs: Series) -> Result<Series, SeriesError> {
        div(&self, &rhs)
    }
}

impl Div<Rational> for Series {
    type Output = Series;
    fn div(self, rhs: Rational) -> Series {
        div_scalar(&self, &rhs)
    }
}

impl Neg for Series {
    type Output = Series;
    fn neg(self) -> Series {
        neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::from_integers(n, d)
    }

    fn nthpower(n: u64) -> Series {
        let mut coeffs = vec![Rational::zero(); n as usize];
        coeffs.push(Rational::one());
        Series::from_list(coeffs)
    }

    #[test]
    fn addition_identities() {
        let x = nthpower(1);
        let zero = Series::empty();
        assert_eq!(add(&x, &zero), x);
        assert_eq!(add(&zero, &x), x);
    }

    #[test]
    fn scalar_fast_paths_avoid_consulting_operand() {
        use std::cell::Cell;
        use std::rc::Rc;
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let s = Series::from_producer(move || {
            calls2.set(calls2.get() + 1);
            Some(r(1, 1))
        });
        let zeroed = scale(&s, &Rational::zero());
        assert_eq!(zeroed.first_k(3), vec![r(0, 1), r(0, 1), r(0, 1)]);
        assert_eq!(calls.get(), 0, "scaling by zero must not realize the operand");
    }

    #[test]
    fn multiplication_by_one_is_identity() {
        let x = nthpower(1);
        let one = nthpower(0);
        assert_eq!(mul(&x, &one), x);
        assert_eq!(mul(&one, &x), x);
    }

    #[test]
    fn pure_power_multiplication() {
        let x = nthpower(1);
        let x2 = nthpower(2);
        assert_eq!(mul(&x, &x), x2);
    }

    #[test]
    fn mul_is_memoized_per_operand_identity() {
        let a = nthpower(1);
        let b = nthpower(2);
        let first = mul(&a, &b);
        let second = mul(&a, &b);
        assert_eq!(first.id(), second.id());
    }
}
