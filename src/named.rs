//! Named series constructors: thin, pure consumers of [`crate::series::Series`]'s public
//! algebra, mirroring the closure-based mutual-recursion idiom of
//! `examples/original_source/powerseries.py`'s `expseries`/`sinseries`/etc. (SPEC_FULL.md
//! §2, §6).

use crate::rational::Rational;
use crate::series::{analytic, arithmetic, Series};

/// The series for `coeff · xⁿ`. `nthpower(0)` is the multiplicative identity (`ONE`);
/// `nthpower(1)` is `X`.
pub fn nthpower(n: u64, coeff: Rational) -> Series {
    let mut coeffs = vec![Rational::zero(); n as usize];
    coeffs.push(coeff);
    Series::from_list(coeffs)
}

/// `ONE / (ONE - X)`: the constant sequence `(c, c, c, …)`.
pub fn const_series(c: Rational) -> Series {
    Series::from_fn(move |_| c.clone())
}

/// `ONE / (ONE + X)`: the alternating constant sequence `(c, -c, c, -c, …)`.
pub fn alt_const_series(c: Rational) -> Series {
    Series::from_fn(move |n| {
        if n % 2 == 0 {
            c.clone()
        } else {
            -c.clone()
        }
    })
}

/// The natural numbers `(0, 1, 2, 3, …)` as a series.
pub fn n_series() -> Series {
    Series::from_fn(|n| Rational::from_integers(n as i64, 1))
}

/// The harmonic series `(0, 1, 1/2, 1/3, …)`, the series representation of `-ln(1 - x)`.
pub fn harmonic() -> Series {
    Series::from_fn(|n| if n == 0 { Rational::zero() } else { Rational::from_integers(1, n as i64) })
}

/// The alternating harmonic series `(0, 1, -1/2, 1/3, …)`, the series representation of
/// `ln(1 + x)`.
pub fn alt_harmonic() -> Series {
    Series::from_fn(|n| {
        if n == 0 {
            Rational::zero()
        } else {
            let sign = if n % 2 == 1 { 1 } else { -1 };
            Rational::from_integers(sign, n as i64)
        }
    })
}

/// The exponential function `e^x`. `EXP` is the unique solution of `dy/dx = y`, `y(0) = 1`;
/// this is exactly [`analytic::exponential`] applied to `X`.
pub fn exp() -> Series {
    analytic::exponential(&nthpower(1, Rational::one()))
        .expect("X has zero constant term by construction")
}

/// The sine function. Built from `d²y/dx² = -y`, `y(0) = 0`, `y'(0) = 1`, i.e.
/// `SIN = ∫(∫(-SIN, 1), 0)`, the same self-referential shape as reciprocal/exponential.
pub fn sin() -> Series {
    Series::self_referential(|slot| {
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let inner = analytic::integral(&arithmetic::neg(&self_series), Rational::one());
                let outer = analytic::integral(&inner, Rational::zero());
                cursor = Some(outer.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The cosine function. Built from `d²y/dx² = -y`, `y(0) = 1`, `y'(0) = 0`, i.e.
/// `COS = ∫(∫(-COS, 0), 1)`.
pub fn cos() -> Series {
    Series::self_referential(|slot| {
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let inner = analytic::integral(&arithmetic::neg(&self_series), Rational::zero());
                let outer = analytic::integral(&inner, Rational::one());
                cursor = Some(outer.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The tangent function. Built from `dy/dx = 1 + y²`, `y(0) = 0`, i.e.
/// `TAN = ∫(ONE + TAN·TAN, 0)`. Cheaper than dividing sine by cosine: one multiplication
/// instead of a reciprocal.
pub fn tan() -> Series {
    Series::self_referential(|slot| {
        let one = nthpower(0, Rational::one());
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let squared = arithmetic::mul(&self_series, &self_series);
                let integrand = arithmetic::add(&one, &squared);
                let integrated = analytic::integral(&integrand, Rational::zero());
                cursor = Some(integrated.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The secant function, `1 / cos(x)`.
pub fn sec() -> Series {
    analytic::reciprocal(&cos()).expect("cos has constant term 1 != 0")
}

/// The arcsine function, the compositional inverse of [`sin`].
pub fn arcsin() -> Series {
    analytic::inverse(&sin()).expect("sin has zero constant term and nonzero first tail term")
}

/// The arctangent function: the integral of `1 / (1 + x²)`, faster than inverting [`tan`].
pub fn arctan() -> Series {
    let one = nthpower(0, Rational::one());
    let x2 = nthpower(2, Rational::one());
    let denom = arithmetic::add(&one, &x2);
    let recip = analytic::reciprocal(&denom).expect("1 + x^2 has constant term 1 != 0");
    analytic::integral(&recip, Rational::zero())
}

/// The hyperbolic sine function. Built from `d²y/dx² = y`, `y(0) = 0`, `y'(0) = 1`, i.e.
/// `SINH = ∫(∫(SINH, 1), 0)`.
pub fn sinh() -> Series {
    Series::self_referential(|slot| {
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let inner = analytic::integral(&self_series, Rational::one());
                let outer = analytic::integral(&inner, Rational::zero());
                cursor = Some(outer.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The hyperbolic cosine function. Built from `d²y/dx² = y`, `y(0) = 1`, `y'(0) = 0`, i.e.
/// `COSH = ∫(∫(COSH, 0), 1)`.
pub fn cosh() -> Series {
    Series::self_referential(|slot| {
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let inner = analytic::integral(&self_series, Rational::zero());
                let outer = analytic::integral(&inner, Rational::one());
                cursor = Some(outer.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The hyperbolic tangent function. Built from `dy/dx = 1 - y²`, `y(0) = 0`, i.e.
/// `TANH = ∫(ONE - TANH·TANH, 0)`.
pub fn tanh() -> Series {
    Series::self_referential(|slot| {
        let one = nthpower(0, Rational::one());
        let mut cursor = None;
        Box::new(move || {
            if cursor.is_none() {
                let self_series = slot.get();
                let squared = arithmetic::mul(&self_series, &self_series);
                let integrand = arithmetic::sub(&one, &squared);
                let integrated = analytic::integral(&integrand, Rational::zero());
                cursor = Some(integrated.coeffs_cursor());
            }
            Some(cursor.as_mut().unwrap().next())
        })
    })
}

/// The hyperbolic secant function, `1 / cosh(x)`.
pub fn sech() -> Series {
    analytic::reciprocal(&cosh()).expect("cosh has constant term 1 != 0")
}

/// The hyperbolic arcsine function, the compositional inverse of [`sinh`].
pub fn arcsinh() -> Series {
    analytic::inverse(&sinh()).expect("sinh has zero constant term and nonzero first tail term")
}

/// The hyperbolic arctangent function: the integral of `1 / (1 - x²)`.
pub fn arctanh() -> Series {
    let one = nthpower(0, Rational::one());
    let x2 = nthpower(2, Rational::one());
    let denom = arithmetic::sub(&one, &x2);
    let recip = analytic::reciprocal(&denom).expect("1 - x^2 has constant term 1 != 0");
    analytic::integral(&recip, Rational::zero())
}
