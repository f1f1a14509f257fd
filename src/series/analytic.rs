//! Composition, differentiation, integration, reciprocal, compositional inverse, square
//! root, exponential, and logarithm.
//!
//! See SPEC_FULL.md §4.4. Reciprocal, exponential, inverse, and square root each define a
//! series in terms of itself; all four are built with [`Series::self_referential`], which
//! emits the base case(s) (one or two coefficients, per the recurrence) before any access
//! to the self-reference slot, guaranteeing productivity.

use crate::error::SeriesError;
use crate::rational::Rational;

use super::arithmetic::{add, mul, scale};
use super::Series;

/// `S(T)`, defined only when `T₀ = 0`. `S(T) = S₀ :: tail(T) · tail(S)(T)`.
/// Memoized per argument identity.
pub fn compose(s: &Series, t: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.compose_memo().borrow().get(&t.id()).cloned() {
        return cached;
    }
    let t0 = t.zero_of();
    let result = if !t0.is_zero() {
        Err(SeriesError::invalid_domain(
            "compose",
            "argument series must have zero constant term (T0 must equal 0)",
        ))
    } else {
        let s0 = s.zero_of();
        let s_tail = s.tail();
        let t_tail = t.tail();
        let t_for_recursion = t.clone();
        let mut first = Some(s0);
        let mut cursor = None;
        Ok(Series::from_infinite_producer(move || {
            if let Some(v) = first.take() {
                return v;
            }
            if cursor.is_none() {
                let inner = compose(&s_tail, &t_for_recursion)
                    .expect("argument constant term re-verified to be zero");
                let rest = mul(&t_tail, &inner);
                cursor = Some(rest.coeffs_cursor());
            }
            cursor.as_mut().unwrap().next()
        }))
    };
    s.compose_memo().borrow_mut().insert(t.id(), result.clone());
    result
}

/// `D(S)`: the nth coefficient of `D(S)` equals `(n+1)·Sₙ₊₁`.
pub fn derivative(s: &Series) -> Series {
    s.derivative_cell()
        .get_or_init(|| {
            let mut cursor = s.coeffs_cursor();
            let _ = cursor.next();
            let mut multiplier = 1i64;
            Series::from_infinite_producer(move || {
                let term = cursor.next();
                let coeff = Rational::from_integers(multiplier, 1) * term;
                multiplier += 1;
                coeff
            })
        })
        .clone()
}

/// `I(S, c)`: 0th coefficient is `c`; (n+1)th coefficient is `Sₙ / (n+1)`. Memoized by the
/// constant `c`.
pub fn integral(s: &Series, const_term: Rational) -> Series {
    if let Some(cached) = s.integral_memo().borrow().get(&const_term).cloned() {
        return cached;
    }
    let mut cursor = s.coeffs_cursor();
    let mut first = Some(const_term.clone());
    let mut denom = 1i64;
    let result = Series::from_infinite_producer(move || match first.take() {
        Some(c) => c,
        None => {
            let term = cursor.next();
            let coeff = term / Rational::from_integers(denom, 1);
            denom += 1;
            coeff
        }
    });
    s.integral_memo().borrow_mut().insert(const_term, result.clone());
    result
}

/// `1/S`, defined only when `S₀ ≠ 0`. `1/S = r :: (−r)·(tail(S)·(1/S))` where `r = 1/S₀`.
pub fn reciprocal(s: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.reciprocal_cell().get() {
        return cached.clone();
    }
    let s0 = s.zero_of();
    let result = if s0.is_zero() {
        Err(SeriesError::invalid_domain(
            "reciprocal",
            "constant term must be nonzero (S0 must not equal 0)",
        ))
    } else {
        let r = Rational::one() / s0;
        let neg_r = -r.clone();
        let s_tail = s.tail();
        let mut first = Some(r);
        let mut cursor = None;
        Ok(Series::self_referential(move |slot| {
            Box::new(move || {
                if let Some(v) = first.take() {
                    return Some(v);
                }
                if cursor.is_none() {
                    let self_series = slot.get();
                    let rest = scale(&mul(&s_tail, &self_series), &neg_r);
                    cursor = Some(rest.coeffs_cursor());
                }
                Some(cursor.as_mut().unwrap().next())
            })
        }))
    };
    let _ = s.reciprocal_cell().set(result.clone());
    result
}

/// Compositional inverse: defined only when `S₀ = 0` and `S₁ ≠ 0`.
/// `Inv(S) = 0 :: r :: (−r)·tail(I)·tail(I)·(tail(tail(S)))(I)` where `I = Inv(S)` and
/// `r = 1/S₁`. Satisfies `S(Inv(S)) = x` and `Inv(Inv(S)) = S`.
pub fn inverse(s: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.inverse_cell().get() {
        return cached.clone();
    }
    let s0 = s.zero_of();
    let result = if !s0.is_zero() {
        Err(SeriesError::invalid_domain(
            "inverse",
            "constant term must be zero (S0 must equal 0)",
        ))
    } else {
        let s_tail = s.tail();
        let s1 = s_tail.zero_of();
        if s1.is_zero() {
            Err(SeriesError::invalid_domain(
                "inverse",
                "first tail coefficient must be nonzero (S1 must not equal 0)",
            ))
        } else {
            let r = Rational::one() / s1;
            let neg_r = -r.clone();
            let s_tail2 = s_tail.tail();
            let mut pending = vec![r, Rational::zero()]; // popped back-to-front: 0 then r
            let mut cursor = None;
            Ok(Series::self_referential(move |slot| {
                Box::new(move || {
                    if let Some(v) = pending.pop() {
                        return Some(v);
                    }
                    if cursor.is_none() {
                        let inv_series = slot.get();
                        let inv_tail = inv_series.tail();
                        let composed = compose(&s_tail2, &inv_series)
                            .expect("compositional-inverse argument has zero constant term by construction");
                        let term = scale(&mul(&mul(&inv_tail, &inv_tail), &composed), &neg_r);
                        cursor = Some(term.coeffs_cursor());
                    }
                    Some(cursor.as_mut().unwrap().next())
                })
            }))
        }
    };
    let _ = s.inverse_cell().set(result.clone());
    result
}

/// `√S`, defined only when `S₀ > 0`. `s₀ = √(S₀)` is computed via the one admitted
/// floating-point step (`f64::sqrt`) and converted back to an exact `Rational` by the same
/// bit-pattern decomposition used for numeric literals. Then
/// `√S = s₀ :: tail(S) · 1/(s₀ + √S)`.
pub fn squareroot(s: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.squareroot_cell().get() {
        return cached.clone();
    }
    let s0 = s.zero_of();
    let result = if s0.is_zero() {
        Err(SeriesError::invalid_domain(
            "squareroot",
            "constant term must be nonzero (S0 must not equal 0)",
        ))
    } else if s0.is_negative() {
        Err(SeriesError::invalid_domain(
            "squareroot",
            "constant term must be non-negative for a real square root",
        ))
    } else {
        let s0_sqrt = Rational::from_f64_exact(s0.to_f64_lossy().sqrt());
        let s_tail = s.tail();
        let mut first = Some(s0_sqrt.clone());
        let mut cursor = None;
        Ok(Series::self_referential(move |slot| {
            Box::new(move || {
                if let Some(v) = first.take() {
                    return Some(v);
                }
                if cursor.is_none() {
                    let self_series = slot.get();
                    let denom = add_const(&self_series, &s0_sqrt);
                    let recip = reciprocal(&denom)
                        .expect("square-root denominator's constant term is 2*sqrt(S0) != 0 by construction");
                    let rest = mul(&s_tail, &recip);
                    cursor = Some(rest.coeffs_cursor());
                }
                Some(cursor.as_mut().unwrap().next())
            })
        }))
    };
    let _ = s.squareroot_cell().set(result.clone());
    result
}

fn add_const(s: &Series, c: &Rational) -> Series {
    super::arithmetic::add_scalar(s, c)
}

/// `e^S`, defined only when `S₀ = 0`. Satisfies `E = I(E · D(S), 1)`; productive because
/// the integral's 0th coefficient is the constant `1`, independent of `E`'s own
/// coefficients.
pub fn exponential(s: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.exponential_cell().get() {
        return cached.clone();
    }
    let s0 = s.zero_of();
    let result = if !s0.is_zero() {
        Err(SeriesError::invalid_domain(
            "exponential",
            "constant term must be zero (S0 must equal 0)",
        ))
    } else {
        let d_s = derivative(s);
        let mut cursor = None;
        Ok(Series::self_referential(move |slot| {
            Box::new(move || {
                if cursor.is_none() {
                    let self_series = slot.get();
                    let integrand = mul(&self_series, &d_s);
                    let integrated = integral(&integrand, Rational::one());
                    cursor = Some(integrated.coeffs_cursor());
                }
                Some(cursor.as_mut().unwrap().next())
            })
        }))
    };
    let _ = s.exponential_cell().set(result.clone());
    result
}

/// `log(1 + S)`, defined only when `S₀ = 0`. `L = I(D(S) / (1 + S), 0)`. Not
/// self-referential: the integrand is built entirely from already-existing series.
pub fn logarithm(s: &Series) -> Result<Series, SeriesError> {
    if let Some(cached) = s.logarithm_cell().get() {
        return cached.clone();
    }
    let s0 = s.zero_of();
    let result = if !s0.is_zero() {
        Err(SeriesError::invalid_domain(
            "logarithm",
            "constant term must be zero (S0 must equal 0)",
        ))
    } else {
        let one_plus_s = add_const(s, &Rational::one());
        let recip = reciprocal(&one_plus_s)
            .expect("1 + S has constant term 1 != 0 by construction");
        let integrand = mul(&derivative(s), &recip);
        Ok(integral(&integrand, Rational::zero()))
    };
    let _ = s.logarithm_cell().set(result.clone());
    result
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
    fn reciprocal_of_zero_headed_series_is_invalid_domain() {
        let x = nthpower(1);
        let err = reciprocal(&x).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidDomain { operation: "reciprocal", .. }));
    }

    #[test]
    fn reciprocal_satisfies_s_times_recip_is_one() {
        let one = nthpower(0);
        let s = add_const(&nthpower(1), &r(1, 1)); // 1 + x
        let recip = reciprocal(&s).unwrap();
        let product = mul(&s, &recip);
        assert_eq!(product, one);
    }

    #[test]
    fn derivative_of_pure_powers() {
        for n in 1..6u64 {
            let d = derivative(&nthpower(n));
            let expected = scale(&nthpower(n - 1), &Rational::from_integers(n as i64, 1));
            assert_eq!(d, expected);
        }
    }

    #[test]
    fn integral_then_derivative_recovers_series() {
        let s = Series::from_fn(|n| r(n as i64 + 1, 1));
        let integrated = integral(&s, Rational::zero());
        let back = derivative(&integrated);
        assert_eq!(back, s);
    }

    #[test]
    fn compose_with_identity_is_self() {
        let x = nthpower(1);
        let s = Series::from_fn(|n| r(n as i64, 1));
        assert_eq!(compose(&s, &x).unwrap(), s);
    }

    #[test]
    fn compose_requires_zero_headed_argument() {
        let s = Series::from_fn(|n| r(n as i64, 1));
        let bad_arg = nthpower(0); // constant 1, not zero-headed
        let err = compose(&s, &bad_arg).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidDomain { operation: "compose", .. }));
    }

    #[test]
    fn inverse_of_x_is_x() {
        let x = nthpower(1);
        assert_eq!(inverse(&x).unwrap(), x);
    }

    #[test]
    fn inverse_round_trips() {
        let s = add(&nthpower(1), &scale(&nthpower(2), &r(3, 1))); // x + 3x^2
        let inv = inverse(&s).unwrap();
        let inv_inv = inverse(&inv).unwrap();
        assert_eq!(inv_inv, s);
        let x = nthpower(1);
        assert_eq!(compose(&s, &inv).unwrap(), x);
    }

    #[test]
    fn exponential_of_zero_is_one() {
        let one = nthpower(0);
        assert_eq!(exponential(&Series::empty()).unwrap(), one);
    }

    #[test]
    fn squareroot_squares_back_to_original() {
        let s = add_const(&nthpower(1), &r(4, 1)); // 4 + x
        let sq = squareroot(&s).unwrap();
        assert_eq!(mul(&sq, &sq), s);
    }
}
