//! The convergence-controlled numerical evaluator (SPEC_FULL.md §4.6).
//!
//! `evaluate` sums a series at a point `x` either a fixed number of terms or adaptively,
//! stopping on convergence, a heuristic ratio-test divergence signal, or a term-count cap.

use crate::error::{DivergenceCause, SeriesError};
use crate::rational::Rational;
use crate::series::Series;

/// How [`evaluate`] should sum a series' terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalMode {
    /// Sum exactly `k` terms and return the partial sum unconditionally.
    Fixed(usize),
    /// Sum terms until convergence, divergence, or `n_max` terms have been consumed.
    Adaptive {
        /// Convergence threshold: stop once `|term| < epsilon * |partial sum|`.
        epsilon: Rational,
        /// Upper bound on terms summed before giving up without declaring divergence.
        n_max: usize,
        /// Consecutive ratio-test failures tolerated before divergence is declared.
        ratio_max: usize,
    },
    /// Convenience alias for [`EvalMode::Adaptive`] with `epsilon = 10^-d` and the default
    /// `n_max`/`ratio_max`.
    Figures(u32),
}

/// Default convergence threshold for [`EvalMode::Adaptive`] (1/10000).
pub const DEFAULT_EPSILON_NUM: i64 = 1;
/// Denominator half of [`DEFAULT_EPSILON_NUM`].
pub const DEFAULT_EPSILON_DEN: i64 = 10_000;
/// Default term cap for [`EvalMode::Adaptive`].
pub const DEFAULT_N_MAX: usize = 50;
/// Default consecutive-ratio-test-failure threshold for [`EvalMode::Adaptive`].
pub const DEFAULT_RATIO_MAX: usize = 5;

impl EvalMode {
    /// [`EvalMode::Adaptive`] with this crate's documented defaults.
    pub fn adaptive_default() -> EvalMode {
        EvalMode::Adaptive {
            epsilon: Rational::from_integers(DEFAULT_EPSILON_NUM, DEFAULT_EPSILON_DEN),
            n_max: DEFAULT_N_MAX,
            ratio_max: DEFAULT_RATIO_MAX,
        }
    }

    fn resolve(self) -> ResolvedMode {
        match self {
            EvalMode::Fixed(k) => ResolvedMode::Fixed(k),
            EvalMode::Adaptive { epsilon, n_max, ratio_max } => {
                ResolvedMode::Adaptive { epsilon, n_max, ratio_max }
            }
            EvalMode::Figures(d) => {
                let epsilon = Rational::one()
                    / (0..d).fold(Rational::one(), |acc, _| acc * Rational::from_integers(10, 1));
                ResolvedMode::Adaptive { epsilon, n_max: DEFAULT_N_MAX, ratio_max: DEFAULT_RATIO_MAX }
            }
        }
    }
}

enum ResolvedMode {
    Fixed(usize),
    Adaptive { epsilon: Rational, n_max: usize, ratio_max: usize },
}

/// A value `evaluate` can sum a series at: `i64`, `f64`, or [`Rational`] directly. `f64`
/// values are converted via [`Rational::from_f64_exact`], losing no precision.
pub trait EvalInput {
    /// Convert into the exact `Rational` the evaluator sums against.
    fn into_rational(self) -> Rational;
}

impl EvalInput for i64 {
    fn into_rational(self) -> Rational {
        Rational::from(self)
    }
}

impl EvalInput for f64 {
    fn into_rational(self) -> Rational {
        Rational::from_f64_exact(self)
    }
}

impl EvalInput for Rational {
    fn into_rational(self) -> Rational {
        self
    }
}

/// Evaluate `S(x)` under the given mode.
///
/// See SPEC_FULL.md §4.6 for the full algorithm. `Fixed(k)` always returns its partial sum
/// (this crate's `Rational` arithmetic is arbitrary-precision and cannot overflow, so the
/// "overflow surfaces as Divergence" clause of the distilled spec is vacuous for `Fixed`
/// mode; see DESIGN.md). `Adaptive`/`Figures` can return [`SeriesError::Divergence`].
pub fn evaluate(s: &Series, x: impl EvalInput, mode: EvalMode) -> Result<Rational, SeriesError> {
    let x = x.into_rational();
    match mode.resolve() {
        ResolvedMode::Fixed(k) => Ok(sum_fixed(s, &x, k)),
        ResolvedMode::Adaptive { epsilon, n_max, ratio_max } => {
            sum_adaptive(s, &x, &epsilon, n_max, ratio_max)
        }
    }
}

fn sum_fixed(s: &Series, x: &Rational, k: usize) -> Rational {
    let mut cursor = s.coeffs_cursor();
    let mut result = Rational::zero();
    let mut xt = Rational::one();
    for _ in 0..k {
        let term = cursor.next() * xt.clone();
        result = result + term;
        xt = xt * x.clone();
    }
    result
}

fn sum_adaptive(
    s: &Series,
    x: &Rational,
    epsilon: &Rational,
    n_max: usize,
    ratio_max: usize,
) -> Result<Rational, SeriesError> {
    let mut cursor = s.coeffs_cursor();
    let mut result = Rational::zero();
    let mut xt = Rational::one();
    let mut ratio_last: Option<Rational> = None;
    let mut ratio_count = 0usize;

    for n in 0..n_max {
        let coeff = cursor.next();
        let term = coeff * xt.clone();
        result = result + term.clone();

        if !term.is_zero() {
            let abs_term = term.abs();
            let abs_result = result.abs();
            if !abs_result.is_zero() && abs_term < epsilon.clone() * abs_result {
                return Ok(result);
            }

            if let Some(prev) = ratio_last.as_ref() {
                if !prev.is_zero() {
                    let ratio = (abs_term / prev.abs()).abs();
                    if ratio > Rational::one() {
                        ratio_count += 1;
                        if ratio_count > ratio_max {
                            tracing::warn!(
                                n,
                                term = %term,
                                cause = "ratio_test",
                                "series evaluation diverged"
                            );
                            return Err(SeriesError::Divergence {
                                cause: DivergenceCause::RatioTest,
                                terms_evaluated: n + 1,
                            });
                        }
                    } else {
                        ratio_count = 0;
                    }
                }
            }
            ratio_last = Some(term);
        }

        xt = xt * x.clone();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;

    fn r(n: i64, d: i64) -> Rational {
        Rational::from_integers(n, d)
    }

    #[test]
    fn fixed_mode_sums_exactly_k_terms() {
        let e = named::exp();
        let result = evaluate(&e, 1i64, EvalMode::Fixed(6)).unwrap();
        assert_eq!(result, r(163, 60));
    }

    #[test]
    fn adaptive_mode_converges_on_exp_of_one() {
        let e = named::exp();
        let result = evaluate(&e, 1i64, EvalMode::adaptive_default()).unwrap();
        let approx_e = 2.718281828459045_f64;
        let diff = (result.to_f64_lossy() - approx_e).abs();
        assert!(diff < 1e-3, "expected convergence near e, got {}", result);
    }

    #[test]
    fn adaptive_mode_reports_divergence_via_ratio_test() {
        // A series whose terms grow without bound (coefficient n! itself, via repeated
        // multiplication by n) evaluated at x = 1 diverges immediately.
        let mut n: i64 = 1;
        let growing = Series::from_fn(move |_| {
            let v = Rational::from_integers(n, 1);
            n *= 2;
            v
        });
        let err = evaluate(&growing, 1i64, EvalMode::adaptive_default()).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::Divergence { cause: DivergenceCause::RatioTest, .. }
        ));
    }

    #[test]
    fn figures_mode_is_an_adaptive_alias() {
        let e = named::exp();
        let result = evaluate(&e, 1i64, EvalMode::Figures(3)).unwrap();
        let approx_e = 2.718281828459045_f64;
        assert!((result.to_f64_lossy() - approx_e).abs() < 1e-2);
    }

    #[test]
    fn eval_input_accepts_i64_f64_and_rational() {
        let one = named::nthpower(0, Rational::one());
        assert_eq!(evaluate(&one, 2i64, EvalMode::Fixed(1)).unwrap(), Rational::one());
        assert_eq!(evaluate(&one, 2.5f64, EvalMode::Fixed(1)).unwrap(), Rational::one());
        assert_eq!(evaluate(&one, r(2, 1), EvalMode::Fixed(1)).unwrap(), Rational::one());
    }
}
