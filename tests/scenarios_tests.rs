//! Concrete coefficient/evaluation scenarios from SPEC_FULL.md §8.

use pseries::eval::{evaluate, EvalMode};
use pseries::{named, Rational};

fn r(n: i64, d: i64) -> Rational {
    Rational::from_integers(n, d)
}

#[test]
fn nthpower_scenarios() {
    assert_eq!(named::nthpower(0, Rational::one()).first_k(5), vec![r(1, 1), r(0, 1), r(0, 1), r(0, 1), r(0, 1)]);
    assert_eq!(named::nthpower(1, Rational::one()).first_k(5), vec![r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(0, 1)]);
    assert_eq!(named::nthpower(2, Rational::one()).first_k(5), vec![r(0, 1), r(0, 1), r(1, 1), r(0, 1), r(0, 1)]);
}

#[test]
fn exp_first_six_coefficients() {
    let expected = vec![r(1, 1), r(1, 1), r(1, 2), r(1, 6), r(1, 24), r(1, 120)];
    assert_eq!(named::exp().first_k(6), expected);
}

#[test]
fn sin_first_eight_coefficients() {
    let expected = vec![r(0, 1), r(1, 1), r(0, 1), r(-1, 6), r(0, 1), r(1, 120), r(0, 1), r(-1, 5040)];
    assert_eq!(named::sin().first_k(8), expected);
}

#[test]
fn tan_first_ten_coefficients() {
    let expected = vec![
        r(0, 1),
        r(1, 1),
        r(0, 1),
        r(1, 3),
        r(0, 1),
        r(2, 15),
        r(0, 1),
        r(17, 315),
        r(0, 1),
        r(62, 2835),
    ];
    assert_eq!(named::tan().first_k(10), expected);
}

#[test]
fn arctan_first_ten_coefficients() {
    let expected = vec![
        r(0, 1),
        r(1, 1),
        r(0, 1),
        r(-1, 3),
        r(0, 1),
        r(1, 5),
        r(0, 1),
        r(-1, 7),
        r(0, 1),
        r(1, 9),
    ];
    assert_eq!(named::arctan().first_k(10), expected);
}

#[test]
fn evaluate_exp_at_one_fixed_six_terms() {
    let result = evaluate(&named::exp(), 1i64, EvalMode::Fixed(6)).unwrap();
    assert_eq!(result, r(163, 60));
}

#[test]
fn evaluate_exp_at_one_converges_quickly_to_e() {
    let mode = EvalMode::Adaptive {
        epsilon: r(1, 10_000),
        n_max: 50,
        ratio_max: 5,
    };
    let result = evaluate(&named::exp(), 1i64, mode).unwrap();
    let e_f64 = std::f64::consts::E;
    assert!((result.to_f64_lossy() - e_f64).abs() < 1e-3);

    // Converges in fewer than 10 terms: Fixed(9) should already match the adaptive result
    // to within the same tolerance.
    let fixed_nine = evaluate(&named::exp(), 1i64, EvalMode::Fixed(9)).unwrap();
    assert!((fixed_nine.to_f64_lossy() - result.to_f64_lossy()).abs() < 1e-3);
}
