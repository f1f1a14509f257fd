//! Lazy formal power series over exact rationals, with a convergence-controlled numerical
//! evaluator.
//!
//! Coefficients are represented exactly (`rug`-backed [`Rational`]) and produced on demand
//! from a memoized, self-referential-capable coefficient stream ([`stream::MemoStream`]).
//! `Series` (§3–§4 of SPEC_FULL.md) provides the structural (`head`/`tail`/`xmul`),
//! arithmetic (`+`, `-`, `*`, `/`), and analytic (`compose`, `derivative`, `integral`,
//! `reciprocal`, `inverse`, `squareroot`, `exponential`, `logarithm`) operations; [`named`]
//! supplies the standard named series (exp, sin, cos, …) built purely from that algebra;
//! [`eval::evaluate`] sums a series numerically at a point under a chosen [`eval::EvalMode`].
//!
//! This crate is single-threaded by design: sharing is via `Rc`/`RefCell`, not
//! `Arc`/`Mutex` (see DESIGN.md's Open Question resolutions).

pub mod error;
pub mod eval;
pub mod named;
pub mod rational;
pub mod series;
pub mod stream;

pub use error::{DivergenceCause, SeriesError};
pub use eval::{evaluate, EvalInput, EvalMode};
pub use rational::Rational;
pub use series::{Series, PREFIX_EQ_LEN};
