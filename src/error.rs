//! Error taxonomy for series construction and evaluation.
//!
//! See SPEC_FULL.md §7. Every [`SeriesError::InvalidDomain`] is raised synchronously at the
//! point the offending operation is constructed; every [`SeriesError::Divergence`] is raised
//! only from [`crate::eval::evaluate`].

use thiserror::Error;

/// Errors raised by series construction or numerical evaluation.
#[derive(Debug, Clone, Error)]
pub enum SeriesError {
    /// A precondition on a constructor or operation failed (e.g. reciprocal of a
    /// zero-headed series, composition with a nonzero-headed argument).
    #[error("invalid domain for `{operation}`: {reason}")]
    InvalidDomain {
        /// Name of the operation whose precondition failed.
        operation: &'static str,
        /// Human-readable description of which precondition failed.
        reason: String,
    },

    /// Adaptive evaluation failed to converge.
    #[error("series evaluation diverged after {terms_evaluated} terms ({cause})")]
    Divergence {
        /// Why divergence was declared.
        cause: DivergenceCause,
        /// How many terms had been consumed when divergence was declared.
        terms_evaluated: usize,
    },
}

/// Why [`SeriesError::Divergence`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DivergenceCause {
    /// The absolute ratio of successive terms exceeded 1 more than `ratio_max` times in a
    /// row, the heuristic divergence signal of SPEC_FULL §4.6.
    #[error("ratio test failed")]
    RatioTest,
    /// Reserved for numeric backends whose terms can overflow a fixed precision; unreachable
    /// with this crate's arbitrary-precision `Rational` (see SPEC_FULL §4.6 and DESIGN.md).
    #[error("arithmetic overflow")]
    Overflow,
}

impl SeriesError {
    pub(crate) fn invalid_domain(operation: &'static str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(operation, %reason, "series operation precondition violated");
        SeriesError::InvalidDomain { operation, reason }
    }
}
