//! Formal power series: a lazy, memoized, demand-driven coefficient stream plus the
//! algebra built on top of it.
//!
//! A [`Series`] is a cheap-to-clone handle (an `Rc`) onto a [`MemoStream`] of [`Rational`]
//! coefficients, conceptually extended with an infinite trailing tail of zeros so every
//! series presents an infinite coefficient view regardless of how its backing stream was
//! built. Derived views (structural, arithmetic, analytic) are memoized on the owning
//! `Series` so that repeated queries — and repeated sub-expressions inside a larger
//! expression graph — never recompute a sub-series from scratch.
//!
//! Invariants:
//! - The zeroth coefficient is well-defined for every `Series`.
//! - Derived views, once computed, are the unique object returned for the same request
//!   (unary views via `OnceCell`, binary/parametrized views via an append-only memo map
//!   keyed by the other operand's [`SeriesId`] or, for [`Series::integral`], by the
//!   constant itself).
//! - The coefficient sequence is deterministic: two queries for coefficient `n` return
//!   identical `Rational`s.

pub mod analytic;
pub mod arithmetic;
mod display;

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::error::SeriesError;
use crate::rational::Rational;
use crate::stream::MemoStream;

/// A process-unique token identifying a `Series` instance, used only as a memo-table key.
/// It has no bearing on value equality — see the module-level and `Series::eq_to` docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

fn next_series_id() -> SeriesId {
    thread_local! {
        static COUNTER: Cell<u64> = const { Cell::new(0) };
    }
    COUNTER.with(|c| {
        let id = c.get();
        c.set(id + 1);
        SeriesId(id)
    })
}

struct SeriesInner {
    id: SeriesId,
    coeffs: MemoStream<Rational>,

    zero: OnceCell<Rational>,
    head: OnceCell<Series>,
    tail: OnceCell<Series>,
    xmul: OnceCell<Series>,
    derivative: OnceCell<Series>,
    reciprocal: OnceCell<Result<Series, SeriesError>>,
    inverse: OnceCell<Result<Series, SeriesError>>,
    squareroot: OnceCell<Result<Series, SeriesError>>,
    exponential: OnceCell<Result<Series, SeriesError>>,
    logarithm: OnceCell<Result<Series, SeriesError>>,

    add_memo: RefCell<FxHashMap<SeriesId, Series>>,
    mul_memo: RefCell<FxHashMap<SeriesId, Series>>,
    compose_memo: RefCell<FxHashMap<SeriesId, Result<Series, SeriesError>>>,
    integral_memo: RefCell<FxHashMap<Rational, Series>>,
}

/// A formal power series: the lazy sequence of its rational coefficients.
#[derive(Clone)]
pub struct Series {
    inner: Rc<SeriesInner>,
}

/// Default number of coefficients compared by [`Series`]'s `PartialEq` impl.
pub const PREFIX_EQ_LEN: usize = 10;

/// An independent read position over a `Series`'s infinite coefficient view. Reading past
/// the end of the backing stream yields `Rational::zero()` forever — this is where the
/// "infinite trailing tail of zeros" of SPEC_FULL §2/§3 is actually realized.
pub struct Cursor {
    inner: crate::stream::Cursor<Rational>,
    exhausted: bool,
}

impl Cursor {
    /// Read the next coefficient and advance.
    pub fn next(&mut self) -> Rational {
        if self.exhausted {
            return Rational::zero();
        }
        match self.inner.next() {
            Some(value) => value,
            None => {
                self.exhausted = true;
                Rational::zero()
            }
        }
    }
}

impl Series {
    fn from_stream(coeffs: MemoStream<Rational>) -> Series {
        Series {
            inner: Rc::new(SeriesInner {
                id: next_series_id(),
                coeffs,
                zero: OnceCell::new(),
                head: OnceCell::new(),
                tail: OnceCell::new(),
                xmul: OnceCell::new(),
                derivative: OnceCell::new(),
                reciprocal: OnceCell::new(),
                inverse: OnceCell::new(),
                squareroot: OnceCell::new(),
                exponential: OnceCell::new(),
                logarithm: OnceCell::new(),
                add_memo: RefCell::new(FxHashMap::default()),
                mul_memo: RefCell::new(FxHashMap::default()),
                compose_memo: RefCell::new(FxHashMap::default()),
                integral_memo: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    /// Build a `Series` from a producer that may signal its own, genuine end of sequence by
    /// returning `None`; coefficients past that point read as zero (§3).
    pub fn from_producer(producer: impl FnMut() -> Option<Rational> + 'static) -> Series {
        Series::from_stream(MemoStream::from_producer(producer))
    }

    /// Build a `Series` from a producer that never itself terminates (used throughout the
    /// algebra engine, where "conceptually infinite" is always the right model for a
    /// derived series — see module docs).
    pub(crate) fn from_infinite_producer(mut producer: impl FnMut() -> Rational + 'static) -> Series {
        Series::from_producer(move || Some(producer()))
    }

    /// The empty series: every coefficient is zero.
    pub fn empty() -> Series {
        Series::from_stream(MemoStream::empty())
    }

    /// Build a `Series` from an index-to-coefficient function.
    pub fn from_fn(f: impl Fn(u64) -> Rational + 'static) -> Series {
        let mut n = 0u64;
        Series::from_infinite_producer(move || {
            let value = f(n);
            n += 1;
            value
        })
    }

    /// Build a finite `Series` from an explicit coefficient list; coefficients beyond the
    /// list read as zero.
    pub fn from_list(coeffs: Vec<Rational>) -> Series {
        Series::from_stream(MemoStream::from_vec(coeffs))
    }

    /// This series' process-unique identity token, used only for memo-table keys.
    pub fn id(&self) -> SeriesId {
        self.inner.id
    }

    /// Open an independent cursor over this series' infinite coefficient view.
    pub fn coeffs_cursor(&self) -> Cursor {
        Cursor { inner: self.inner.coeffs.open_cursor(), exhausted: false }
    }

    /// The zeroth coefficient, a₀.
    pub fn zero_of(&self) -> Rational {
        self.inner.zero.get_or_init(|| self.coeffs_cursor().next()).clone()
    }

    /// Coefficient of xⁿ.
    pub fn coefficient(&self, n: u64) -> Rational {
        let mut cursor = self.coeffs_cursor();
        let mut value = Rational::zero();
        for _ in 0..=n {
            value = cursor.next();
        }
        value
    }

    /// The first `k` coefficients, as a `Vec`.
    pub fn first_k(&self, k: usize) -> Vec<Rational> {
        let mut cursor = self.coeffs_cursor();
        (0..k).map(|_| cursor.next()).collect()
    }

    /// The series whose zeroth coefficient equals `zero_of(self)` and all others are 0.
    pub fn head(&self) -> Series {
        self.inner
            .head
            .get_or_init(|| Series::from_list(vec![self.zero_of()]))
            .clone()
    }

    /// The series whose nth coefficient equals this series' (n+1)th.
    pub fn tail(&self) -> Series {
        self.inner
            .tail
            .get_or_init(|| {
                let mut cursor = self.coeffs_cursor();
                let _ = cursor.next();
                Series::from_infinite_producer(move || cursor.next())
            })
            .clone()
    }

    /// The series whose 0th coefficient is 0 and whose (n+1)th equals this series' nth.
    pub fn xmul(&self) -> Series {
        self.inner
            .xmul
            .get_or_init(|| {
                let mut cursor = self.coeffs_cursor();
                let mut first = Some(Rational::zero());
                Series::from_infinite_producer(move || match first.take() {
                    Some(z) => z,
                    None => cursor.next(),
                })
            })
            .clone()
    }

    /// Compare the first `k` coefficients of `self` and `other` for equality.
    pub fn eq_to(&self, other: &Series, k: usize) -> bool {
        let mut a = self.coeffs_cursor();
        let mut b = other.coeffs_cursor();
        (0..k).all(|_| a.next() == b.next())
    }

    pub(crate) fn add_memo(&self) -> &RefCell<FxHashMap<SeriesId, Series>> {
        &self.inner.add_memo
    }

    pub(crate) fn mul_memo(&self) -> &RefCell<FxHashMap<SeriesId, Series>> {
        &self.inner.mul_memo
    }

    pub(crate) fn compose_memo(&self) -> &RefCell<FxHashMap<SeriesId, Result<Series, SeriesError>>> {
        &self.inner.compose_memo
    }

    pub(crate) fn integral_memo(&self) -> &RefCell<FxHashMap<Rational, Series>> {
        &self.inner.integral_memo
    }

    pub(crate) fn derivative_cell(&self) -> &OnceCell<Series> {
        &self.inner.derivative
    }

    pub(crate) fn reciprocal_cell(&self) -> &OnceCell<Result<Series, SeriesError>> {
        &self.inner.reciprocal
    }

    pub(crate) fn inverse_cell(&self) -> &OnceCell<Result<Series, SeriesError>> {
        &self.inner.inverse
    }

    pub(crate) fn squareroot_cell(&self) -> &OnceCell<Result<Series, SeriesError>> {
        &self.inner.squareroot
    }

    pub(crate) fn exponential_cell(&self) -> &OnceCell<Result<Series, SeriesError>> {
        &self.inner.exponential
    }

    pub(crate) fn logarithm_cell(&self) -> &OnceCell<Result<Series, SeriesError>> {
        &self.inner.logarithm
    }

    /// Construct a `Series` whose producer refers to the series being built, via a
    /// forward-declared [`SelfRef`] slot set once (right after the `Series` handle is
    /// created) and read an arbitrary number of times thereafter. This is how reciprocal,
    /// exponential, inverse, and square root express their self-referential recurrences —
    /// see SPEC_FULL.md §9. The slot holds only a `Weak` reference to the `Series` being
    /// built, not a strong one: a strong clone stored inside the producer closure that the
    /// `Series` itself owns (via its `MemoStream`) would close a strong reference cycle
    /// (`SeriesInner -> coeffs -> producer -> slot -> SeriesInner`) that nothing in this
    /// crate ever breaks, since these producers never signal exhaustion. `SelfRef::get`
    /// upgrades the `Weak` each time it's read, which only succeeds while some external
    /// handle (the caller's own clone of the `Series`, or a series derived from it) is still
    /// reachable — exactly the set of handles whose cache the caller is expected to be able
    /// to drop (SPEC_FULL §5).
    pub(crate) fn self_referential(
        build_producer: impl FnOnce(Rc<SelfRef>) -> Box<dyn FnMut() -> Option<Rational>>,
    ) -> Series {
        let slot = Rc::new(SelfRef::new());
        let producer = build_producer(Rc::clone(&slot));
        let series = Series::from_stream(MemoStream::from_producer(producer));
        slot.bind(&series);
        series
    }
}

/// A `Weak`-backed handle a self-referential producer uses to read the very `Series` it is
/// producing coefficients for, without keeping that `Series` alive on its own.
pub(crate) struct SelfRef {
    inner: OnceCell<Weak<SeriesInner>>,
}

impl SelfRef {
    fn new() -> Self {
        SelfRef { inner: OnceCell::new() }
    }

    fn bind(&self, series: &Series) {
        self.inner
            .set(Rc::downgrade(&series.inner))
            .ok()
            .expect("self-reference slot is bound exactly once");
    }

    /// Read the series being built.
    ///
    /// # Panics
    ///
    /// Panics if read before [`Series::self_referential`] has bound the slot (it always has,
    /// by the time any producer closure built from it can run), or if every external handle
    /// to the series has already been dropped — a productive self-referential producer is
    /// only ever invoked while the series it belongs to (or something derived from it) is
    /// still reachable.
    pub(crate) fn get(&self) -> Series {
        let weak = self.inner.get().expect("self-reference read before the slot was bound");
        let inner = weak
            .upgrade()
            .expect("self-referential series read after its last external handle was dropped");
        Series { inner }
    }
}

impl PartialEq for Series {
    /// Bounded prefix comparison (see module docs and SPEC_FULL §4.5): equal iff the first
    /// [`PREFIX_EQ_LEN`] coefficients match. This is an equivalence relation on the
    /// observable prefix, not mathematical series identity.
    fn eq(&self, other: &Self) -> bool {
        self.eq_to(other, PREFIX_EQ_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::from_integers(n, d)
    }

    #[test]
    fn head_tail_xmul_invariants() {
        let s = Series::from_list(vec![r(1, 1), r(2, 1), r(3, 1), r(4, 1)]);
        // S = head(S) + xmul(tail(S))
        let reconstructed = arithmetic::add(&s.head(), &s.tail().xmul());
        assert!(s.eq_to(&reconstructed, 6));
        // tail(xmul(S)) = S
        assert!(s.eq_to(&s.xmul().tail(), 6));
    }

    #[test]
    fn zero_of_is_cached() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let mut n = 0i64;
        let s = Series::from_producer(move || {
            calls2.set(calls2.get() + 1);
            let v = n;
            n += 1;
            Some(r(v, 1))
        });
        assert_eq!(s.zero_of(), r(0, 1));
        assert_eq!(s.zero_of(), r(0, 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn from_list_pads_with_zero() {
        let s = Series::from_list(vec![r(1, 1), r(2, 1)]);
        assert_eq!(s.coefficient(0), r(1, 1));
        assert_eq!(s.coefficient(1), r(2, 1));
        assert_eq!(s.coefficient(5), r(0, 1));
    }

    #[test]
    fn equality_is_bounded_prefix_comparison() {
        let a = Series::from_fn(|n| r(n as i64, 1));
        let b = Series::from_fn(|n| if n < 20 { r(n as i64, 1) } else { r(999, 1) });
        assert_eq!(a, b);
        assert!(!a.eq_to(&b, 25));
    }

    #[test]
    fn self_referential_producer_does_not_leak_a_strong_reference_cycle() {
        // 1 + x, so reciprocal is self-referential and productive from the first coefficient.
        let base = Series::from_list(vec![r(1, 1), r(1, 1)]);
        let s = analytic::reciprocal(&base).unwrap();

        // Drive the self-referential producer far enough that it actually reads the slot
        // (the head coefficient alone never does).
        let _ = s.first_k(4);

        assert_eq!(
            Rc::strong_count(&s.inner),
            1,
            "no strong reference to the series' own SeriesInner should outlive the call that\
             produced it, beyond this local handle"
        );
        let weak = Rc::downgrade(&s.inner);
        drop(s);
        assert!(
            weak.upgrade().is_none(),
            "SeriesInner leaked: something still holds a strong reference after the only \
             external handle was dropped"
        );
    }
}
