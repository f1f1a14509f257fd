//! A lazy, memoized, restartable sequence backed by a producer that yields once.
//!
//! Modeled on `examples/original_source/MemoizedGenerator.py`: a generator wrapped so that
//! even when "realized" (here: cursored) multiple times, each term is computed at most once
//! and shared across all cursors. Single-threaded (§5 of SPEC_FULL.md) — sharing is via
//! `Rc<RefCell<..>>`, not `Arc<Mutex<..>>`.
//!
//! Invariants upheld by [`MemoStream`]:
//! - `cache[0..n]` is exactly the first `n` values the producer has yielded.
//! - once `exhausted` is set, neither the cache contents nor its length change again.
//! - a value at index `i` is computed at most once across the stream's lifetime.

use std::cell::RefCell;
use std::rc::Rc;

type Producer<T> = Box<dyn FnMut() -> Option<T>>;

struct MemoStreamInner<T> {
    cache: Vec<T>,
    producer: Option<Producer<T>>,
}

/// A lazy, memoized, restartable sequence of `T`.
///
/// Cloning a `MemoStream` is cheap (an `Rc` clone) and shares the same cache: all clones and
/// all cursors opened from any of them observe the same values at the same indices.
pub struct MemoStream<T> {
    inner: Rc<RefCell<MemoStreamInner<T>>>,
}

impl<T> Clone for MemoStream<T> {
    fn clone(&self) -> Self {
        MemoStream { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Clone> MemoStream<T> {
    /// Build a stream from a producer closure. The closure is called at most once per index,
    /// yielding `Some(value)` to extend the cache or `None` to signal the stream is exhausted.
    pub fn from_producer(producer: impl FnMut() -> Option<T> + 'static) -> Self {
        MemoStream {
            inner: Rc::new(RefCell::new(MemoStreamInner {
                cache: Vec::new(),
                producer: Some(Box::new(producer)),
            })),
        }
    }

    /// Build a stream that immediately signals exhaustion (an empty sequence).
    pub fn empty() -> Self {
        MemoStream {
            inner: Rc::new(RefCell::new(MemoStreamInner { cache: Vec::new(), producer: None })),
        }
    }

    /// Build a stream from an already-known finite sequence of values.
    pub fn from_vec(values: Vec<T>) -> Self {
        MemoStream {
            inner: Rc::new(RefCell::new(MemoStreamInner { cache: values, producer: None })),
        }
    }

    /// Open an independent cursor positioned at index 0.
    pub fn open_cursor(&self) -> Cursor<T> {
        Cursor { stream: self.clone(), pos: 0 }
    }

    /// Read the value at index `n`, advancing the underlying producer as needed.
    /// Returns `None` if the stream is exhausted at or before `n`.
    pub fn get(&self, n: usize) -> Option<T> {
        let mut cursor = self.open_cursor();
        let mut last = None;
        for _ in 0..=n {
            last = cursor.next();
            if last.is_none() {
                return None;
            }
        }
        last
    }

    /// Number of cached values, if the producer has already signaled exhaustion;
    /// `None` if more values might still be forthcoming.
    pub fn len_if_exhausted(&self) -> Option<usize> {
        let inner = self.inner.borrow();
        if inner.producer.is_none() {
            Some(inner.cache.len())
        } else {
            None
        }
    }

    /// Ensure the cache holds at least `n` values (or is exhausted before reaching `n`).
    ///
    /// Deliberately does not hold the `RefCell` borrow across the call to `producer()`: a
    /// self-referential series' producer (reciprocal, exponential, sin, ...) reads earlier
    /// coefficients of this very stream while producing a later one, via a second `Cursor`
    /// over the same `MemoStream`. Holding the borrow here would make that reentrant read
    /// panic; taking the producer out, calling it with no borrow held, and putting it back
    /// is what makes the self-reference sound (the reentrant read only ever targets indices
    /// already in `cache`, which a productive recurrence guarantees).
    fn ensure(&self, n: usize) {
        loop {
            let have_enough_or_exhausted = {
                let inner = self.inner.borrow();
                inner.cache.len() > n || inner.producer.is_none()
            };
            if have_enough_or_exhausted {
                return;
            }
            let mut producer = self
                .inner
                .borrow_mut()
                .producer
                .take()
                .expect("producer presence was just checked above");
            let produced = producer();
            let mut inner = self.inner.borrow_mut();
            match produced {
                Some(value) => {
                    inner.cache.push(value);
                    inner.producer = Some(producer);
                }
                None => inner.producer = None,
            }
        }
    }
}

/// An independent position over a [`MemoStream`]. Advancing one cursor never affects any
/// other cursor over the same (or a cloned) stream.
pub struct Cursor<T> {
    stream: MemoStream<T>,
    pos: usize,
}

impl<T: Clone> Cursor<T> {
    /// Read the next value and advance, or return `None` if the stream is exhausted.
    pub fn next(&mut self) -> Option<T> {
        self.stream.ensure(self.pos);
        let inner = self.stream.inner.borrow();
        let value = inner.cache.get(self.pos).cloned();
        drop(inner);
        if value.is_some() {
            self.pos += 1;
        }
        value
    }
}
