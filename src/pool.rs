//! Array-pool-backed growable buffers for transient expectation sets.
//!
//! Every choice-point combinator (`Or`, `OneOf`, `Until`, `Assert`,
//! `RecoverWith`, ...) needs a private scratch buffer to collect the
//! expectations a branch produced, so it can merge or discard them without
//! polluting the caller's buffer. Almost every such buffer ends up holding
//! a handful of expectations at most, so the rented buffer itself is a
//! `SmallVec` inlined up to `INLINE_CAP` elements — the same small-buffer
//! shape `ProvableHQ-leo`'s AST nodes use for their rarely-more-than-one
//! child lists — with a capped free-list behind it so a pathological,
//! deeply-alternating grammar still can't make heap churn or pool growth
//! unbounded.

use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

/// Inline capacity before a rented buffer spills to the heap. Most
/// expectation sets at a single choice point are one or two entries.
const INLINE_CAP: usize = 4;

/// The buffer type rented from an [`ArrayPoolProvider`].
pub type RentedBuf<E> = SmallVec<[E; INLINE_CAP]>;

/// Source of rentable buffers for a single element type `E`.
///
/// Implementations must be thread-safe: parsers are shared across
/// threads, and two independent parses may rent from the same provider
/// concurrently (see the concurrency model in the crate docs).
pub trait ArrayPoolProvider<E>: Send + Sync {
    fn rent(&self) -> RentedBuf<E>;
    fn return_buf(&self, buf: RentedBuf<E>);
}

/// Default provider: a `Mutex`-guarded free-list capped at `MAX_FREE`
/// entries so a pathological grammar can't make the pool itself grow
/// without bound. Only buffers that spilled past `INLINE_CAP` are worth
/// keeping around; a buffer still fully inline is cheap to just drop and
/// rebuild.
pub struct DefaultArrayPool<E> {
    free: Mutex<Vec<RentedBuf<E>>>,
}

const MAX_FREE: usize = 64;

impl<E> DefaultArrayPool<E> {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }
}

impl<E> Default for DefaultArrayPool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send> ArrayPoolProvider<E> for DefaultArrayPool<E> {
    fn rent(&self) -> RentedBuf<E> {
        self.free
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop()
            .unwrap_or_default()
    }

    fn return_buf(&self, mut buf: RentedBuf<E>) {
        buf.clear();
        if !buf.spilled() {
            return;
        }
        let mut free = self.free.lock().unwrap_or_else(|p| p.into_inner());
        if free.len() < MAX_FREE {
            free.push(buf);
        }
    }
}

/// A growable buffer leased from an [`ArrayPoolProvider`].
///
/// Holds an `Arc` to its provider rather than borrowing it, so a
/// `PooledList` can be created and dropped freely inside a combinator's
/// `try_parse` without fighting the borrow checker over the
/// `ParseState` it was rented from. Returned to its provider
/// automatically on drop; not thread-safe on its own (it is meant to
/// live on one parser's call stack).
pub struct PooledList<E> {
    buf: RentedBuf<E>,
    provider: Arc<dyn ArrayPoolProvider<E>>,
}

impl<E> PooledList<E> {
    pub fn new(provider: Arc<dyn ArrayPoolProvider<E>>) -> Self {
        Self {
            buf: provider.rent(),
            provider,
        }
    }

    pub fn add(&mut self, item: E) {
        self.buf.push(item);
    }

    pub fn add_range(&mut self, items: impl IntoIterator<Item = E>) {
        self.buf.extend(items);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_slice(&self) -> &[E] {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Drains every item into `dest`, leaving this buffer empty.
    ///
    /// Used by `Or`-style combinators to merge a private child buffer
    /// into the caller's buffer without cloning.
    pub fn drain_into(&mut self, dest: &mut PooledList<E>) {
        dest.buf.extend(self.buf.drain(..));
    }

    pub fn into_vec(mut self) -> Vec<E> {
        std::mem::take(&mut self.buf).into_vec()
    }
}

impl<E> Drop for PooledList<E> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.provider.return_buf(buf);
    }
}

#[cfg(test)]
mod pool_tests;
