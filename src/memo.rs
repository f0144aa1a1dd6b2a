use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::Coord;
use crate::fenwick::Fenwick;

/// Reentrancy fence over a data source's metric cache.
///
/// While at least one [`MemoizationGuard`] is alive, cached metrics may be read but never
/// written: values that are not cached yet are computed and dropped. Guards nest, so a locked
/// query that triggers another locked query keeps the cache read-only until the outermost guard
/// goes away.
///
/// This is a single-threaded guard (`Cell`-based, `!Sync`), not a mutex.
#[derive(Debug, Default)]
pub struct MemoizationLock {
    depth: Cell<usize>,
}

impl MemoizationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> MemoizationGuard<'_> {
        self.depth.set(self.depth.get().saturating_add(1));
        MemoizationGuard { lock: self }
    }

    pub fn is_locked(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

/// Keeps a [`MemoizationLock`] held until dropped.
#[must_use = "the memoization lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MemoizationGuard<'a> {
    lock: &'a MemoizationLock,
}

impl Drop for MemoizationGuard<'_> {
    fn drop(&mut self) {
        let depth = self.lock.depth.get();
        debug_assert!(depth > 0, "memoization lock depth underflow");
        self.lock.depth.set(depth.saturating_sub(1));
    }
}

/// Lazily memoized slot sizes along one axis (rows or columns).
///
/// A slot is an item's size plus the separator preceding it. Slots are computed on demand by
/// the caller-supplied closure and cached unless the owning lock is held. Prefix sums come from
/// a Fenwick tree and are exact over the leading run of memoized slots (`prefix`); past that
/// run, sums are completed slot by slot.
#[derive(Debug)]
pub(crate) struct MemoizedAxis {
    inner: RefCell<AxisCache>,
}

#[derive(Debug)]
struct AxisCache {
    slots: Vec<Option<Coord>>,
    sums: Fenwick,
    prefix: usize,
    memoized: usize,
}

impl AxisCache {
    fn new(count: usize) -> Self {
        Self {
            slots: alloc::vec![None; count],
            sums: Fenwick::new(count),
            prefix: 0,
            memoized: 0,
        }
    }

    fn store(&mut self, index: usize, slot: Coord) {
        if self.slots[index].is_some() {
            return;
        }
        self.slots[index] = Some(slot);
        self.sums.add(index, slot.max(0) as i64);
        self.memoized += 1;
        while self.prefix < self.slots.len() && self.slots[self.prefix].is_some() {
            self.prefix += 1;
        }
    }
}

impl MemoizedAxis {
    pub(crate) fn new() -> Self {
        Self {
            inner: RefCell::new(AxisCache::new(0)),
        }
    }

    /// Drops every memoized slot if the item count changed.
    fn sync_count(&self, count: usize) {
        let mut cache = self.inner.borrow_mut();
        if cache.slots.len() != count {
            *cache = AxisCache::new(count);
        }
    }

    pub(crate) fn reset(&self, count: usize) {
        *self.inner.borrow_mut() = AxisCache::new(count);
    }

    pub(crate) fn invalidate(&self, index: usize) {
        let mut cache = self.inner.borrow_mut();
        let Some(previous) = cache.slots.get_mut(index).and_then(Option::take) else {
            return;
        };
        cache.sums.add(index, -(previous.max(0) as i64));
        cache.memoized -= 1;
        cache.prefix = cache.prefix.min(index);
    }

    pub(crate) fn is_memoized(&self, index: usize) -> bool {
        self.inner
            .borrow()
            .slots
            .get(index)
            .is_some_and(Option::is_some)
    }

    pub(crate) fn memoized_len(&self) -> usize {
        self.inner.borrow().memoized
    }

    pub(crate) fn slot(
        &self,
        count: usize,
        index: usize,
        locked: bool,
        compute: impl Fn(usize) -> Coord,
    ) -> Coord {
        self.sync_count(count);
        if index >= count {
            return 0;
        }
        if let Some(slot) = self.inner.borrow().slots.get(index).copied().flatten() {
            return slot;
        }
        let slot = compute(index);
        if !locked {
            self.inner.borrow_mut().store(index, slot);
        }
        slot
    }

    /// Sum of slots `0..index` (clamped to `count`). Negative slots count as zero.
    pub(crate) fn cumulated_before(
        &self,
        count: usize,
        index: usize,
        locked: bool,
        compute: impl Fn(usize) -> Coord,
    ) -> Coord {
        self.sync_count(count);
        let index = index.min(count);
        let (prefix, mut sum) = {
            let cache = self.inner.borrow();
            let prefix = cache.prefix.min(index);
            (prefix, cache.sums.prefix_sum(prefix) as Coord)
        };
        for i in prefix..index {
            // Negative slots count as empty, as in the Fenwick sums.
            sum = sum.saturating_add(self.slot(count, i, locked, &compute).max(0));
        }
        sum
    }

    /// Index of the item covering `offset`, clamped to the last item.
    pub(crate) fn index_after_cumulated(
        &self,
        count: usize,
        offset: Coord,
        locked: bool,
        compute: impl Fn(usize) -> Coord,
    ) -> usize {
        self.sync_count(count);
        if count == 0 || offset <= 0 {
            return 0;
        }
        let target = offset as u64;
        let (prefix, mut sum) = {
            let cache = self.inner.borrow();
            let covered = cache.sums.prefix_sum(cache.prefix);
            if target < covered {
                return cache.sums.lower_bound(target).min(count - 1);
            }
            (cache.prefix, covered)
        };
        for i in prefix..count {
            sum = sum.saturating_add(self.slot(count, i, locked, &compute).max(0) as u64);
            if sum > target {
                return i;
            }
        }
        count - 1
    }
}
