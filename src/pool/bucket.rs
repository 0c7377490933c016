// src/pool/bucket.rs
//! A single size-class bucket: a lock-free stack of pooled registry entries
//! bounded by a runtime-mutable population cap.
//!
//! Grounded on the teacher's `pool::fast::LockFreeQueue` (a `SegQueue` paired
//! with an approximate `AtomicUsize` length) — the same push/pop/len shape,
//! without the thread-local cache tier the spec's pool has no room for.

use super::registry::RegistryEntry;
use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub(crate) struct Bucket {
    pub(crate) size: usize,
    stack: SegQueue<Arc<RegistryEntry>>,
    pooled_count: AtomicUsize,
    max_buffers: AtomicUsize,
}

impl Bucket {
    pub(crate) fn new(size: usize, max_buffers: usize) -> Self {
        Self {
            size,
            stack: SegQueue::new(),
            pooled_count: AtomicUsize::new(0),
            max_buffers: AtomicUsize::new(max_buffers),
        }
    }

    pub(crate) fn try_pop(&self) -> Option<Arc<RegistryEntry>> {
        let entry = self.stack.pop();
        if entry.is_some() {
            self.pooled_count.fetch_sub(1, Ordering::Relaxed);
        }
        entry
    }

    /// Attempts to push `entry` back onto this bucket's stack. On failure
    /// (bucket already at its configured cap) hands `entry` back to the
    /// caller, which evicts it instead.
    pub(crate) fn try_push(&self, entry: Arc<RegistryEntry>) -> Result<(), Arc<RegistryEntry>> {
        if self.pooled_count.fetch_add(1, Ordering::AcqRel) < self.max_buffers.load(Ordering::Acquire) {
            self.stack.push(entry);
            Ok(())
        } else {
            self.pooled_count.fetch_sub(1, Ordering::Release);
            Err(entry)
        }
    }

    pub(crate) fn pooled_count(&self) -> usize {
        self.pooled_count.load(Ordering::Relaxed)
    }

    pub(crate) fn max_buffers(&self) -> usize {
        self.max_buffers.load(Ordering::Relaxed)
    }

    pub(crate) fn set_max_buffers(&self, n: usize) {
        self.max_buffers.store(n, Ordering::Release);
    }

    /// Drains every pooled entry, for `MessagePool::clear`.
    pub(crate) fn drain(&self) -> Vec<Arc<RegistryEntry>> {
        let mut drained = Vec::with_capacity(self.pooled_count());
        while let Some(entry) = self.stack.pop() {
            self.pooled_count.fetch_sub(1, Ordering::Relaxed);
            drained.push(entry);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Weak;

    fn entry(bucket_index: usize, size: usize) -> Arc<RegistryEntry> {
        RegistryEntry::new(bucket_index, size, Weak::new())
    }

    #[test]
    fn push_respects_cap_and_pop_restores_room() {
        let bucket = Bucket::new(64, 2);
        assert!(bucket.try_push(entry(0, 64)).is_ok());
        assert!(bucket.try_push(entry(0, 64)).is_ok());
        assert!(bucket.try_push(entry(0, 64)).is_err());
        assert_eq!(bucket.pooled_count(), 2);

        assert!(bucket.try_pop().is_some());
        assert_eq!(bucket.pooled_count(), 1);
        assert!(bucket.try_push(entry(0, 64)).is_ok());
    }

    #[test]
    fn lowering_cap_does_not_evict_existing_entries() {
        let bucket = Bucket::new(64, 4);
        for _ in 0..3 {
            assert!(bucket.try_push(entry(0, 64)).is_ok());
        }
        bucket.set_max_buffers(1);
        assert_eq!(bucket.pooled_count(), 3);
        assert!(bucket.try_push(entry(0, 64)).is_err());
    }
}
