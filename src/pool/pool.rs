// src/pool/pool.rs
//! `MessagePool` (C3): the bucket-stack/fresh-allocation cascade that rents
//! and reclaims pooled messages. Grounded on the teacher's
//! `FastBufferPool::acquire` three-tier structure, collapsed to two tiers —
//! bucket hit, or fresh allocation — since the spec's pool has no
//! thread-local cache layer.

use super::bucket::Bucket;
use super::config::{bucket_for_size, PoolConfig, PrewarmConfig, BUCKET_SIZES};
use super::registry::{free_trampoline, RegistryEntry};
use super::stats::{PoolStatistics, PoolStatsInner};
use crate::message::{Message, PooledMessage, RegularMessage};
use crate::{Error, Result};
use std::sync::{Arc, OnceLock, Weak};

pub(crate) struct MessagePoolInner {
    buckets: Vec<Bucket>,
    stats: PoolStatsInner,
    self_weak: Weak<MessagePoolInner>,
}

impl MessagePoolInner {
    fn new(config: PoolConfig) -> Arc<Self> {
        Arc::new_cyclic(|self_weak| Self {
            buckets: BUCKET_SIZES
                .iter()
                .enumerate()
                .map(|(i, &size)| Bucket::new(size, config.max_buffers[i]))
                .collect(),
            stats: PoolStatsInner::default(),
            self_weak: self_weak.clone(),
        })
    }

    fn create_entry(&self, bucket_index: usize) -> Result<Arc<RegistryEntry>> {
        let entry = RegistryEntry::new(bucket_index, BUCKET_SIZES[bucket_index], self.self_weak.clone());
        let hint = RegistryEntry::hint_ptr(&entry);
        unsafe {
            crate::ffi::msg_init_data(
                entry.raw_ptr(),
                entry.data_ptr(),
                entry.buffer_size,
                free_trampoline,
                hint,
            )?;
        }
        Ok(entry)
    }

    fn rent(&self, size: usize) -> Result<Message> {
        let Some(bucket_index) = bucket_for_size(size) else {
            self.stats.record_miss();
            log::trace!("rent: size {size} not poolable, allocating a one-shot message");
            return Ok(Message::Regular(RegularMessage::with_size(size)?));
        };

        let bucket = &self.buckets[bucket_index];
        if let Some(entry) = bucket.try_pop() {
            entry.reset_for_reuse();
            self.stats.record_hit();
            log::trace!("rent: pool hit on bucket {bucket_index}");
            Ok(Message::Pooled(PooledMessage::from_entry(entry)))
        } else {
            let entry = self.create_entry(bucket_index)?;
            self.stats.record_miss();
            log::debug!("rent: pool miss on bucket {bucket_index}, allocated new pooled message");
            Ok(Message::Pooled(PooledMessage::from_entry(entry)))
        }
    }

    pub(crate) fn handle_return(&self, entry: Arc<RegistryEntry>) {
        let bucket_index = entry.bucket_index;
        match self.buckets[bucket_index].try_push(entry) {
            Ok(()) => {
                self.stats.record_return();
            }
            Err(entry) => {
                self.stats.record_return();
                self.stats.record_reject();
                log::debug!("bucket {bucket_index} at capacity, evicting returned message");
                entry.close_descriptor();
            }
        }
    }

    fn prewarm(&self, config: &PrewarmConfig) -> Result<()> {
        for (bucket_index, &target) in config.counts.iter().enumerate() {
            let bucket = &self.buckets[bucket_index];
            let cap = bucket.max_buffers().min(target);
            while bucket.pooled_count() < cap {
                let entry = self.create_entry(bucket_index)?;
                if bucket.try_push(entry).is_err() {
                    break;
                }
            }
        }
        Ok(())
    }

    fn clear(&self) {
        for bucket in &self.buckets {
            for entry in bucket.drain() {
                entry.close_descriptor();
            }
        }
    }

    fn set_max_buffers(&self, bucket_index: usize, n: usize) -> Result<()> {
        if n == 0 {
            return Err(Error::InvalidArgument(
                "max_buffers must be at least 1".into(),
            ));
        }
        self.buckets
            .get(bucket_index)
            .ok_or_else(|| Error::InvalidArgument(format!("no such bucket: {bucket_index}")))?
            .set_max_buffers(n);
        Ok(())
    }

    fn stats(&self) -> PoolStatistics {
        self.stats.snapshot()
    }
}

/// A bucketed pool of reusable [`PooledMessage`]s (C3). Cheap to clone: every
/// clone shares the same underlying buckets.
#[derive(Clone)]
pub struct MessagePool {
    inner: Arc<MessagePoolInner>,
}

static SHARED: OnceLock<MessagePool> = OnceLock::new();

impl MessagePool {
    /// Builds a new, independent pool. Most applications should prefer
    /// [`MessagePool::shared`] unless isolation between subsystems is
    /// specifically needed (§4.3).
    pub fn new(config: PoolConfig) -> Self {
        Self {
            inner: MessagePoolInner::new(config),
        }
    }

    /// The process-wide singleton pool, built with [`PoolConfig::default`]
    /// on first use.
    pub fn shared() -> &'static MessagePool {
        SHARED.get_or_init(|| MessagePool::new(PoolConfig::default()))
    }

    /// Rents a message able to hold `size` bytes: a pooled message from the
    /// smallest fitting bucket, or a fresh one-shot message if `size` exceeds
    /// every bucket.
    pub fn rent(&self, size: usize) -> Result<Message> {
        self.inner.rent(size)
    }

    /// Rents a message sized to `data` and copies `data` into it.
    pub fn rent_with_bytes(&self, data: &[u8]) -> Result<Message> {
        let mut message = self.rent(data.len())?;
        match &mut message {
            Message::Regular(m) => m.data_mut()[..data.len()].copy_from_slice(data),
            Message::Pooled(m) => {
                m.data_mut()[..data.len()].copy_from_slice(data);
                m.set_actual_data_size(data.len())?;
            }
        }
        Ok(message)
    }

    /// Pre-populates buckets per `config`, bounded by each bucket's
    /// configured maximum.
    pub fn prewarm(&self, config: &PrewarmConfig) -> Result<()> {
        self.inner.prewarm(config)
    }

    /// Evicts every currently-pooled message, closing its descriptor and
    /// freeing its buffer. Messages currently rented out are unaffected and
    /// return normally afterwards (into an empty bucket, so they themselves
    /// become the next eviction candidate once the bucket refills to cap).
    pub fn clear(&self) {
        self.inner.clear()
    }

    /// Overrides the population cap for the bucket at `bucket_index`.
    /// Applies immediately to subsequent returns; does not evict buffers
    /// already pooled above a newly-lowered cap.
    pub fn set_max_buffers(&self, bucket_index: usize, n: usize) -> Result<()> {
        self.inner.set_max_buffers(bucket_index, n)
    }

    /// A snapshot of pool activity counters.
    pub fn stats(&self) -> PoolStatistics {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_poolable_size_allocates_regular_message() {
        let pool = MessagePool::new(PoolConfig::default());
        let msg = pool.rent(8 * 1024 * 1024).unwrap();
        assert!(matches!(msg, Message::Regular(_)));
        assert_eq!(pool.stats().pool_misses, 1);
        assert_eq!(pool.stats().pool_hits, 0);
    }

    #[test]
    fn pooled_rent_miss_then_hit_after_return() {
        let pool = MessagePool::new(PoolConfig::default());
        {
            let msg = pool.rent(100).unwrap();
            assert!(matches!(msg, Message::Pooled(_)));
        }
        assert_eq!(pool.stats().pool_misses, 1);
        assert_eq!(pool.stats().total_returns, 1);

        let msg = pool.rent(100).unwrap();
        assert!(matches!(msg, Message::Pooled(_)));
        assert_eq!(pool.stats().pool_hits, 1);
    }

    #[test]
    fn set_max_buffers_rejects_zero() {
        let pool = MessagePool::new(PoolConfig::default());
        assert!(pool.set_max_buffers(0, 0).is_err());
    }

    #[test]
    fn outstanding_is_zero_once_every_rented_message_drops() {
        let pool = MessagePool::new(PoolConfig::default());
        {
            let _a = pool.rent(64).unwrap();
            let _b = pool.rent(64).unwrap();
        }
        assert_eq!(pool.stats().outstanding(), 0);
    }
}
