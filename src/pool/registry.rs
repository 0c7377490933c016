// src/pool/registry.rs
//! The GC-rooted registry backing pooled messages (§9): the engine's free
//! callback receives only a raw `hint` pointer, so whatever it points to must
//! be addressable and alive independent of wherever the Rust-level
//! [`PooledMessage`](crate::message::PooledMessage) handle currently lives
//! (rented out, sitting on a bucket stack, or mid-handoff between the two).
//!
//! This implementation roots each pooled descriptor's state in an
//! `Arc<RegistryEntry>`. The `hint` passed to `zmq_msg_init_data` is
//! `Arc::as_ptr(&entry)`: a stable address for the entry's entire lifetime,
//! since an `Arc`'s backing allocation never moves regardless of how many
//! handles reference it or how those handles are passed around. The registry
//! entry keeps a [`Weak`] self-reference (built via `Arc::new_cyclic`) so that
//! the trampoline — which only ever has the raw pointer — can recover a
//! proper owning `Arc` instead of reconstructing one unsafely.

use super::pool::MessagePoolInner;
use crate::ffi::raw::zmq_msg_t;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

pub(crate) struct RegistryEntry {
    raw: UnsafeCell<zmq_msg_t>,
    buffer: UnsafeCell<Box<[u8]>>,
    pub(crate) bucket_index: usize,
    pub(crate) buffer_size: usize,
    actual_data_size: AtomicUsize,
    pub(crate) callback_executed: AtomicBool,
    closed: AtomicBool,
    pub(crate) pool: Weak<MessagePoolInner>,
    self_weak: Weak<RegistryEntry>,
}

// SAFETY: all interior-mutable fields (`raw`, `buffer`) are accessed through
// exactly one live owner at a time by construction: either the bucket stack
// holds the entry (untouched) or a single `PooledMessage` does (the sole
// accessor), matching the Message Pool's documented thread-safety contract.
unsafe impl Send for RegistryEntry {}
unsafe impl Sync for RegistryEntry {}

impl RegistryEntry {
    pub(crate) fn new(
        bucket_index: usize,
        buffer_size: usize,
        pool: Weak<MessagePoolInner>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_weak| Self {
            raw: UnsafeCell::new(zmq_msg_t::uninit()),
            buffer: UnsafeCell::new(vec![0u8; buffer_size].into_boxed_slice()),
            bucket_index,
            buffer_size,
            actual_data_size: AtomicUsize::new(buffer_size),
            callback_executed: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            pool,
            self_weak: self_weak.clone(),
        })
    }

    /// Raw pointer to the engine descriptor, for `zmq_msg_*` calls.
    pub(crate) fn raw_ptr(&self) -> *mut zmq_msg_t {
        self.raw.get()
    }

    /// Raw pointer to the backing buffer, passed to `zmq_msg_init_data` and
    /// to raw `send`/`recv`.
    pub(crate) fn data_ptr(&self) -> *mut u8 {
        unsafe { (*self.buffer.get()).as_mut_ptr() }
    }

    /// The hint to register with `zmq_msg_init_data`: a stable address for
    /// this entry's entire reuse lifetime.
    pub(crate) fn hint_ptr(self_arc: &Arc<Self>) -> *mut std::ffi::c_void {
        Arc::as_ptr(self_arc) as *mut std::ffi::c_void
    }

    pub(crate) fn actual_data_size(&self) -> usize {
        self.actual_data_size.load(Ordering::Acquire)
    }

    pub(crate) fn set_actual_data_size(&self, n: usize) {
        self.actual_data_size.store(n, Ordering::Release);
    }

    /// Resets per-reuse flags to the state of a freshly-allocated pooled
    /// message, per the Rent protocol's pool-hit step.
    pub(crate) fn reset_for_reuse(&self) {
        self.actual_data_size.store(self.buffer_size, Ordering::Release);
        self.callback_executed.store(false, Ordering::Release);
    }

    /// Closes the engine descriptor exactly once, for final pool eviction.
    pub(crate) fn close_descriptor(&self) {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _ = crate::ffi::msg_close(self.raw_ptr());
        }
    }
}

impl Drop for RegistryEntry {
    fn drop(&mut self) {
        // Safety net: if an entry is ever deallocated without going through
        // `MessagePoolInner::dispose_entry` (e.g. a bug in a future code path,
        // or a `clear()` that raced with an in-flight drop), make sure the
        // engine descriptor is still closed rather than leaking engine state.
        if !self.closed.load(Ordering::Acquire) {
            log::warn!("pooled message registry entry dropped without explicit disposal");
            self.close_descriptor();
        }
    }
}

/// The free callback registered with every pooled message's descriptor.
/// Invoked by the engine (or, in practice, by our own explicit `msg_close`
/// during eviction) with the `hint` recorded at `zmq_msg_init_data` time.
///
/// Must never unwind across the ABI boundary (§9): a panic here is caught and
/// swallowed.
pub(crate) unsafe extern "C" fn free_trampoline(
    _data: *mut std::ffi::c_void,
    hint: *mut std::ffi::c_void,
) {
    let outcome = std::panic::catch_unwind(|| {
        let entry_ref = unsafe { &*(hint as *const RegistryEntry) };
        if entry_ref
            .callback_executed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            if let (Some(entry), Some(pool)) =
                (entry_ref.self_weak.upgrade(), entry_ref.pool.upgrade())
            {
                pool.handle_return(entry);
            }
        }
    });
    if outcome.is_err() {
        log::error!("panic inside pooled message free trampoline; swallowed at the ABI boundary");
    }
}
