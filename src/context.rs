// src/context.rs
//! `Context` (C2): the engine's I/O context, owned via an `Arc` so a
//! `Socket` can hold a cheap clone to keep it alive without duplicating the
//! underlying engine resource (§4.2: Socket holds a non-owning reference to
//! Context; Context must outlive every Socket built from it).
//!
//! Grounded on the teacher's reference-counted resource idiom
//! (`BufferPool`'s `Arc`-shared ownership, `ConnectionBuffers`'
//! `Drop`-based cleanup).

use crate::config::ContextConfig;
use crate::ffi::raw::zmq_ctx_t;
use crate::ffi::{self, constants::ContextOption};
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct ContextInner {
    handle: *mut zmq_ctx_t,
    disposed: AtomicBool,
}

// SAFETY: the engine's context handle is documented as safe to share and
// call concurrently from multiple threads; the only mutable local state here
// (`disposed`) is itself an atomic.
unsafe impl Send for ContextInner {}
unsafe impl Sync for ContextInner {}

impl Drop for ContextInner {
    fn drop(&mut self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            if let Err(err) = ffi::ctx_term(self.handle) {
                log::warn!("context termination failed: {err}");
            }
        }
    }
}

/// A handle to the engine's I/O context. Cheap to clone; every clone shares
/// the same underlying engine resource.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// A new context with [`ContextConfig::default`].
    pub fn new() -> Result<Self> {
        Self::with_config(ContextConfig::default())
    }

    /// A new context configured per `config`.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let handle = ffi::ctx_new()?;
        ffi::ctx_set(handle, ContextOption::IoThreads as i32, config.io_threads)?;
        ffi::ctx_set(handle, ContextOption::MaxSockets as i32, config.max_sockets)?;
        ffi::ctx_set(handle, ContextOption::Ipv6 as i32, config.ipv6 as i32)?;
        log::debug!(
            "context created: io_threads={}, max_sockets={}, ipv6={}",
            config.io_threads,
            config.max_sockets,
            config.ipv6
        );
        Ok(Self {
            inner: Arc::new(ContextInner {
                handle,
                disposed: AtomicBool::new(false),
            }),
        })
    }

    /// Interrupts any blocking calls currently in progress on sockets from
    /// this context; the context itself is only fully released once every
    /// socket and this handle's last clone are dropped.
    pub fn shutdown(&self) -> Result<()> {
        ffi::ctx_shutdown(self.inner.handle)
    }

    pub(crate) fn raw_handle(&self) -> *mut zmq_ctx_t {
        self.inner.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_constructs_and_terminates() {
        let ctx = Context::new().expect("engine must be linked for this test");
        drop(ctx);
    }

    #[test]
    fn clones_share_one_engine_context() {
        let ctx = Context::new().unwrap();
        let clone = ctx.clone();
        assert_eq!(ctx.raw_handle(), clone.raw_handle());
    }
}
