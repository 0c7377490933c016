// src/message/pooled.rs
//! Pooled messages: a descriptor initialised once at pool-population time,
//! reused across many rent/return cycles, and closed only when the pool
//! evicts it (§4.3).

use crate::pool::registry::RegistryEntry;
use crate::socket::Socket;
use crate::{Error, Result};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A message backed by a pool-owned, reused native buffer.
///
/// `0 <= actual_data_size <= buffer_size` always holds; `buffer_size` is
/// fixed at the owning bucket's size for the descriptor's entire reuse
/// lifetime.
pub struct PooledMessage {
    entry: Arc<RegistryEntry>,
    more: bool,
    disposed: bool,
}

impl PooledMessage {
    pub(crate) fn from_entry(entry: Arc<RegistryEntry>) -> Self {
        Self {
            entry,
            more: false,
            disposed: false,
        }
    }

    /// Read-only view of the payload (`0..actual_data_size`).
    pub fn data(&self) -> &[u8] {
        let len = self.entry.actual_data_size();
        unsafe { std::slice::from_raw_parts(self.entry.data_ptr(), len) }
    }

    /// Mutable view of the whole backing buffer (`0..buffer_size`), for
    /// filling before [`PooledMessage::set_actual_data_size`].
    pub fn data_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.entry.data_ptr(), self.entry.buffer_size) }
    }

    /// Number of valid payload bytes.
    pub fn actual_data_size(&self) -> usize {
        self.entry.actual_data_size()
    }

    /// The owning bucket's fixed buffer size.
    pub fn buffer_size(&self) -> usize {
        self.entry.buffer_size
    }

    /// Records how many of the buffer's bytes are valid payload. Errors if
    /// `n` exceeds [`PooledMessage::buffer_size`].
    pub fn set_actual_data_size(&mut self, n: usize) -> Result<()> {
        if n > self.entry.buffer_size {
            return Err(Error::InvalidArgument(format!(
                "actual_data_size {n} exceeds buffer_size {}",
                self.entry.buffer_size
            )));
        }
        self.entry.set_actual_data_size(n);
        Ok(())
    }

    /// Whether another frame of the current logical message follows. For
    /// pooled messages this reflects the socket's `rcvmore` option at receive
    /// time, since pooled receives bypass the engine's own descriptor-level
    /// more-bit tracking (§4.4's send/recv divergence).
    pub fn more(&self) -> bool {
        self.more
    }

    pub(crate) fn set_more(&mut self, more: bool) {
        self.more = more;
    }

    /// Sends the valid payload bytes via a raw (descriptor-bypassing) send,
    /// then returns this message to its pool. Raw send does not fire the
    /// engine's msg-level callback, so the return is invoked manually here
    /// rather than relying on the registered free callback.
    ///
    /// On failure (e.g. `EAGAIN` under `DONT_WAIT`) nothing was transmitted,
    /// so `self` is handed back alongside the error rather than being
    /// returned to the pool — the caller can retry the same message.
    pub fn send(mut self, socket: &Socket, flags: i32) -> std::result::Result<(), (Self, Error)> {
        let len = self.entry.actual_data_size();
        let data = unsafe { std::slice::from_raw_parts(self.entry.data_ptr(), len) };
        match crate::ffi::send_raw(socket.raw_handle(), data, flags) {
            Ok(_) => {
                log::trace!("pooled message sent via raw send, returning to pool");
                self.return_to_pool();
                Ok(())
            }
            Err(err) => Err((self, err)),
        }
    }

    /// Receives a frame from `socket` directly into the backing buffer via a
    /// raw (descriptor-bypassing) recv, truncating if the frame is larger
    /// than this bucket's buffer.
    pub fn recv(&mut self, socket: &Socket, flags: i32) -> Result<usize> {
        let buffer_size = self.entry.buffer_size;
        let buf = unsafe { std::slice::from_raw_parts_mut(self.entry.data_ptr(), buffer_size) };
        let n = crate::ffi::recv_raw(socket.raw_handle(), buf, flags)?;
        self.entry.set_actual_data_size(n);
        self.more = socket.has_more()?;
        Ok(n)
    }

    fn return_to_pool(&mut self) {
        self.disposed = true;
        if self
            .entry
            .callback_executed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            if let Some(pool) = self.entry.pool.upgrade() {
                pool.handle_return(Arc::clone(&self.entry));
            }
        }
    }
}

impl Drop for PooledMessage {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        self.return_to_pool();
    }
}
