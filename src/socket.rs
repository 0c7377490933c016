// src/socket.rs
//! `Socket` (C2 + C5): owns an engine socket handle, holds a non-owning
//! (Rust-lifetime-owning, engine-resource-non-owning) reference to its
//! [`Context`], and exposes the send/recv surface.
//!
//! Grounded on the rust-zmq `Socket` type's bind/connect/send/recv/sockopt
//! surface, and on the teacher's `ConnectionBuffers` liveness-gating idiom
//! (`Drop`-guarded, `disposed`-checked entry points) for the resource
//! lifecycle.

use crate::context::Context;
use crate::ffi::raw::zmq_socket_t;
use crate::ffi::{self, constants::MonitorEvents, constants::SocketOption, constants::SocketType};
use crate::message::Message;
use crate::pool::MessagePool;
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};

/// A single-thread-owned engine socket. Not [`Sync`]: the engine's own
/// concurrency contract for a socket is "one thread at a time" (§5), and this
/// type does not add its own locking on top of that.
pub struct Socket {
    handle: *mut zmq_socket_t,
    context: Context,
    disposed: AtomicBool,
}

unsafe impl Send for Socket {}

impl Socket {
    /// Creates a socket of the given type on `context`. `context` is cloned
    /// (cheaply, via its internal `Arc`) to keep the engine context alive for
    /// at least as long as this socket.
    pub fn new(context: &Context, socket_type: SocketType) -> Result<Self> {
        let handle = ffi::socket_new(context.raw_handle(), socket_type as i32)?;
        Ok(Self {
            handle,
            context: context.clone(),
            disposed: AtomicBool::new(false),
        })
    }

    fn check_live(&self) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(Error::AlreadyDisposed);
        }
        Ok(())
    }

    pub fn bind(&self, endpoint: &str) -> Result<()> {
        self.check_live()?;
        ffi::socket_bind(self.handle, endpoint)?;
        log::debug!("bound to {endpoint}");
        Ok(())
    }

    pub fn connect(&self, endpoint: &str) -> Result<()> {
        self.check_live()?;
        ffi::socket_connect(self.handle, endpoint)?;
        log::debug!("connected to {endpoint}");
        Ok(())
    }

    pub fn unbind(&self, endpoint: &str) -> Result<()> {
        self.check_live()?;
        ffi::socket_unbind(self.handle, endpoint)
    }

    pub fn disconnect(&self, endpoint: &str) -> Result<()> {
        self.check_live()?;
        ffi::socket_disconnect(self.handle, endpoint)
    }

    /// Sends `data` via a raw (descriptor-bypassing) send, i.e. the native
    /// buffer is copied by the engine rather than handed off by reference.
    pub fn send(&self, data: &[u8], flags: i32) -> Result<usize> {
        self.check_live()?;
        ffi::send_raw(self.handle, data, flags)
    }

    /// Receives a frame into `buf` via a raw recv, truncating if the frame is
    /// larger than `buf`.
    pub fn recv(&self, buf: &mut [u8], flags: i32) -> Result<usize> {
        self.check_live()?;
        ffi::recv_raw(self.handle, buf, flags)
    }

    /// Sends `message`, consuming it on success. On failure the original
    /// message is dropped here along with the error; use [`Message::send`]
    /// directly when a failed send (e.g. `EAGAIN`) needs to be retried
    /// without losing the message.
    pub fn send_msg(&self, message: Message, flags: i32) -> Result<()> {
        self.check_live()?;
        message.send(self, flags).map_err(|(_, err)| err)
    }

    /// Receives a frame into a fresh one-shot [`Message`].
    pub fn recv_msg(&self, flags: i32) -> Result<Message> {
        self.check_live()?;
        let mut regular = crate::message::RegularMessage::new()?;
        regular.recv(self, flags)?;
        Ok(Message::Regular(regular))
    }

    /// Rents a pooled message from `pool` sized for `size_hint` bytes and
    /// receives a frame directly into its backing buffer.
    pub fn recv_with_pool(&self, pool: &MessagePool, size_hint: usize, flags: i32) -> Result<Message> {
        self.check_live()?;
        match pool.rent(size_hint)? {
            Message::Pooled(mut pooled) => {
                pooled.recv(self, flags)?;
                Ok(Message::Pooled(pooled))
            }
            Message::Regular(mut regular) => {
                regular.recv(self, flags)?;
                Ok(Message::Regular(regular))
            }
        }
    }

    /// Whether another frame of the currently-received logical message
    /// follows (`ZMQ_RCVMORE`).
    pub fn has_more(&self) -> Result<bool> {
        self.check_live()?;
        Ok(ffi::getsockopt_int(self.handle, SocketOption::RcvMore as i32)? != 0)
    }

    pub fn set_linger(&self, millis: i32) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_int(self.handle, SocketOption::Linger as i32, millis)
    }

    pub fn set_rcv_timeout(&self, millis: i32) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_int(self.handle, SocketOption::RcvTimeo as i32, millis)
    }

    pub fn set_snd_timeout(&self, millis: i32) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_int(self.handle, SocketOption::SndTimeo as i32, millis)
    }

    pub fn set_snd_hwm(&self, count: i32) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_int(self.handle, SocketOption::SndHwm as i32, count)
    }

    pub fn set_rcv_hwm(&self, count: i32) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_int(self.handle, SocketOption::RcvHwm as i32, count)
    }

    pub fn set_routing_id(&self, id: &[u8]) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_bytes(self.handle, SocketOption::RoutingId as i32, id)
    }

    pub fn routing_id(&self) -> Result<Vec<u8>> {
        self.check_live()?;
        ffi::getsockopt_bytes(self.handle, SocketOption::RoutingId as i32, 255)
    }

    pub fn subscribe(&self, topic: &[u8]) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_bytes(self.handle, SocketOption::Subscribe as i32, topic)
    }

    pub fn unsubscribe(&self, topic: &[u8]) -> Result<()> {
        self.check_live()?;
        ffi::setsockopt_bytes(self.handle, SocketOption::Unsubscribe as i32, topic)
    }

    /// The native file descriptor backing this socket (`ZMQ_FD`), for
    /// integrating with an external event loop.
    pub fn fd(&self) -> Result<i32> {
        self.check_live()?;
        ffi::getsockopt_int(self.handle, SocketOption::Fd as i32)
    }

    /// Attaches a monitor socket at `endpoint` (conventionally
    /// `inproc://...`) that emits the requested state-change `events`
    /// (`zmq_socket_monitor`). A separate PAIR socket connected to
    /// `endpoint` then reads them as ordinary two-frame messages.
    pub fn monitor(&self, endpoint: &str, events: MonitorEvents) -> Result<()> {
        self.check_live()?;
        ffi::socket_monitor(self.handle, endpoint, events.bits())?;
        log::debug!("monitor attached at {endpoint}");
        Ok(())
    }

    pub(crate) fn raw_handle(&self) -> *mut zmq_socket_t {
        self.handle
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        // `self.context` drops after this function returns, keeping the
        // engine context alive through `socket_close` below.
        if !self.disposed.swap(true, Ordering::AcqRel) {
            if let Err(err) = ffi::socket_close(self.handle) {
                log::warn!("socket close failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn disposed_socket_rejects_further_calls() {
        let ctx = Context::new().expect("engine must be linked for this test");
        let sock = Socket::new(&ctx, SocketType::Pair).unwrap();
        drop(sock);
    }

    #[test]
    fn monitor_attaches_without_error() {
        let ctx = Context::new().expect("engine must be linked for this test");
        let sock = Socket::new(&ctx, SocketType::Pair).unwrap();
        sock.monitor("inproc://zmq-pool-socket-monitor-test", MonitorEvents::ALL)
            .unwrap();
    }
}
