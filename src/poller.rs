// src/poller.rs
//! `Poller` (C4): a fixed-capacity wrapper around the engine's native
//! `zmq_pollitem_t` array, for waiting on readiness across several sockets at
//! once without one thread per socket.
//!
//! Grounded on rust-zmq's `PollItem`/`poll()` pair for the operation surface,
//! and on the teacher's preference for explicit, non-resizing buffers
//! (closest analogue: `CircularBuffer`'s bounded-capacity allocation) for the
//! fixed-capacity array itself.

use crate::ffi::constants::PollEvents;
use crate::ffi::raw::zmq_pollitem_t;
use crate::socket::Socket;
use crate::{Error, Result};

/// Polls readiness across up to a fixed number of sockets. Single-thread
/// owner, like the sockets it polls (§5).
pub struct Poller<'a> {
    items: Vec<zmq_pollitem_t>,
    sockets: Vec<&'a Socket>,
    capacity: usize,
}

impl<'a> Poller<'a> {
    /// Creates a poller able to track up to `capacity` sockets. `capacity`
    /// must be at least 1.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "poller capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            items: Vec::with_capacity(capacity),
            sockets: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Registers `socket` for the requested `events`, returning its index for
    /// later use with [`Poller::update`]/[`Poller::is_readable`]/etc. Errors
    /// once `capacity` registrations are already held.
    pub fn add(&mut self, socket: &'a Socket, events: PollEvents) -> Result<usize> {
        if self.items.len() >= self.capacity {
            return Err(Error::InvalidArgument(format!(
                "poller is already at capacity {}",
                self.capacity
            )));
        }
        self.items.push(zmq_pollitem_t {
            socket: socket.raw_handle(),
            fd: 0,
            events: events.bits(),
            revents: 0,
        });
        self.sockets.push(socket);
        Ok(self.items.len() - 1)
    }

    /// Changes the requested events for an already-registered index.
    pub fn update(&mut self, index: usize, events: PollEvents) -> Result<()> {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| Error::InvalidArgument(format!("no such poll index: {index}")))?;
        item.events = events.bits();
        Ok(())
    }

    /// Blocks up to `timeout_ms` (negative: forever) waiting for any
    /// registered socket to become ready, returning the number of sockets
    /// with at least one ready bit set.
    pub fn poll(&mut self, timeout_ms: i64) -> Result<i32> {
        crate::ffi::poll(&mut self.items, timeout_ms)
    }

    pub fn is_readable(&self, index: usize) -> bool {
        self.revents(index) & PollEvents::POLLIN.bits() != 0
    }

    pub fn is_writable(&self, index: usize) -> bool {
        self.revents(index) & PollEvents::POLLOUT.bits() != 0
    }

    pub fn has_error(&self, index: usize) -> bool {
        self.revents(index) & PollEvents::POLLERR.bits() != 0
    }

    fn revents(&self, index: usize) -> i16 {
        self.items.get(index).map(|i| i.revents).unwrap_or(0)
    }

    /// Number of sockets currently registered.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every registration, without affecting the sockets themselves.
    pub fn clear(&mut self) {
        self.items.clear();
        self.sockets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(Poller::new(0).is_err());
    }

    #[test]
    fn add_beyond_capacity_errors() {
        let ctx = crate::context::Context::new().expect("engine must be linked for this test");
        let a = Socket::new(&ctx, crate::ffi::constants::SocketType::Pair).unwrap();
        let b = Socket::new(&ctx, crate::ffi::constants::SocketType::Pair).unwrap();
        let mut poller = Poller::new(1).unwrap();
        poller.add(&a, PollEvents::POLLIN).unwrap();
        assert!(poller.add(&b, PollEvents::POLLIN).is_err());
    }
}
