// src/async_poll.rs
//! Thin, synchronous-underneath "async" helpers (C5): attempt a non-blocking
//! operation first, and on `EAGAIN` park on a short poll before retrying,
//! rather than spinning tight or blocking forever on the engine call itself.
//!
//! No direct teacher analogue (the teacher is synchronous throughout); the
//! loop/backoff shape is original to this crate's messaging domain, per
//! SPEC_FULL.md §4.4.

use crate::config::AsyncPollConfig;
use crate::ffi::constants::{PollEvents, SendFlags};
use crate::ffi::raw::zmq_pollitem_t;
use crate::message::Message;
use crate::socket::Socket;
use crate::{Error, Result};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloneable flag a caller can use to interrupt an in-flight
/// `*_async` loop from another thread.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

thread_local! {
    // A single-slot poll-item buffer reused across `*_async` calls on this
    // thread, avoiding a fresh `Vec` allocation per retry iteration.
    static POLL_SLOT: RefCell<Vec<zmq_pollitem_t>> = RefCell::new(Vec::with_capacity(1));
}

fn poll_once(socket: &Socket, events: PollEvents, timeout_ms: i64) -> Result<bool> {
    POLL_SLOT.with(|slot| {
        let mut items = slot.borrow_mut();
        items.clear();
        items.push(zmq_pollitem_t {
            socket: socket.raw_handle(),
            fd: 0,
            events: events.bits(),
            revents: 0,
        });
        let ready = crate::ffi::poll(&mut items, timeout_ms)?;
        Ok(ready > 0 && items[0].revents & events.bits() != 0)
    })
}

/// Sends `message`, retrying on `EAGAIN` until it succeeds, `cancel` is
/// signalled, or a genuine (non-would-block) error occurs.
pub fn send_async(
    mut message: Message,
    socket: &Socket,
    cancel: &CancellationToken,
    config: &AsyncPollConfig,
) -> Result<()> {
    loop {
        match message.send(socket, SendFlags::DONT_WAIT.bits()) {
            Ok(()) => return Ok(()),
            Err((returned, err)) if err.is_would_block() => {
                message = returned;
                park_or_cancel(socket, PollEvents::POLLOUT, cancel, config)?;
            }
            Err((_, err)) => return Err(err),
        }
    }
}

/// Receives a message, retrying on `EAGAIN` until one arrives, `cancel` is
/// signalled, or a genuine error occurs.
pub fn recv_async(socket: &Socket, cancel: &CancellationToken, config: &AsyncPollConfig) -> Result<Message> {
    loop {
        match socket.recv_msg(SendFlags::DONT_WAIT.bits()) {
            Ok(message) => return Ok(message),
            Err(err) if err.is_would_block() => {
                park_or_cancel(socket, PollEvents::POLLIN, cancel, config)?;
            }
            Err(err) => return Err(err),
        }
    }
}

fn park_or_cancel(
    socket: &Socket,
    events: PollEvents,
    cancel: &CancellationToken,
    config: &AsyncPollConfig,
) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let became_ready = poll_once(socket, events, config.poll_interval.as_millis() as i64)?;
    if !became_ready {
        std::thread::sleep(config.spin_backoff);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cloned_token_shares_cancellation_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
