// src/message/mod.rs
//! The message data model (§3): two disjoint representations — a
//! pool-reused [`PooledMessage`] and a one-shot [`RegularMessage`] — sharing
//! one public surface through the [`Message`] enum.
//!
//! The split is grounded on the teacher's `BufferPool`/`FastBufferPool` split
//! (`pool::standard` vs `pool::fast`: a simple pool and a lock-free
//! reuse-oriented pool living side by side for different performance
//! profiles); the registered-descriptor-reused-once design underneath
//! `PooledMessage` is grounded on the engine's own `Message` type pattern
//! (`zmq_msg_init_data` + a `Drop` that calls `zmq_msg_close`).

mod pooled;
mod regular;

pub use pooled::PooledMessage;
pub use regular::RegularMessage;

use crate::socket::Socket;
use crate::Result;

/// Either representation a caller can send or receive through a [`Socket`].
pub enum Message {
    /// A one-shot, non-pooled message.
    Regular(RegularMessage),
    /// A message backed by a reused pool buffer.
    Pooled(PooledMessage),
}

impl Message {
    /// Whether this message is backed by the pool rather than a one-shot
    /// allocation.
    pub fn is_pooled(&self) -> bool {
        matches!(self, Message::Pooled(_))
    }

    /// Read-only view of the message's valid payload bytes.
    pub fn data(&self) -> Result<&[u8]> {
        match self {
            Message::Regular(m) => m.data(),
            Message::Pooled(m) => Ok(m.data()),
        }
    }

    /// Number of valid payload bytes.
    pub fn size(&self) -> usize {
        match self {
            Message::Regular(m) => m.size(),
            Message::Pooled(m) => m.actual_data_size(),
        }
    }

    /// Whether another frame of the current logical message follows.
    pub fn more(&self) -> bool {
        match self {
            Message::Regular(m) => m.more(),
            Message::Pooled(m) => m.more(),
        }
    }

    /// Sends this message. On success it is consumed; on failure it is
    /// handed back alongside the error so the caller can retry (e.g. after
    /// `EAGAIN`), matching the per-variant `send` contract.
    pub fn send(self, socket: &Socket, flags: i32) -> std::result::Result<(), (Message, crate::Error)> {
        match self {
            Message::Regular(m) => m.send(socket, flags).map_err(|(m, e)| (Message::Regular(m), e)),
            Message::Pooled(m) => m.send(socket, flags).map_err(|(m, e)| (Message::Pooled(m), e)),
        }
    }
}

impl From<RegularMessage> for Message {
    fn from(m: RegularMessage) -> Self {
        Message::Regular(m)
    }
}

impl From<PooledMessage> for Message {
    fn from(m: PooledMessage) -> Self {
        Message::Pooled(m)
    }
}
