// src/lib.rs
//! # zmq-pool
//!
//! Zero-copy, zero-allocation hot-path bindings over a ZeroMQ-style native
//! messaging engine.
//!
//! Features:
//! - A bucketed message pool (16 B-4 MiB, 19 size classes) that reuses
//!   native-heap buffers across many send/recv cycles instead of allocating
//!   one per message
//! - Scoped `Context`/`Socket` resource handles with deterministic,
//!   idempotent teardown
//! - A fixed-capacity `Poller` over several sockets at once
//! - `MultipartMessage` for ordered, SNDMORE/RCVMORE-framed sequences
//! - Thin non-blocking-first/poll-backoff helpers for cooperative async use
//!   without pulling in a runtime

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_safety_doc)]

pub mod async_poll;
pub mod config;
pub mod context;
pub mod error;
pub mod ffi;
pub mod message;
pub mod multipart;
pub mod pool;
pub mod poller;
pub mod socket;

pub use config::{AsyncPollConfig, ContextConfig};
pub use context::Context;
pub use error::{Error, Result};
pub use message::{Message, PooledMessage, RegularMessage};
pub use multipart::MultipartMessage;
pub use pool::{MessagePool, PoolConfig, PoolStatistics, PrewarmConfig};
pub use poller::Poller;
pub use socket::Socket;

/// Commonly used imports.
pub mod prelude {
    pub use crate::async_poll::{recv_async, send_async, CancellationToken};
    pub use crate::config::{AsyncPollConfig, ContextConfig};
    pub use crate::context::Context;
    pub use crate::error::{Error, Result};
    pub use crate::ffi::constants::{MessageProperty, MonitorEvents, PollEvents, SendFlags, SocketType};
    pub use crate::message::{Message, PooledMessage, RegularMessage};
    pub use crate::multipart::MultipartMessage;
    pub use crate::pool::{MessagePool, PoolConfig, PoolStatistics, PrewarmConfig};
    pub use crate::poller::Poller;
    pub use crate::socket::Socket;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn context() -> Context {
        Context::new().expect("engine must be linked for this test")
    }

    #[test]
    fn pair_socket_round_trip_with_a_pooled_message() {
        let ctx = context();
        let server = Socket::new(&ctx, SocketType::Pair).unwrap();
        server.bind("inproc://zmq-pool-lib-smoke").unwrap();
        let client = Socket::new(&ctx, SocketType::Pair).unwrap();
        client.connect("inproc://zmq-pool-lib-smoke").unwrap();

        let pool = MessagePool::new(PoolConfig::default());
        let msg = pool.rent_with_bytes(b"hello").unwrap();
        client.send_msg(msg, SendFlags::NONE.bits()).unwrap();

        let received = server
            .recv_with_pool(&pool, 64, SendFlags::NONE.bits())
            .unwrap();
        assert_eq!(received.data().unwrap(), b"hello");
        assert_eq!(pool.stats().outstanding(), 0);
    }

    #[test]
    fn poller_reports_readability_after_a_send() {
        let ctx = context();
        let server = Socket::new(&ctx, SocketType::Pair).unwrap();
        server.bind("inproc://zmq-pool-lib-poller-smoke").unwrap();
        let client = Socket::new(&ctx, SocketType::Pair).unwrap();
        client.connect("inproc://zmq-pool-lib-poller-smoke").unwrap();

        client.send(b"ping", SendFlags::NONE.bits()).unwrap();

        let mut poller = Poller::new(1).unwrap();
        let idx = poller.add(&server, PollEvents::POLLIN).unwrap();
        poller.poll(1000).unwrap();
        assert!(poller.is_readable(idx));
    }

    #[test]
    fn multipart_round_trip_preserves_frame_order() {
        let ctx = context();
        let server = Socket::new(&ctx, SocketType::Pair).unwrap();
        server.bind("inproc://zmq-pool-lib-multipart-smoke").unwrap();
        let client = Socket::new(&ctx, SocketType::Pair).unwrap();
        client.connect("inproc://zmq-pool-lib-multipart-smoke").unwrap();

        let mut outgoing = MultipartMessage::new();
        outgoing.push(RegularMessage::from_bytes(b"route").unwrap());
        outgoing.push(RegularMessage::from_bytes(b"").unwrap());
        outgoing.push(RegularMessage::from_bytes(b"body").unwrap());
        outgoing.send(&client).unwrap();

        let incoming = MultipartMessage::recv(&server).unwrap();
        let frames: Vec<_> = incoming
            .iter()
            .map(|m| m.data().unwrap().to_vec())
            .collect();
        assert_eq!(frames, vec![b"route".to_vec(), b"".to_vec(), b"body".to_vec()]);
    }
}
