// src/ffi/constants.rs
//! Numeric constants mirrored from the engine's C ABI (socket types, flags,
//! option codes, error codes). Kept separate from [`super::raw`] so the
//! `extern "C"` surface and its vocabulary can be read independently.

#![allow(missing_docs)]

use bitflags::bitflags;

/// Socket type tags, passed to `zmq_socket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SocketType {
    Pair = 0,
    Pub = 1,
    Sub = 2,
    Req = 3,
    Rep = 4,
    Dealer = 5,
    Router = 6,
    Pull = 7,
    Push = 8,
    XPub = 9,
    XSub = 10,
    Stream = 11,
}

bitflags! {
    /// Flags accepted by send/recv calls (both `zmq_msg_send`/`recv` and raw
    /// buffer `zmq_send`/`zmq_recv`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SendFlags: i32 {
        /// No flags.
        const NONE = 0;
        /// Non-blocking: fail with `EAGAIN` rather than blocking.
        const DONT_WAIT = 1;
        /// More frames of the current logical multipart message follow.
        const SEND_MORE = 2;
    }
}

bitflags! {
    /// Readiness bits used in a poll item's requested/returned events field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PollEvents: i16 {
        const POLLIN = 1;
        const POLLOUT = 2;
        const POLLERR = 4;
    }
}

/// Socket options addressed via `zmq_getsockopt`/`zmq_setsockopt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SocketOption {
    RoutingId = 5,
    Subscribe = 6,
    Unsubscribe = 7,
    RcvMore = 13,
    Fd = 14,
    Events = 15,
    Type = 16,
    Linger = 17,
    SndHwm = 23,
    RcvHwm = 24,
    RcvTimeo = 27,
    SndTimeo = 28,
}

/// Context options addressed via `zmq_ctx_get`/`zmq_ctx_set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ContextOption {
    IoThreads = 1,
    MaxSockets = 2,
    Ipv6 = 42,
}

/// Message-level properties addressed via `zmq_msg_get`/`zmq_msg_set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum MessageProperty {
    /// Continuation bit (mirrors `zmq_msg_more`, reachable generically here).
    More = 1,
    /// The file descriptor of the connection the message arrived on.
    SrcFd = 2,
    /// Whether the message's underlying buffer is engine-reference-counted.
    Shared = 3,
}

bitflags! {
    /// Socket state-change events reported to a monitor socket
    /// (`zmq_socket_monitor`'s `events` argument).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MonitorEvents: i32 {
        const CONNECTED = 0x0001;
        const CONNECT_DELAYED = 0x0002;
        const CONNECT_RETRIED = 0x0004;
        const LISTENING = 0x0008;
        const BIND_FAILED = 0x0010;
        const ACCEPTED = 0x0020;
        const ACCEPT_FAILED = 0x0040;
        const CLOSED = 0x0080;
        const CLOSE_FAILED = 0x0100;
        const DISCONNECTED = 0x0200;
        const MONITOR_STOPPED = 0x0400;
        /// Every event class the engine currently defines.
        const ALL = 0xFFFF;
    }
}

/// POSIX "would block" errno, re-exported from `libc` under the engine's own name.
pub const EAGAIN: i32 = libc::EAGAIN;
/// POSIX "interrupted" errno.
pub const EINTR: i32 = libc::EINTR;
/// POSIX "not a socket" errno, returned for operations on a disposed/invalid handle.
pub const ENOTSOCK: i32 = libc::ENOTSOCK;

/// Base offset for the engine's own error codes, per the engine's C ABI
/// (`ZMQ_HAUSNUMERO` in the reference implementation): native errno space is
/// reserved below this value, so the engine's own codes start here to avoid
/// collisions on platforms whose errno range extends upward.
const ENGINE_HAUSNUMERO: i32 = 156_384_712;

/// Socket is not in the appropriate state for the requested operation.
pub const EFSM: i32 = ENGINE_HAUSNUMERO + 51;
/// The requested transport protocol is not compatible with the socket type.
pub const ENOCOMPATPROTO: i32 = ENGINE_HAUSNUMERO + 52;
/// The context was terminated (e.g. concurrently with this call).
pub const ETERM: i32 = ENGINE_HAUSNUMERO + 53;
/// The engine's internal thread limit was reached.
pub const EMTHREAD: i32 = ENGINE_HAUSNUMERO + 54;
