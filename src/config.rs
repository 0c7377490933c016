// src/config.rs
//! Plain configuration structs for the ambient pieces of the library that sit
//! outside the message pool (whose own config lives in [`crate::pool::config`]).

/// Options applied when a [`Context`](crate::context::Context) is constructed.
///
/// Mirrors the subset of the engine's context options (§6) meaningful to set up
/// front, at `zmq_ctx_new`/`zmq_ctx_set` time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Number of engine I/O threads. Default 1, matching the engine's own default.
    pub io_threads: i32,
    /// Maximum number of sockets the context will allow.
    pub max_sockets: i32,
    /// Whether sockets created from this context default to IPv6-capable.
    pub ipv6: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            io_threads: 1,
            max_sockets: 1023,
            ipv6: false,
        }
    }
}

/// Tuning knobs for the thin async polling helpers in [`crate::async_poll`].
///
/// `poll_interval` and `spin_backoff` were pinned as defaults rather than left
/// inconsistent, per the Open Question decision recorded in `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncPollConfig {
    /// Timeout passed to each poll iteration while waiting for readiness.
    pub poll_interval: std::time::Duration,
    /// Sleep applied between poll iterations that return no readiness, to cap
    /// spin CPU without resorting to a kernel wait.
    pub spin_backoff: std::time::Duration,
}

impl Default for AsyncPollConfig {
    fn default() -> Self {
        Self {
            poll_interval: std::time::Duration::from_millis(10),
            spin_backoff: std::time::Duration::from_millis(1),
        }
    }
}
