// src/ffi/raw.rs
//! Declarative bindings to the engine's C ABI (component C1). This module does
//! no marshalling beyond what `libc` types require — every wrapper that turns
//! the engine's `-1`/null failure convention into an `Error` lives one layer up
//! in [`super`].

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_long, c_short, c_void, size_t};

/// Opaque engine context handle.
pub type zmq_ctx_t = c_void;
/// Opaque engine socket handle.
pub type zmq_socket_t = c_void;

/// The engine's message descriptor: a 64-byte opaque block the engine reads
/// and mutates in place. The host never interprets its contents directly.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct zmq_msg_t {
    _private: [u8; 64],
}

impl zmq_msg_t {
    /// A zeroed descriptor, suitable as the argument to `zmq_msg_init*`.
    pub const fn uninit() -> Self {
        Self { _private: [0u8; 64] }
    }
}

/// Function pointer the engine invokes to release an externally-provided
/// message buffer. `data` is the buffer pointer passed to `zmq_msg_init_data`;
/// `hint` is the opaque pointer registered alongside it.
pub type zmq_free_fn = unsafe extern "C" fn(data: *mut c_void, hint: *mut c_void);

/// A single slot in the array passed to `zmq_poll`. Layout is platform
/// dependent: on Windows the socket field would be a `SOCKET`, and the file
/// descriptor a fixed-width integer. This binding hard-codes the Unix layout
/// that `libc::c_int` describes; there is no `cfg(windows)` variant, so this
/// crate does not support building for Windows.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct zmq_pollitem_t {
    /// Engine socket handle to poll, or null to poll a raw file descriptor.
    pub socket: *mut zmq_socket_t,
    /// Raw file descriptor to poll when `socket` is null.
    pub fd: c_int,
    /// Requested readiness bits.
    pub events: c_short,
    /// Bits the engine reported ready after `zmq_poll` returns.
    pub revents: c_short,
}

#[link(name = "zmq")]
unsafe extern "C" {
    // Context
    pub fn zmq_ctx_new() -> *mut zmq_ctx_t;
    pub fn zmq_ctx_term(ctx: *mut zmq_ctx_t) -> c_int;
    pub fn zmq_ctx_shutdown(ctx: *mut zmq_ctx_t) -> c_int;
    pub fn zmq_ctx_get(ctx: *mut zmq_ctx_t, option: c_int) -> c_int;
    pub fn zmq_ctx_set(ctx: *mut zmq_ctx_t, option: c_int, value: c_int) -> c_int;

    // Socket
    pub fn zmq_socket(ctx: *mut zmq_ctx_t, socket_type: c_int) -> *mut zmq_socket_t;
    pub fn zmq_close(socket: *mut zmq_socket_t) -> c_int;
    pub fn zmq_bind(socket: *mut zmq_socket_t, endpoint: *const c_char) -> c_int;
    pub fn zmq_connect(socket: *mut zmq_socket_t, endpoint: *const c_char) -> c_int;
    pub fn zmq_unbind(socket: *mut zmq_socket_t, endpoint: *const c_char) -> c_int;
    pub fn zmq_disconnect(socket: *mut zmq_socket_t, endpoint: *const c_char) -> c_int;
    pub fn zmq_getsockopt(
        socket: *mut zmq_socket_t,
        option: c_int,
        value: *mut c_void,
        len: *mut size_t,
    ) -> c_int;
    pub fn zmq_setsockopt(
        socket: *mut zmq_socket_t,
        option: c_int,
        value: *const c_void,
        len: size_t,
    ) -> c_int;

    // Raw buffer send/recv (no message descriptor involved)
    pub fn zmq_send(socket: *mut zmq_socket_t, buf: *const c_void, len: size_t, flags: c_int) -> c_int;
    pub fn zmq_recv(socket: *mut zmq_socket_t, buf: *mut c_void, len: size_t, flags: c_int) -> c_int;

    // Message descriptor lifecycle
    pub fn zmq_msg_init(msg: *mut zmq_msg_t) -> c_int;
    pub fn zmq_msg_init_size(msg: *mut zmq_msg_t, size: size_t) -> c_int;
    pub fn zmq_msg_init_data(
        msg: *mut zmq_msg_t,
        data: *mut c_void,
        size: size_t,
        ffn: zmq_free_fn,
        hint: *mut c_void,
    ) -> c_int;
    pub fn zmq_msg_close(msg: *mut zmq_msg_t) -> c_int;
    pub fn zmq_msg_send(msg: *mut zmq_msg_t, socket: *mut zmq_socket_t, flags: c_int) -> c_int;
    pub fn zmq_msg_recv(msg: *mut zmq_msg_t, socket: *mut zmq_socket_t, flags: c_int) -> c_int;
    pub fn zmq_msg_data(msg: *mut zmq_msg_t) -> *mut c_void;
    pub fn zmq_msg_size(msg: *const zmq_msg_t) -> size_t;
    pub fn zmq_msg_more(msg: *const zmq_msg_t) -> c_int;
    pub fn zmq_msg_move(dest: *mut zmq_msg_t, src: *mut zmq_msg_t) -> c_int;
    pub fn zmq_msg_copy(dest: *mut zmq_msg_t, src: *mut zmq_msg_t) -> c_int;
    pub fn zmq_msg_get(msg: *const zmq_msg_t, property: c_int) -> c_int;
    pub fn zmq_msg_set(msg: *mut zmq_msg_t, property: c_int, optval: c_int) -> c_int;
    pub fn zmq_msg_gets(msg: *const zmq_msg_t, property: *const c_char) -> *const c_char;

    // Socket event monitoring
    pub fn zmq_socket_monitor(socket: *mut zmq_socket_t, endpoint: *const c_char, events: c_int) -> c_int;

    // Poll
    pub fn zmq_poll(items: *mut zmq_pollitem_t, nitems: c_int, timeout: c_long) -> c_int;

    // Diagnostics
    pub fn zmq_errno() -> c_int;
    pub fn zmq_strerror(errnum: c_int) -> *const c_char;
    pub fn zmq_version(major: *mut c_int, minor: *mut c_int, patch: *mut c_int);
    pub fn zmq_has(capability: *const c_char) -> c_int;
}
