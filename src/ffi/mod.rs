// src/ffi/mod.rs
//! Engine FFI surface (C1): thin, checked wrappers around the raw `extern "C"`
//! declarations in [`raw`]. Every function here does exactly one thing beyond
//! marshalling: it turns the engine's `-1`/null failure convention into
//! [`Error::EngineError`](crate::Error::EngineError) carrying the engine's own
//! numeric code and rendered message. No retry logic, no pooling, no
//! lifecycle decisions live at this layer — those belong to C2 and above.

pub mod constants;
pub mod raw;

use crate::{Error, Result};
use libc::{c_void, size_t};
use raw::{zmq_ctx_t, zmq_free_fn, zmq_msg_t, zmq_pollitem_t, zmq_socket_t};
use std::ffi::{CStr, CString};

/// Reads `zmq_errno()`/`zmq_strerror()` and builds an [`Error::EngineError`].
///
/// # Safety
/// Must only be called immediately after an engine call has reported failure;
/// `zmq_errno` reflects the last engine call on the current thread.
unsafe fn last_error() -> Error {
    let code = unsafe { raw::zmq_errno() };
    let message = unsafe {
        let ptr = raw::zmq_strerror(code);
        if ptr.is_null() {
            String::from("unknown engine error")
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    };
    Error::from_engine(code, message)
}

fn endpoint_cstring(endpoint: &str) -> Result<CString> {
    CString::new(endpoint)
        .map_err(|_| Error::InvalidArgument("endpoint contains an interior NUL byte".into()))
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

pub(crate) fn ctx_new() -> Result<*mut zmq_ctx_t> {
    let ctx = unsafe { raw::zmq_ctx_new() };
    if ctx.is_null() {
        return Err(unsafe { last_error() });
    }
    Ok(ctx)
}

pub(crate) fn ctx_set(ctx: *mut zmq_ctx_t, option: i32, value: i32) -> Result<()> {
    let rc = unsafe { raw::zmq_ctx_set(ctx, option, value) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn ctx_get(ctx: *mut zmq_ctx_t, option: i32) -> Result<i32> {
    // zmq_ctx_get returns the value directly; a negative result signals an
    // error only for options that can never legitimately be negative, so we
    // treat -1 conservatively as failure, matching the other wrappers here.
    let rc = unsafe { raw::zmq_ctx_get(ctx, option) };
    if rc == -1 {
        return Err(unsafe { last_error() });
    }
    Ok(rc)
}

/// Terminates the context. Loops through `EINTR`, matching the engine's own
/// documented retry contract for `zmq_ctx_term`.
pub(crate) fn ctx_term(ctx: *mut zmq_ctx_t) -> Result<()> {
    loop {
        let rc = unsafe { raw::zmq_ctx_term(ctx) };
        if rc == 0 {
            return Ok(());
        }
        let err = unsafe { last_error() };
        if err.raw_code() != Some(constants::EINTR) {
            return Err(err);
        }
    }
}

pub(crate) fn ctx_shutdown(ctx: *mut zmq_ctx_t) -> Result<()> {
    let rc = unsafe { raw::zmq_ctx_shutdown(ctx) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Socket
// ---------------------------------------------------------------------------

pub(crate) fn socket_new(ctx: *mut zmq_ctx_t, socket_type: i32) -> Result<*mut zmq_socket_t> {
    let sock = unsafe { raw::zmq_socket(ctx, socket_type) };
    if sock.is_null() {
        return Err(unsafe { last_error() });
    }
    Ok(sock)
}

pub(crate) fn socket_close(socket: *mut zmq_socket_t) -> Result<()> {
    let rc = unsafe { raw::zmq_close(socket) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn socket_bind(socket: *mut zmq_socket_t, endpoint: &str) -> Result<()> {
    let c_endpoint = endpoint_cstring(endpoint)?;
    let rc = unsafe { raw::zmq_bind(socket, c_endpoint.as_ptr()) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn socket_connect(socket: *mut zmq_socket_t, endpoint: &str) -> Result<()> {
    let c_endpoint = endpoint_cstring(endpoint)?;
    let rc = unsafe { raw::zmq_connect(socket, c_endpoint.as_ptr()) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn socket_unbind(socket: *mut zmq_socket_t, endpoint: &str) -> Result<()> {
    let c_endpoint = endpoint_cstring(endpoint)?;
    let rc = unsafe { raw::zmq_unbind(socket, c_endpoint.as_ptr()) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn socket_disconnect(socket: *mut zmq_socket_t, endpoint: &str) -> Result<()> {
    let c_endpoint = endpoint_cstring(endpoint)?;
    let rc = unsafe { raw::zmq_disconnect(socket, c_endpoint.as_ptr()) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Attaches a monitor socket at `endpoint` that emits the requested
/// state-change `events` (`zmq_socket_monitor`). A PAIR socket connected to
/// `endpoint` then receives them as ordinary multipart messages.
pub(crate) fn socket_monitor(socket: *mut zmq_socket_t, endpoint: &str, events: i32) -> Result<()> {
    let c_endpoint = endpoint_cstring(endpoint)?;
    let rc = unsafe { raw::zmq_socket_monitor(socket, c_endpoint.as_ptr(), events) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Typed dispatch over the engine's untyped void*+len option API (§9): the
/// integer case. Most socket options (linger, hwm, timeouts, rcvmore, fd,
/// events, type) are this shape.
pub(crate) fn getsockopt_int(socket: *mut zmq_socket_t, option: i32) -> Result<i32> {
    let mut value: i32 = 0;
    let mut len = std::mem::size_of::<i32>() as size_t;
    let rc = unsafe {
        raw::zmq_getsockopt(
            socket,
            option,
            &mut value as *mut i32 as *mut c_void,
            &mut len,
        )
    };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(value)
}

pub(crate) fn setsockopt_int(socket: *mut zmq_socket_t, option: i32, value: i32) -> Result<()> {
    let len = std::mem::size_of::<i32>() as size_t;
    let rc = unsafe {
        raw::zmq_setsockopt(socket, option, &value as *const i32 as *const c_void, len)
    };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Byte-array option case (routing-id, subscribe/unsubscribe topics, curve
/// keys, ...).
pub(crate) fn setsockopt_bytes(socket: *mut zmq_socket_t, option: i32, value: &[u8]) -> Result<()> {
    let rc = unsafe {
        raw::zmq_setsockopt(
            socket,
            option,
            value.as_ptr() as *const c_void,
            value.len() as size_t,
        )
    };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn getsockopt_bytes(socket: *mut zmq_socket_t, option: i32, max_len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; max_len];
    let mut len = max_len as size_t;
    let rc = unsafe {
        raw::zmq_getsockopt(socket, option, buf.as_mut_ptr() as *mut c_void, &mut len)
    };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    buf.truncate(len as usize);
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Raw buffer send/recv
// ---------------------------------------------------------------------------

pub(crate) fn send_raw(socket: *mut zmq_socket_t, data: &[u8], flags: i32) -> Result<usize> {
    let rc = unsafe {
        raw::zmq_send(socket, data.as_ptr() as *const c_void, data.len() as size_t, flags)
    };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    Ok(rc as usize)
}

pub(crate) fn recv_raw(socket: *mut zmq_socket_t, buf: &mut [u8], flags: i32) -> Result<usize> {
    let rc = unsafe {
        raw::zmq_recv(socket, buf.as_mut_ptr() as *mut c_void, buf.len() as size_t, flags)
    };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    // The engine may report more bytes than fit in `buf` (truncation); the
    // caller only ever sees what was actually copied.
    Ok((rc as usize).min(buf.len()))
}

// ---------------------------------------------------------------------------
// Message descriptor lifecycle
// ---------------------------------------------------------------------------

pub(crate) fn msg_init(msg: *mut zmq_msg_t) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_init(msg) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn msg_init_size(msg: *mut zmq_msg_t, size: usize) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_init_size(msg, size as size_t) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// # Safety
/// `data` must remain valid until `ffn` is invoked by the engine (or until the
/// caller closes the descriptor without ever handing it to the engine).
pub(crate) unsafe fn msg_init_data(
    msg: *mut zmq_msg_t,
    data: *mut u8,
    size: usize,
    ffn: zmq_free_fn,
    hint: *mut c_void,
) -> Result<()> {
    let rc = unsafe {
        raw::zmq_msg_init_data(msg, data as *mut c_void, size as size_t, ffn, hint)
    };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn msg_close(msg: *mut zmq_msg_t) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_close(msg) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

pub(crate) fn msg_send(msg: *mut zmq_msg_t, socket: *mut zmq_socket_t, flags: i32) -> Result<usize> {
    let rc = unsafe { raw::zmq_msg_send(msg, socket, flags) };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    Ok(rc as usize)
}

pub(crate) fn msg_recv(msg: *mut zmq_msg_t, socket: *mut zmq_socket_t, flags: i32) -> Result<usize> {
    let rc = unsafe { raw::zmq_msg_recv(msg, socket, flags) };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    Ok(rc as usize)
}

pub(crate) fn msg_data_ptr(msg: *mut zmq_msg_t) -> *mut u8 {
    unsafe { raw::zmq_msg_data(msg) as *mut u8 }
}

pub(crate) fn msg_size(msg: *const zmq_msg_t) -> usize {
    unsafe { raw::zmq_msg_size(msg) as usize }
}

pub(crate) fn msg_more(msg: *const zmq_msg_t) -> bool {
    unsafe { raw::zmq_msg_more(msg) != 0 }
}

/// Moves `src`'s content into `dest` (`zmq_msg_move`). `src` is reinitialised
/// by the engine to an empty message; `dest`'s prior content, if any, is
/// properly destroyed first.
pub(crate) fn msg_move(dest: *mut zmq_msg_t, src: *mut zmq_msg_t) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_move(dest, src) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Copies `src`'s content into `dest` (`zmq_msg_copy`). `dest`'s prior
/// content, if any, is properly destroyed first.
pub(crate) fn msg_copy(dest: *mut zmq_msg_t, src: *mut zmq_msg_t) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_copy(dest, src) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Reads an integer-valued message property (`zmq_msg_get`), e.g.
/// [`constants::MessageProperty::Shared`].
pub(crate) fn msg_get(msg: *const zmq_msg_t, property: i32) -> Result<i32> {
    let rc = unsafe { raw::zmq_msg_get(msg, property) };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    Ok(rc)
}

/// Sets an integer-valued message property (`zmq_msg_set`). Surfaced
/// verbatim: most engine builds currently expose no writable properties, and
/// this layer does not special-case that the way it does not retry `EAGAIN`.
pub(crate) fn msg_set(msg: *mut zmq_msg_t, property: i32, value: i32) -> Result<()> {
    let rc = unsafe { raw::zmq_msg_set(msg, property, value) };
    if rc != 0 {
        return Err(unsafe { last_error() });
    }
    Ok(())
}

/// Reads a string-valued message metadata property (`zmq_msg_gets`), e.g.
/// `"Socket-Type"` or a ZAP-populated `"User-Id"` on messages received from a
/// socket that negotiated metadata.
pub(crate) fn msg_gets(msg: *const zmq_msg_t, property: &str) -> Result<String> {
    let c_property = CString::new(property)
        .map_err(|_| Error::InvalidArgument("message property contains an interior NUL byte".into()))?;
    let ptr = unsafe { raw::zmq_msg_gets(msg, c_property.as_ptr()) };
    if ptr.is_null() {
        return Err(unsafe { last_error() });
    }
    Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

pub(crate) fn poll(items: &mut [zmq_pollitem_t], timeout_ms: i64) -> Result<i32> {
    let rc = unsafe {
        raw::zmq_poll(items.as_mut_ptr(), items.len() as libc::c_int, timeout_ms as libc::c_long)
    };
    if rc < 0 {
        return Err(unsafe { last_error() });
    }
    Ok(rc)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Engine version as `(major, minor, patch)`.
pub fn version() -> (i32, i32, i32) {
    let (mut major, mut minor, mut patch) = (0, 0, 0);
    unsafe { raw::zmq_version(&mut major, &mut minor, &mut patch) };
    (major, minor, patch)
}

/// Queries an optional engine build capability (e.g. `"curve"`, `"ipc"`).
pub fn has(capability: &str) -> bool {
    let Ok(c_capability) = CString::new(capability) else {
        return false;
    };
    unsafe { raw::zmq_has(c_capability.as_ptr()) != 0 }
}
