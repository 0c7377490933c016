// src/message/regular.rs
//! Regular (non-pooled) messages: a descriptor whose native-heap block is
//! owned by this instance alone, freed on disposal or by the engine once a
//! send succeeds.

use crate::ffi;
use crate::ffi::constants::MessageProperty;
use crate::ffi::raw::zmq_msg_t;
use crate::socket::Socket;
use crate::{Error, Result};
use log::trace;

/// A one-shot message descriptor, analogous to `zmq_msg_t` wrapped for safe
/// use. Exactly one native-heap block backs it for its entire lifetime.
pub struct RegularMessage {
    pub(crate) raw: zmq_msg_t,
    was_successfully_sent: bool,
    disposed: bool,
}

impl RegularMessage {
    /// An empty message (`zmq_msg_init`).
    pub fn new() -> Result<Self> {
        let mut raw = zmq_msg_t::uninit();
        ffi::msg_init(&mut raw)?;
        Ok(Self {
            raw,
            was_successfully_sent: false,
            disposed: false,
        })
    }

    /// A message with an uninitialised block of exactly `size` bytes
    /// (`zmq_msg_init_size`), owned by the engine's own allocator.
    pub fn with_size(size: usize) -> Result<Self> {
        let mut raw = zmq_msg_t::uninit();
        ffi::msg_init_size(&mut raw, size)?;
        Ok(Self {
            raw,
            was_successfully_sent: false,
            disposed: false,
        })
    }

    /// A message wrapping an externally-owned block of `size` bytes, copied
    /// from `data`. The engine is given ownership of a fresh heap block (not
    /// `data` itself) together with a free callback, so this constructor
    /// never requires the caller to keep `data` alive afterwards.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut message = Self::with_size(data.len())?;
        message.data_mut().copy_from_slice(data);
        Ok(message)
    }

    /// Mutable view of the message's payload.
    pub fn data_mut(&mut self) -> &mut [u8] {
        let ptr = ffi::msg_data_ptr(&mut self.raw);
        let len = ffi::msg_size(&self.raw);
        unsafe { std::slice::from_raw_parts_mut(ptr, len) }
    }

    /// Read-only view of the message's payload.
    ///
    /// Errors with [`Error::AlreadyDisposed`] if the descriptor has been
    /// closed, or [`Error::NotInitialised`] is not applicable here since
    /// construction always initialises the descriptor.
    pub fn data(&self) -> Result<&[u8]> {
        if self.disposed {
            return Err(Error::AlreadyDisposed);
        }
        let ptr = ffi::msg_data_ptr(&self.raw as *const _ as *mut _);
        let len = ffi::msg_size(&self.raw);
        Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
    }

    /// Number of payload bytes.
    pub fn size(&self) -> usize {
        ffi::msg_size(&self.raw)
    }

    /// Whether another frame of the current logical message follows.
    pub fn more(&self) -> bool {
        ffi::msg_more(&self.raw)
    }

    /// Sends this message via `zmq_msg_send`, taking ownership into the
    /// engine on success. `flags` typically carries [`crate::ffi::constants::SendFlags::SEND_MORE`].
    ///
    /// On failure (e.g. `EAGAIN` under `DONT_WAIT`) the engine leaves the
    /// descriptor valid and unsent, so `self` is handed back alongside the
    /// error rather than being disposed — the caller can retry the same
    /// message.
    pub fn send(mut self, socket: &Socket, flags: i32) -> std::result::Result<(), (Self, Error)> {
        match ffi::msg_send(&mut self.raw, socket.raw_handle(), flags) {
            Ok(_) => {
                self.was_successfully_sent = true;
                trace!("regular message sent, ownership transferred to engine");
                Ok(())
            }
            Err(err) => Err((self, err)),
        }
    }

    /// Receives a frame from `socket` into this message via `zmq_msg_recv`.
    /// On `EAGAIN` the descriptor remains valid and initialised.
    pub fn recv(&mut self, socket: &Socket, flags: i32) -> Result<()> {
        ffi::msg_recv(&mut self.raw, socket.raw_handle(), flags)?;
        Ok(())
    }

    /// Duplicates this message's content into a new, independent descriptor
    /// (`zmq_msg_copy`). Useful for fanning one payload out to several
    /// sockets without re-copying the bytes by hand.
    pub fn try_clone(&self) -> Result<Self> {
        let mut clone = Self::new()?;
        ffi::msg_copy(&mut clone.raw, &self.raw as *const _ as *mut _)?;
        Ok(clone)
    }

    /// Moves `src`'s content into this message (`zmq_msg_move`), relaying a
    /// frame onward without copying its bytes. `src` becomes an empty
    /// message afterwards, per the engine's own contract.
    pub fn move_from(&mut self, src: &mut Self) -> Result<()> {
        ffi::msg_move(&mut self.raw, &mut src.raw)
    }

    /// Reads an integer-valued message property (`zmq_msg_get`).
    pub fn get_property(&self, property: MessageProperty) -> Result<i32> {
        ffi::msg_get(&self.raw, property as i32)
    }

    /// Sets an integer-valued message property (`zmq_msg_set`).
    pub fn set_property(&mut self, property: MessageProperty, value: i32) -> Result<()> {
        ffi::msg_set(&mut self.raw, property as i32, value)
    }

    /// Whether the engine reports this message's buffer as reference-counted
    /// rather than privately owned.
    pub fn is_shared(&self) -> Result<bool> {
        Ok(self.get_property(MessageProperty::Shared)? != 0)
    }

    /// Reads a string-valued message metadata property (`zmq_msg_gets`), e.g.
    /// `"Socket-Type"` on a message received from a socket that negotiated
    /// metadata.
    pub fn get_metadata(&self, property: &str) -> Result<String> {
        ffi::msg_gets(&self.raw, property)
    }
}

impl Drop for RegularMessage {
    fn drop(&mut self) {
        if self.disposed || self.was_successfully_sent {
            // Successfully-sent messages are owned by the engine from here
            // on; closing them again would be a use-after-free of the
            // engine's own bookkeeping.
            return;
        }
        self.disposed = true;
        let _ = ffi::msg_close(&mut self.raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_duplicates_payload_independently() {
        let original = RegularMessage::from_bytes(b"clone me").unwrap();
        let clone = original.try_clone().unwrap();
        assert_eq!(clone.data().unwrap(), b"clone me");
        assert_eq!(original.data().unwrap(), b"clone me");
    }

    #[test]
    fn move_from_transfers_content_and_empties_source() {
        let mut src = RegularMessage::from_bytes(b"relay me").unwrap();
        let mut dest = RegularMessage::new().unwrap();
        dest.move_from(&mut src).unwrap();
        assert_eq!(dest.data().unwrap(), b"relay me");
        assert_eq!(src.data().unwrap(), b"");
    }

    #[test]
    fn more_property_reads_back_through_get_property() {
        let msg = RegularMessage::from_bytes(b"x").unwrap();
        // A never-sent, never-received message has no continuation frame.
        assert_eq!(msg.get_property(MessageProperty::More).unwrap(), 0);
    }
}
