// src/multipart.rs
//! `MultipartMessage` (C5): an ordered, owned sequence of frames making up
//! one logical multipart message, built on the SNDMORE/RCVMORE framing
//! convention.
//!
//! Grounded on rust-zmq's SNDMORE/RCVMORE handling for the send/recv loop
//! shape, and on the teacher's `ConnectionBuffers::packet_queue` (a bounded
//! owning collection whose `Drop` disposes everything still queued) for the
//! "every accumulated frame is disposed on teardown" idiom — here that falls
//! out for free from `Vec<Message>`'s own drop glue, since every [`Message`]
//! variant already disposes itself correctly.

use crate::message::Message;
use crate::socket::Socket;
use crate::ffi::constants::SendFlags;
use crate::{Error, Result};

/// An ordered sequence of frames sent or received as one logical message.
/// Empty-when-sent is rejected (§3): a multipart message must carry at least
/// one frame (an explicit empty delimiter frame is a zero-length [`Message`],
/// not the absence of one).
#[derive(Default)]
pub struct MultipartMessage {
    frames: Vec<Message>,
}

impl MultipartMessage {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, message: impl Into<Message>) {
        self.frames.push(message.into());
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Removes and returns the first frame, in receive order.
    pub fn pop_front(&mut self) -> Option<Message> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.frames.iter()
    }

    /// Sends every frame in order, setting `SEND_MORE` on all but the last.
    /// Consumes `self`; each frame's own send consumes it in turn.
    pub fn send(mut self, socket: &Socket) -> Result<()> {
        if self.frames.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot send an empty multipart message".into(),
            ));
        }
        let last = self.frames.len() - 1;
        for (i, frame) in self.frames.drain(..).enumerate() {
            let flags = if i == last {
                SendFlags::NONE
            } else {
                SendFlags::SEND_MORE
            };
            frame.send(socket, flags.bits()).map_err(|(_, err)| err)?;
        }
        Ok(())
    }

    /// Receives frames from `socket` until the engine reports no more follow.
    /// If a frame fails mid-sequence, every frame already received is
    /// disposed as part of unwinding the returned `Err` (each owns its own
    /// native resources and drops them normally); nothing is leaked.
    pub fn recv(socket: &Socket) -> Result<Self> {
        let mut frames = Vec::new();
        loop {
            let message = socket.recv_msg(0)?;
            let more = message.more();
            frames.push(message);
            if !more {
                break;
            }
        }
        Ok(Self { frames })
    }
}

impl IntoIterator for MultipartMessage {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::RegularMessage;

    #[test]
    fn empty_multipart_message_is_rejected_on_send() {
        let ctx = crate::context::Context::new().expect("engine must be linked for this test");
        let socket = Socket::new(&ctx, crate::ffi::constants::SocketType::Pair).unwrap();
        let multipart = MultipartMessage::new();
        assert!(multipart.send(&socket).is_err());
    }

    #[test]
    fn push_and_pop_front_preserve_order() {
        let mut multipart = MultipartMessage::new();
        multipart.push(RegularMessage::from_bytes(b"a").unwrap());
        multipart.push(RegularMessage::from_bytes(b"b").unwrap());
        assert_eq!(multipart.len(), 2);
        let first = multipart.pop_front().unwrap();
        assert_eq!(first.data().unwrap(), b"a");
    }
}
