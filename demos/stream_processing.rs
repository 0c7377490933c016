// demos/stream_processing.rs
//! A multipart request/response walkthrough: a ROUTER/DEALER exchange
//! carrying an identity frame, an empty delimiter, and a body, the shape
//! used by REQ-compatible multipart protocols.

use zmq_pool::prelude::*;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Stream Processing: multipart request/response ===\n");

    let ctx = Context::new()?;

    let router = Socket::new(&ctx, SocketType::Router)?;
    router.bind("inproc://stream-processing-demo")?;
    let dealer = Socket::new(&ctx, SocketType::Dealer)?;
    dealer.set_routing_id(b"worker-1")?;
    dealer.connect("inproc://stream-processing-demo")?;

    let mut request = MultipartMessage::new();
    request.push(RegularMessage::from_bytes(b"")?);
    request.push(RegularMessage::from_bytes(b"compute-checksum")?);
    request.push(RegularMessage::from_bytes(b"payload chunk one")?);
    request.send(&dealer)?;
    println!("dealer sent a 3-frame request");

    let incoming = MultipartMessage::recv(&router)?;
    let frames: Vec<Vec<u8>> = incoming.iter().map(|m| m.data().unwrap().to_vec()).collect();
    println!("router received {} frames:", frames.len());
    for (i, frame) in frames.iter().enumerate() {
        println!("  frame {i}: {:?}", String::from_utf8_lossy(frame));
    }

    let identity = frames[0].clone();
    let mut reply = MultipartMessage::new();
    reply.push(RegularMessage::from_bytes(&identity)?);
    reply.push(RegularMessage::from_bytes(b"")?);
    reply.push(RegularMessage::from_bytes(b"checksum: 0xDEADBEEF")?);
    reply.send(&router)?;
    println!("router sent a 3-frame reply");

    let response = MultipartMessage::recv(&dealer)?;
    for (i, frame) in response.iter().enumerate() {
        println!("dealer received frame {i}: {:?}", String::from_utf8_lossy(frame.data()?));
    }

    Ok(())
}
