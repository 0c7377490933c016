// tests/integration_tests.rs
//! Black-box integration tests exercising the public API end to end: the
//! S1-S6 seed scenarios from SPEC_FULL.md §8, plus the quantified invariants
//! those scenarios are meant to demonstrate.
//!
//! These link the real native engine (no fake/mock engine), matching the
//! teacher's own integration-test posture of exercising the thing it binds.

use std::time::Duration;
use zmq_pool::prelude::*;
use zmq_pool::pool::{PoolConfig, PrewarmConfig, BUCKET_SIZES};

fn context() -> Context {
    Context::new().expect("engine must be linked for this test")
}

fn settle() {
    std::thread::sleep(Duration::from_millis(100));
}

/// Index of the 64-byte bucket, per `BUCKET_SIZES` (16, 32, 64, ...).
fn bucket_64() -> usize {
    BUCKET_SIZES.iter().position(|&n| n == 64).unwrap()
}

/// S1: PUSH/PULL round-trip of a small pooled message.
#[test]
fn s1_push_pull_small_pooled_round_trip() {
    let ctx = context();
    let pool = MessagePool::new(PoolConfig::default());

    let puller = Socket::new(&ctx, SocketType::Pull).unwrap();
    puller.bind("inproc://s1-push-pull").unwrap();
    let pusher = Socket::new(&ctx, SocketType::Push).unwrap();
    pusher.connect("inproc://s1-push-pull").unwrap();

    let payload = [0x01u8, 0x02, 0x03, 0x04, 0x05];
    let msg = pool.rent_with_bytes(&payload).unwrap();
    pusher.send_msg(msg, SendFlags::NONE.bits()).unwrap();

    let mut buf = [0u8; 20];
    let n = puller.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(n, 5);
    assert_eq!(&buf[..5], &payload);

    settle();
    let stats = pool.stats();
    assert_eq!(stats.outstanding(), 0);
    assert_eq!(stats.total_rents, 1);
    assert_eq!(stats.total_returns, 1);
}

/// S2: REQ/REP round-trip over TCP.
#[test]
fn s2_req_rep_round_trip() {
    let ctx = context();
    let server = Socket::new(&ctx, SocketType::Rep).unwrap();
    server.bind("tcp://127.0.0.1:15556").unwrap();
    let client = Socket::new(&ctx, SocketType::Req).unwrap();
    client.connect("tcp://127.0.0.1:15556").unwrap();

    client.send(b"Hello", SendFlags::NONE.bits()).unwrap();

    let mut buf = [0u8; 16];
    let n = server.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(&buf[..n], b"Hello");

    server.send(b"World", SendFlags::NONE.bits()).unwrap();
    let n = client.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(&buf[..n], b"World");
}

/// S3: ROUTER/DEALER identity routing.
#[test]
fn s3_router_dealer_identity_routing() {
    let ctx = context();
    let router = Socket::new(&ctx, SocketType::Router).unwrap();
    router.bind("inproc://s3-router-dealer").unwrap();
    let dealer = Socket::new(&ctx, SocketType::Dealer).unwrap();
    dealer.set_routing_id(b"DEALER1").unwrap();
    dealer.connect("inproc://s3-router-dealer").unwrap();

    dealer
        .send(b"Hello from Dealer", SendFlags::NONE.bits())
        .unwrap();

    let mut buf = [0u8; 64];
    let n = router.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(&buf[..n], b"DEALER1");
    assert!(router.has_more().unwrap());

    let n = router.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(&buf[..n], b"Hello from Dealer");
    assert!(!router.has_more().unwrap());

    router
        .send(b"DEALER1", SendFlags::SEND_MORE.bits())
        .unwrap();
    router
        .send(b"Hello from Router", SendFlags::NONE.bits())
        .unwrap();

    let n = dealer.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
    assert_eq!(&buf[..n], b"Hello from Router");
}

/// S4: multipart send/receive with an empty delimiter frame.
#[test]
fn s4_multipart_with_empty_delimiter_frame() {
    let ctx = context();
    let receiver = Socket::new(&ctx, SocketType::Pair).unwrap();
    receiver.bind("inproc://s4-multipart").unwrap();
    let sender = Socket::new(&ctx, SocketType::Pair).unwrap();
    sender.connect("inproc://s4-multipart").unwrap();

    let mut outgoing = MultipartMessage::new();
    outgoing.push(RegularMessage::from_bytes(b"Header").unwrap());
    outgoing.push(RegularMessage::from_bytes(b"").unwrap());
    outgoing.push(RegularMessage::from_bytes(b"Body").unwrap());
    outgoing.send(&sender).unwrap();

    let incoming = MultipartMessage::recv(&receiver).unwrap();
    assert_eq!(incoming.len(), 3);
    let frames: Vec<(Vec<u8>, bool)> = incoming
        .iter()
        .map(|m| (m.data().unwrap().to_vec(), m.more()))
        .collect();
    assert_eq!(frames[0], (b"Header".to_vec(), true));
    assert_eq!(frames[1], (Vec::new(), true));
    assert_eq!(frames[2], (b"Body".to_vec(), false));
}

/// S5: pool pressure triggers rejects without leaking outstanding rents.
#[test]
fn s5_pool_pressure_and_rejects() {
    let bucket = bucket_64();
    let mut config = PoolConfig::default();
    config.max_buffers[bucket] = 2;
    let pool = MessagePool::new(config);

    let mut prewarm = PrewarmConfig::default();
    prewarm.counts[bucket] = 2;
    pool.prewarm(&prewarm).unwrap();

    let a = pool.rent(64).unwrap();
    let b = pool.rent(64).unwrap();
    let c = pool.rent(64).unwrap();
    drop(a);
    drop(b);
    drop(c);

    settle();
    let stats = pool.stats();
    assert_eq!(stats.outstanding(), 0);
    assert!(stats.pool_rejects >= 1);
}

/// S6: poller reports readability after a REQ/REP handshake.
#[test]
fn s6_poller_readability() {
    let ctx = context();
    let rep = Socket::new(&ctx, SocketType::Rep).unwrap();
    rep.bind("tcp://127.0.0.1:15560").unwrap();
    let req = Socket::new(&ctx, SocketType::Req).unwrap();
    req.connect("tcp://127.0.0.1:15560").unwrap();

    req.send(b"Hello", SendFlags::NONE.bits()).unwrap();

    let mut poller = Poller::new(1).unwrap();
    let idx = poller.add(&rep, PollEvents::POLLIN).unwrap();
    let ready = poller.poll(1000).unwrap();
    assert_eq!(ready, 1);
    assert!(poller.is_readable(idx));
}

/// Quantified invariant 1: outstanding reaches zero after rent/send/dispose
/// sequences settle, across both pooled and overflow (non-poolable) sizes.
#[test]
fn outstanding_reaches_zero_after_mixed_activity() {
    let pool = MessagePool::new(PoolConfig::default());

    for _ in 0..5 {
        let small = pool.rent(32).unwrap();
        drop(small);
    }
    let huge = pool.rent(8 * 1024 * 1024).unwrap();
    drop(huge);

    settle();
    assert_eq!(pool.stats().outstanding(), 0);
}

/// Boundary behaviour: requests beyond the largest bucket are one-shot and
/// counted as misses, never pooled.
#[test]
fn oversized_rent_is_one_shot_and_counts_as_a_miss() {
    let pool = MessagePool::new(PoolConfig::default());
    let before = pool.stats().pool_misses;
    let msg = pool.rent(16 * 1024 * 1024).unwrap();
    assert!(!msg.is_pooled());
    assert_eq!(pool.stats().pool_misses, before + 1);
}

/// Boundary behaviour: a poller at capacity 1 refuses a second registration.
#[test]
fn poller_at_capacity_rejects_further_additions() {
    let ctx = context();
    let a = Socket::new(&ctx, SocketType::Pair).unwrap();
    let b = Socket::new(&ctx, SocketType::Pair).unwrap();

    let mut poller = Poller::new(1).unwrap();
    poller.add(&a, PollEvents::POLLIN).unwrap();
    assert!(poller.add(&b, PollEvents::POLLIN).is_err());
}

/// Context/Socket disposal is idempotent: nothing panics or double-frees
/// when a socket is dropped and its context is dropped afterward, including
/// via an extra clone.
#[test]
fn context_and_socket_disposal_is_idempotent() {
    let ctx = context();
    let sock = Socket::new(&ctx, SocketType::Pair).unwrap();
    drop(sock);
    drop(ctx.clone());
    drop(ctx);
}

/// A failed send hands the message back rather than consuming it: a second
/// REQ send before the matching REP reply arrives is rejected with EFSM, and
/// the original message must still be usable afterwards.
#[test]
fn failed_send_returns_the_message_to_the_caller() {
    let ctx = context();
    let req = Socket::new(&ctx, SocketType::Req).unwrap();
    let rep = Socket::new(&ctx, SocketType::Rep).unwrap();
    rep.bind("inproc://failed-send-returns").unwrap();
    req.connect("inproc://failed-send-returns").unwrap();

    let first = RegularMessage::from_bytes(b"one").unwrap();
    req.send_msg(zmq_pool::Message::Regular(first), SendFlags::NONE.bits())
        .unwrap();

    let second: zmq_pool::Message = RegularMessage::from_bytes(b"two").unwrap().into();
    match second.send(&req, SendFlags::NONE.bits()) {
        Err((returned, _err)) => {
            assert_eq!(returned.data().unwrap(), b"two");
        }
        Ok(()) => panic!("a second REQ send before a REP reply should not succeed"),
    }
}
