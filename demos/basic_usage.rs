// demos/basic_usage.rs
//! Push/pull with the message pool: the smallest complete round-trip.

use zmq_pool::prelude::*;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Basic Usage: PUSH/PULL with the message pool ===\n");

    let ctx = Context::new()?;

    let puller = Socket::new(&ctx, SocketType::Pull)?;
    puller.bind("inproc://basic-usage-demo")?;
    let pusher = Socket::new(&ctx, SocketType::Push)?;
    pusher.connect("inproc://basic-usage-demo")?;

    let pool = MessagePool::shared();
    println!("Pool constructed with {} size-class buckets", PoolConfig::default().max_buffers.len());

    for i in 0..5u32 {
        let payload = format!("packet #{i}");
        let msg = pool.rent_with_bytes(payload.as_bytes())?;
        pusher.send_msg(msg, SendFlags::NONE.bits())?;

        let received = puller.recv_with_pool(pool, 64, SendFlags::NONE.bits())?;
        println!("received: {:?}", String::from_utf8_lossy(received.data()?));
    }

    let stats = pool.stats();
    println!(
        "\npool stats: rents={} returns={} hits={} misses={} outstanding={}",
        stats.total_rents,
        stats.total_returns,
        stats.pool_hits,
        stats.pool_misses,
        stats.outstanding()
    );

    Ok(())
}
