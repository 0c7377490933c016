// demos/network_simulation.rs
//! A multi-socket poller loop: several PULL sockets fed by PUSH peers, all
//! serviced from one thread via a single `Poller`.

use zmq_pool::prelude::*;

const WORKERS: usize = 3;
const PACKETS_PER_WORKER: u32 = 20;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Network Simulation: multi-socket poller loop ===\n");

    let ctx = Context::new()?;
    let pool = MessagePool::shared();

    let mut pullers = Vec::with_capacity(WORKERS);
    let mut pushers = Vec::with_capacity(WORKERS);
    for i in 0..WORKERS {
        let endpoint = format!("inproc://network-sim-{i}");
        let puller = Socket::new(&ctx, SocketType::Pull)?;
        puller.bind(&endpoint)?;
        let pusher = Socket::new(&ctx, SocketType::Push)?;
        pusher.connect(&endpoint)?;
        pullers.push(puller);
        pushers.push(pusher);
    }

    for (i, pusher) in pushers.iter().enumerate() {
        for seq in 0..PACKETS_PER_WORKER {
            let payload = format!("worker {i} packet {seq}");
            let msg = pool.rent_with_bytes(payload.as_bytes())?;
            pusher.send_msg(msg, SendFlags::NONE.bits())?;
        }
    }

    let mut poller = Poller::new(WORKERS)?;
    for puller in &pullers {
        poller.add(puller, PollEvents::POLLIN)?;
    }

    let mut received = 0u32;
    let expected = WORKERS as u32 * PACKETS_PER_WORKER;
    while received < expected {
        poller.poll(1000)?;
        for (index, puller) in pullers.iter().enumerate() {
            if !poller.is_readable(index) {
                continue;
            }
            loop {
                let msg = puller.recv_with_pool(pool, 256, SendFlags::DONT_WAIT.bits());
                match msg {
                    Ok(msg) => {
                        received += 1;
                        if received % 10 == 0 {
                            println!("received {received}/{expected}: {:?}", String::from_utf8_lossy(msg.data()?));
                        }
                    }
                    Err(err) if err.is_would_block() => break,
                    Err(err) => return Err(err),
                }
            }
        }
    }

    println!("\nall {expected} packets received across {WORKERS} workers");
    println!("pool stats: {:?}", pool.stats());
    Ok(())
}
