use std::thread;
use std::time::Instant;
use tracing_indent_handler::prelude::*;

fn main() {
    let out = MemoryWriter::new();
    let root = IndentHandler::new(Sink::new(out.clone()), HandlerOptions::default());

    let n: u64 = 10_000;
    let start = Instant::now();

    let workers: Vec<_> = (0..4u64)
        .map(|id| {
            let h = root.with_group("worker").with_attrs(vec![Attr::uint("id", id)]);
            thread::spawn(move || {
                for i in 0..n {
                    let record = Record::new(Level::INFO, "tick").with_attrs([Attr::uint("i", i)]);
                    if let Err(e) = h.handle(&record) {
                        eprintln!("{}", e);
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    let elapsed = start.elapsed();
    let stats = root.sink().stats();
    println!(
        "wrote {} records ({} bytes) in {:?}",
        stats.records_written.load(std::sync::atomic::Ordering::Relaxed),
        stats.bytes_written.load(std::sync::atomic::Ordering::Relaxed),
        elapsed
    );
    println!("{}", out.contents().lines().take(8).collect::<Vec<_>>().join("\n"));
}
