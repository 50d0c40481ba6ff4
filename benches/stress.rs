use std::sync::Arc;
use std::time::{Duration, Instant};

use ulid::Ulid;

use timelane::config::EngineConfig;
use timelane::engine::{clamp_resize, find_neighbors, Board, Snapshot};
use timelane::model::*;
use timelane::notify::NotifyHub;

const HOUR: i64 = 3_600_000; // 1 hour in ms

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}us, p50={:.3}us, p95={:.3}us, p99={:.3}us, max={:.3}us",
        latencies.len(),
        avg.as_secs_f64() * 1e6,
        percentile(latencies, 50.0).as_secs_f64() * 1e6,
        percentile(latencies, 95.0).as_secs_f64() * 1e6,
        percentile(latencies, 99.0).as_secs_f64() * 1e6,
        latencies.last().map_or(0.0, |d| d.as_secs_f64() * 1e6),
    );
}

/// One lane of `n` one-hour items with one-hour gaps.
fn build_lane(group: GroupId, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let s = (i as i64) * 2 * HOUR;
            Item::new(Ulid::new(), group, Span::new(s, s + HOUR), ItemPayload::default())
        })
        .collect()
}

fn phase1_neighbor_lookup(n: usize) {
    let group = Ulid::new();
    let items = build_lane(group, n);
    let snapshot = Snapshot::from_items(items.clone()).expect("valid lane");
    let lane = snapshot.lane(group).expect("lane exists");
    let lookups = 1000;

    let mut linear = Vec::with_capacity(lookups);
    let mut indexed = Vec::with_capacity(lookups);
    for i in 0..lookups {
        let at = ((i * 7919) % n) as i64 * 2 * HOUR + HOUR + HOUR / 2;
        let t = Instant::now();
        let a = find_neighbors(&items, Reference::Point(at), None);
        linear.push(t.elapsed());
        let t = Instant::now();
        let b = lane.neighbors(Reference::Point(at), None);
        indexed.push(t.elapsed());
        assert_eq!(a.previous.map(|i| i.id), b.previous.map(|i| i.id));
    }
    println!("  lane of {n} items");
    print_latency("linear scan", &mut linear);
    print_latency("ordered index", &mut indexed);
}

fn phase2_commit_resize(n: usize) {
    let group = Ulid::new();
    let items = build_lane(group, n);
    let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
    let mut snapshot = Snapshot::from_items(items).expect("valid lane");

    let ops = 2000;
    let mut latencies = Vec::with_capacity(ops);
    let start = Instant::now();
    for i in 0..ops {
        let id = ids[(i * 31) % ids.len()];
        let t = Instant::now();
        if let Ok((next, _)) = timelane::engine::commit_resize(&snapshot, id, i64::MAX / 4, Edge::End, 1) {
            snapshot = next;
        }
        latencies.push(t.elapsed());
    }
    let elapsed = start.elapsed();
    let lane = snapshot.lane(group).expect("lane exists");
    let first = ids[0];
    assert_eq!(clamp_resize(lane, first, i64::MAX / 4, Edge::End), lane.items()[1].span.start);
    println!(
        "  {ops} resizes on {n} items in {:.2}s = {:.0} ops/sec",
        elapsed.as_secs_f64(),
        ops as f64 / elapsed.as_secs_f64()
    );
    print_latency("commit latency", &mut latencies);
}

async fn phase3_concurrent_board(lanes: usize, clicks_per_lane: usize) {
    let board = Arc::new(Board::new(EngineConfig::default(), Arc::new(NotifyHub::new())));
    let start = Instant::now();
    let mut handles = Vec::new();

    for _ in 0..lanes {
        let board = board.clone();
        let group = Ulid::new();
        handles.push(tokio::spawn(async move {
            let mut created = 0usize;
            for i in 0..clicks_per_lane {
                // Every other click lands inside the previous item and is refused.
                let at = (i as i64) * 2 * HOUR;
                if board.create_at(group, at, ItemPayload::placeholder()).await.is_ok() {
                    created += 1;
                }
            }
            created
        }));
    }

    let mut created = 0;
    for h in handles {
        created += h.await.unwrap_or(0);
    }
    let elapsed = start.elapsed();
    println!(
        "  {lanes} lanes x {clicks_per_lane} clicks: {created} created in {:.2}s",
        elapsed.as_secs_f64()
    );
}

#[tokio::main]
async fn main() {
    println!("=== timelane stress benchmark ===");

    println!("\n[phase 1] neighbor lookup");
    phase1_neighbor_lookup(1_000);
    phase1_neighbor_lookup(50_000);

    println!("\n[phase 2] copy-on-write resize commits");
    phase2_commit_resize(10_000);

    println!("\n[phase 3] concurrent clicks through the board");
    phase3_concurrent_board(16, 500).await;

    println!("\n=== benchmark complete ===");
}
