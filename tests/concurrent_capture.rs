//! Concurrent capture into a shared trace buffer.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

use tracebuf::{lval, record, DecodedValue, TraceBuffer};

use common::decode_all;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: u64 = 2_000;

fn unlabel(value: &DecodedValue) -> &DecodedValue {
    match value {
        DecodedValue::Labeled { value, .. } => value,
        other => other,
    }
}

#[test]
fn test_concurrent_captures_do_not_corrupt() {
    let buffer = Arc::new(TraceBuffer::new());
    let barrier = Arc::new(Barrier::new(THREADS));
    let mut handles = vec![];

    for worker in 0..THREADS {
        let buffer = Arc::clone(&buffer);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let worker = worker as u32;
            for seq in 0..RECORDS_PER_THREAD {
                // Alternate shapes so handle assignment races too.
                if seq % 2 == 0 {
                    record!(buffer, "Even", lval!(worker), lval!(seq)).unwrap();
                } else {
                    record!(buffer, "Odd", lval!(worker), lval!(seq), "payload").unwrap();
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let bytes = buffer.snapshot();
    let records = decode_all(&buffer, &bytes);
    assert_eq!(records.len(), THREADS * RECORDS_PER_THREAD as usize);
    assert_eq!(buffer.record_count(), records.len());
    assert_eq!(buffer.registry().shape_count(), 2);

    // Each worker's records appear in the order that worker captured them.
    let mut next_seq: HashMap<u64, u64> = HashMap::new();
    for record in &records {
        let worker = match unlabel(&record.values[0]) {
            DecodedValue::UInt(w) => *w,
            other => panic!("unexpected worker value {other:?}"),
        };
        let seq = match unlabel(&record.values[1]) {
            DecodedValue::UInt(s) => *s,
            other => panic!("unexpected seq value {other:?}"),
        };
        let expected = next_seq.entry(worker).or_insert(0);
        assert_eq!(seq, *expected, "worker {worker} out of order");
        *expected += 1;

        let area = if seq % 2 == 0 { "Even" } else { "Odd" };
        assert_eq!(record.area, area);
    }
    assert_eq!(next_seq.len(), THREADS);
    assert!(next_seq.values().all(|&n| n == RECORDS_PER_THREAD));
}

#[test]
fn test_replay_while_capturing() {
    let buffer = Arc::new(TraceBuffer::new());
    let writer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for i in 0..5_000u32 {
                record!(buffer, "Live", i).unwrap();
            }
        })
    };

    // Snapshots taken mid-capture always end on a record boundary.
    for _ in 0..20 {
        let mut lines: Vec<String> = Vec::new();
        let stats = buffer.replay(&mut lines).unwrap();
        assert_eq!(stats.records, lines.len());
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line, &format!("Live -- {i}"));
        }
    }

    writer.join().unwrap();
    assert_eq!(buffer.record_count(), 5_000);
}
