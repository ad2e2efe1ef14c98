#![no_main]

use libfuzzer_sys::fuzz_target;
use pagesim::ds::FrequencyBuckets;

// Fuzz arbitrary operation sequences on FrequencyBuckets
//
// Random sequences of insert, touch, remove, pop_min, peek and clear, with
// the bucket invariants checked after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut buckets: FrequencyBuckets<u32, u32> = FrequencyBuckets::new();

    let mut idx = 0;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = u32::from(data[idx + 1]);
        let value = u32::from(data[idx + 2]);

        match op {
            0 => {
                buckets.insert(key, value);
            }
            1 => {
                buckets.touch(&key);
            }
            2 => {
                buckets.remove(&key);
            }
            3 => {
                buckets.pop_min();
            }
            4 => {
                let _ = buckets.peek_min_key();
            }
            5 => {
                let _ = buckets.get(&key);
            }
            6 => {
                let _ = buckets.iter().count();
            }
            7 => {
                buckets.clear();
            }
            _ => unreachable!(),
        }

        buckets.check_invariants().unwrap();

        if buckets.is_empty() {
            assert_eq!(buckets.min_freq(), None);
            assert_eq!(buckets.peek_min_key(), None);
        } else {
            assert!(buckets.min_freq().is_some());
            assert!(buckets.peek_min_key().is_some());
        }

        if buckets.contains(&key) {
            assert!(buckets.frequency(&key).unwrap() >= 1);
        }

        idx += 3;
    }
});
