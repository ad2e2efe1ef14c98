#![no_main]

use libfuzzer_sys::fuzz_target;
use pagesim::builder::{CacheBuilder, CachePolicy};
use pagesim::sim::replay;
use pagesim::traits::PagingCache;

// Replay an arbitrary trace through every engine
//
// The first byte picks the capacity; the rest is the trace. Checks the
// capacity bound, structure invariants, and that Ideal never loses to an
// online policy.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16);
    let trace: Vec<u8> = rest.iter().map(|b| b % 32).collect();

    let mut hits = Vec::with_capacity(CachePolicy::ALL.len());
    for policy in CachePolicy::ALL {
        let mut cache = CacheBuilder::new(capacity).build::<u8, u8>(policy);
        let report = replay(&mut cache, &trace, |k| *k);
        assert!(cache.len() <= capacity);
        assert_eq!(report.loads, report.misses);
        cache.check_invariants().unwrap();
        hits.push((policy, report.hits));
    }

    let ideal = hits
        .iter()
        .find(|(policy, _)| *policy == CachePolicy::Ideal)
        .map(|(_, hits)| *hits)
        .unwrap();
    for (policy, count) in &hits {
        assert!(ideal >= *count, "{policy} beat ideal");
    }
});
