#![no_main]

use libfuzzer_sys::fuzz_target;
use otmq::dictionary::DictionaryStore;

fuzz_target!(|data: &str| {
    // Malformed dictionary text is rejected per file
    let mut store = DictionaryStore::new();
    if store.ingest("fuzz.json", data).is_ok() {
        let _ = otmq::query::run(&otmq::Query::default(), &store.snapshot());
    }
});
