#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary source must compile or fail with an error, never panic
    let _ = otmq::script::compile(data);
});
