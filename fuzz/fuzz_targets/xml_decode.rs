#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlnode::{from_slice, Options};

fuzz_target!(|data: &[u8]| {
    let options = Options::default().with_max_nesting_depth(64);
    let _ = from_slice(data, &options);
});
