#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlnode::{from_slice, from_str, to_string, Options};

fuzz_target!(|data: &[u8]| {
    let options = Options::default().with_max_nesting_depth(64);
    let Ok(node) = from_slice(data, &options) else {
        return;
    };
    // Array wrappers can add a level, so encoding may legitimately hit the limit
    let Ok(xml) = to_string(&node, &options) else {
        return;
    };
    // Attributes merged with children can exceed the per-tag child limit
    let relaxed = Options::default().with_max_child_count(usize::MAX);
    if let Err(err) = from_str(&xml, &relaxed) {
        panic!("encoder output failed to decode: {err}\n{xml}");
    }
});
