#![no_main]

use libfuzzer_sys::fuzz_target;
use netflow9_decoder::{PacketDecoder, TemplateCache};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let decoder = PacketDecoder::new(Arc::new(TemplateCache::new()));
    decoder.decode(data);
});
