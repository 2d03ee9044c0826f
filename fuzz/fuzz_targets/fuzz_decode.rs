#![no_main]

use attribute_wire::{wire_host, ByteSource, Engine, Schema, StrategyKind};
use libfuzzer_sys::fuzz_target;
use std::net::Ipv6Addr;

#[derive(Debug, Default)]
struct Frame {
    kind: Option<u8>,
    flag: Option<bool>,
    glyph: Option<char>,
    name: Option<String>,
    blob: Option<Vec<u8>>,
    peer: Option<Ipv6Addr>,
}

wire_host!(Frame {
    kind: u8,
    flag: bool,
    glyph: char,
    name: String,
    blob: Vec<u8>,
    peer: Ipv6Addr,
});

fuzz_target!(|data: &[u8]| {
    let Ok(schema) = Schema::builder::<Frame>()
        .required::<u8>("kind")
        .required::<bool>("flag")
        .optional::<char>("glyph")
        .optional::<String>("name")
        .optional::<Vec<u8>>("blob")
        .optional::<Ipv6Addr>("peer")
        .build()
    else {
        return;
    };

    // Arbitrary bytes must produce an error or a partial host, never a panic.
    for strategy in [StrategyKind::Reflective, StrategyKind::Compiled] {
        let engine = Engine::global().with_strategy(strategy);
        let mut source = ByteSource::new(data.to_vec());
        let mut frame = Frame::default();
        let _ = engine.deserialize_all(&mut source, &mut frame, &schema);
    }
});
