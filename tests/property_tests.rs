//! Property-based tests using proptest
//!
//! Every built-in codec must reconstruct what it wrote when driven through the engine,
//! and any prefix of a valid frame must decode without failing on the optional tail.
//!
//! Optional attributes are positional: an absent one is not marked on the wire, so
//! generated hosts only ever leave a trailing run of optionals unset.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use attribute_wire::{
    wire_host, ByteSource, CodecRegistry, Engine, FieldAccessFactory, Schema, StrategyKind,
};
use bytes::Bytes;
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Everything {
    flag: Option<bool>,
    small: Option<u8>,
    signed_small: Option<i8>,
    port: Option<u16>,
    delta: Option<i16>,
    seq: Option<u32>,
    id: Option<i32>,
    stamp: Option<u64>,
    offset: Option<i64>,
    ratio: Option<f32>,
    precise: Option<f64>,
    glyph: Option<char>,
    name: Option<String>,
    blob: Option<Vec<u8>>,
    chunk: Option<Bytes>,
    v4: Option<Ipv4Addr>,
    v6: Option<Ipv6Addr>,
}

wire_host!(Everything {
    flag: bool,
    small: u8,
    signed_small: i8,
    port: u16,
    delta: i16,
    seq: u32,
    id: i32,
    stamp: u64,
    offset: i64,
    ratio: f32,
    precise: f64,
    glyph: char,
    name: String,
    blob: Vec<u8>,
    chunk: Bytes,
    v4: Ipv4Addr,
    v6: Ipv6Addr,
});

fn schema() -> Schema {
    Schema::builder::<Everything>()
        .required::<bool>("flag")
        .required::<u8>("small")
        .required::<i8>("signed_small")
        .required::<u16>("port")
        .required::<i16>("delta")
        .required::<u32>("seq")
        .required::<i32>("id")
        .required::<u64>("stamp")
        .required::<i64>("offset")
        .required::<f32>("ratio")
        .required::<f64>("precise")
        .required::<char>("glyph")
        .optional::<String>("name")
        .optional::<Vec<u8>>("blob")
        .optional::<Bytes>("chunk")
        .optional::<Ipv4Addr>("v4")
        .optional::<Ipv6Addr>("v6")
        .build()
        .unwrap()
}

fn engine(strategy: StrategyKind) -> Engine {
    Engine::new(
        Arc::new(CodecRegistry::with_defaults()),
        Arc::new(FieldAccessFactory::new()),
        strategy,
    )
}

prop_compose! {
    fn arb_everything()(
        flag in any::<bool>(),
        small in any::<u8>(),
        signed_small in any::<i8>(),
        port in any::<u16>(),
        delta in any::<i16>(),
        seq in any::<u32>(),
        id in any::<i32>(),
        stamp in any::<u64>(),
        offset in any::<i64>(),
        ratio in prop::num::f32::NORMAL,
        precise in prop::num::f64::NORMAL,
        glyph in any::<char>(),
        name in ".{0,40}",
        blob in prop::collection::vec(any::<u8>(), 0..256),
        chunk in prop::collection::vec(any::<u8>(), 0..64),
        v4 in any::<[u8; 4]>(),
        v6 in any::<[u8; 16]>(),
        present in 0usize..=5,
    ) -> Everything {
        Everything {
            flag: Some(flag),
            small: Some(small),
            signed_small: Some(signed_small),
            port: Some(port),
            delta: Some(delta),
            seq: Some(seq),
            id: Some(id),
            stamp: Some(stamp),
            offset: Some(offset),
            ratio: Some(ratio),
            precise: Some(precise),
            glyph: Some(glyph),
            name: (present > 0).then_some(name),
            blob: (present > 1).then_some(blob),
            chunk: (present > 2).then(|| Bytes::from(chunk)),
            v4: (present > 3).then(|| Ipv4Addr::from(v4)),
            v6: (present > 4).then(|| Ipv6Addr::from(v6)),
        }
    }
}

// Property: Deserialize(Serialize(host)) == host for every codec and both strategies
proptest! {
    #[test]
    fn prop_engine_roundtrip(host in arb_everything()) {
        let schema = schema();
        for strategy in [StrategyKind::Reflective, StrategyKind::Compiled] {
            let engine = engine(strategy);
            let bytes = engine.to_bytes(&host, &schema).expect("Serialization should not fail");
            let decoded: Everything = engine
                .from_bytes(bytes, &schema)
                .expect("Deserialization should not fail");
            prop_assert_eq!(&decoded, &host);
        }
    }
}

// Property: serialization is deterministic
proptest! {
    #[test]
    fn prop_serialization_deterministic(host in arb_everything()) {
        let schema = schema();
        let engine = engine(StrategyKind::Compiled);
        let first = engine.to_bytes(&host, &schema).unwrap();
        let second = engine.to_bytes(&host, &schema).unwrap();
        prop_assert_eq!(first, second);
    }
}

// Property: cutting a frame anywhere after the required block never fails, and the
// first optional attribute is either skipped or decoded intact
proptest! {
    #[test]
    fn prop_truncated_tail_is_tolerated(host in arb_everything(), cut in any::<prop::sample::Index>()) {
        let schema = schema();
        let engine = engine(StrategyKind::Compiled);
        let full = engine.to_bytes(&host, &schema).unwrap();

        // bool + u8 + i8 + u16 + i16 + u32 + i32 + u64 + i64 + f32 + f64 + char
        let required_len = 1 + 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8 + 4 + 8 + 4;
        let len = required_len + cut.index(full.len() - required_len + 1);

        let mut source = ByteSource::new(full.slice(..len));
        let mut decoded = Everything::default();
        engine
            .deserialize_all(&mut source, &mut decoded, &schema)
            .expect("Truncated optional tail must not fail");

        prop_assert_eq!(decoded.id, host.id);
        prop_assert_eq!(decoded.glyph, host.glyph);
        prop_assert_eq!(decoded.stamp, host.stamp);
        if decoded.name.is_some() {
            prop_assert_eq!(&decoded.name, &host.name);
        }
        if len == full.len() {
            prop_assert_eq!(&decoded, &host);
        }
    }
}
