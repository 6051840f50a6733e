#![no_main]

//! Fuzz target for the PNG chunk walk.
//! Chunks get a correct length field so the walk reaches iCCP/cHRM/gAMA parsing
//! instead of stopping at the first bounds check.

use arbitrary::Arbitrary;
use icc_resolver::Resolver;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Kind {
    Iccp,
    Srgb,
    Chrm,
    Gama,
    Idat,
    Other([u8; 4]),
}

#[derive(Arbitrary, Debug)]
struct Chunk {
    kind: Kind,
    payload: Vec<u8>,
}

fuzz_target!(|chunks: Vec<Chunk>| {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    for chunk in &chunks {
        let kind: [u8; 4] = match chunk.kind {
            Kind::Iccp => *b"iCCP",
            Kind::Srgb => *b"sRGB",
            Kind::Chrm => *b"cHRM",
            Kind::Gama => *b"gAMA",
            Kind::Idat => *b"IDAT",
            Kind::Other(kind) => kind,
        };
        png.extend_from_slice(&(chunk.payload.len() as u32).to_be_bytes());
        png.extend_from_slice(&kind);
        png.extend_from_slice(&chunk.payload);
        png.extend_from_slice(&[0; 4]);
    }

    let _ = Resolver::default().resolve_bytes(&png);
});
