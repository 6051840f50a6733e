#![no_main]

//! Fuzz target for APP2 ICC_PROFILE reassembly.
//! Builds a JPEG header carrying arbitrary APP2 segments ahead of a tiny frame.

use arbitrary::Arbitrary;
use icc_resolver::Resolver;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Segment {
    tagged: bool,
    seq: u8,
    total: u8,
    data: Vec<u8>,
}

// One quantization table, then SOF0 for a 1x1 grayscale frame and EOI.
fn frame() -> Vec<u8> {
    let mut out = vec![0xFF, 0xDB, 0x00, 0x43, 0x00];
    out.extend_from_slice(&[1; 64]);
    out.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    ]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fuzz_target!(|segments: Vec<Segment>| {
    let mut jpeg = vec![0xFF, 0xD8];
    for segment in segments.iter().take(16) {
        let mut payload = Vec::new();
        if segment.tagged {
            payload.extend_from_slice(b"ICC_PROFILE\0");
            payload.push(segment.seq);
            payload.push(segment.total);
        }
        payload.extend_from_slice(&segment.data);
        payload.truncate(u16::MAX as usize - 2);

        jpeg.extend_from_slice(&[0xFF, 0xE2]);
        jpeg.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
        jpeg.extend_from_slice(&payload);
    }
    jpeg.extend_from_slice(&frame());

    let _ = Resolver::default().resolve_bytes(&jpeg);
});
