#![no_main]

//! Fuzz target for the whole probe chain.
//! Whatever the input, resolution must end in an RGB profile without panicking.

use icc_resolver::{Resolver, ResolverConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let profile = Resolver::default().resolve_bytes(data);
    assert_eq!(profile.color_space(), lcms2::ColorSpaceSignature::RgbData);

    // The strict cap takes the IccTooLarge paths on big blobs
    let _ = Resolver::new(ResolverConfig::strict()).resolve_bytes(data);

    // JPEG prefix (0xFF 0xD8) to push the data through libjpeg
    if data.len() > 2 {
        let mut jpeg_data = vec![0xFF, 0xD8];
        jpeg_data.extend_from_slice(data);
        let _ = Resolver::default().resolve_bytes(&jpeg_data);
    }
});
