// tests/common/mod.rs
//
// Fixture builders shared by the integration tests. Every input is assembled
// in memory: ICC blobs come from lcms2, JPEGs from mozjpeg, PNGs chunk by chunk.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use img_parts::Bytes;
use lcms2::{CIExyY, CIExyYTRIPLE, Profile, ToneCurve};
use mozjpeg::{ColorSpace, Compress};
use std::io::Write;
use tempfile::NamedTempFile;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// cHRM payload for D65 + sRGB primaries, in units of 1/100000.
pub const SRGB_CHRM: [u32; 8] = [31270, 32900, 64000, 33000, 30000, 60000, 15000, 6000];
/// cHRM payload for D65 + Display P3 primaries.
pub const P3_CHRM: [u32; 8] = [31270, 32900, 68000, 32000, 26500, 69000, 15000, 6000];

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

// ---------------------------------------------------------------------------
// ICC blobs
// ---------------------------------------------------------------------------

fn xyy(x: f64, y: f64) -> CIExyY {
    CIExyY { x, y, Y: 1.0 }
}

pub fn rgb_icc(chrm: [u32; 8], gamma: f64) -> Vec<u8> {
    let v = |i: usize| f64::from(chrm[i]) / 100_000.0;
    let curve = ToneCurve::new(gamma);
    let primaries = CIExyYTRIPLE {
        Red: xyy(v(2), v(3)),
        Green: xyy(v(4), v(5)),
        Blue: xyy(v(6), v(7)),
    };
    Profile::new_rgb(&xyy(v(0), v(1)), &primaries, &[&curve, &curve, &curve])
        .unwrap()
        .icc()
        .unwrap()
}

pub fn srgb_icc() -> Vec<u8> {
    Profile::new_srgb().icc().unwrap()
}

pub fn p3_icc() -> Vec<u8> {
    rgb_icc(P3_CHRM, 2.2)
}

/// RGB profile with three distinct 4096-entry tabulated curves. Inflates to
/// well over 16 KiB, so iCCP fixtures built from it exercise buffer growth.
pub fn tabulated_icc() -> Vec<u8> {
    let table = |exponent: f64| -> Vec<u16> {
        (0..4096u32)
            .map(|i| ((f64::from(i) / 4095.0).powf(exponent) * 65535.0).round() as u16)
            .collect()
    };
    let red = ToneCurve::new_tabulated(&table(1.0));
    let green = ToneCurve::new_tabulated(&table(2.2));
    let blue = ToneCurve::new_tabulated(&table(1.8));
    let v = |i: usize| f64::from(P3_CHRM[i]) / 100_000.0;
    let primaries = CIExyYTRIPLE {
        Red: xyy(v(2), v(3)),
        Green: xyy(v(4), v(5)),
        Blue: xyy(v(6), v(7)),
    };
    Profile::new_rgb(&xyy(v(0), v(1)), &primaries, &[&red, &green, &blue])
        .unwrap()
        .icc()
        .unwrap()
}

/// What lcms2 serializes after parsing `blob`; used to compare resolved profiles.
pub fn reserialized(blob: &[u8]) -> Vec<u8> {
    Profile::new_icc(blob).unwrap().icc().unwrap()
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

pub fn chunk(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 12);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

pub fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

pub fn ihdr() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&[8, 2, 0, 0, 0]);
    chunk(b"IHDR", &payload)
}

/// IDAT + IEND for a 1x1 RGB image.
pub fn pixel_tail() -> Vec<Vec<u8>> {
    vec![chunk(b"IDAT", &zlib(&[0, 255, 0, 0])), chunk(b"IEND", &[])]
}

pub fn chrm(values: [u32; 8]) -> Vec<u8> {
    let payload: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    chunk(b"cHRM", &payload)
}

pub fn gama(value: u32) -> Vec<u8> {
    chunk(b"gAMA", &value.to_be_bytes())
}

pub fn srgb_chunk() -> Vec<u8> {
    chunk(b"sRGB", &[0])
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn iccp(icc: &[u8]) -> Vec<u8> {
    let mut payload = b"embedded\0\0".to_vec();
    payload.extend_from_slice(&zlib(icc));
    chunk(b"iCCP", &payload)
}

pub fn exif_chunk(tiff: &[u8]) -> Vec<u8> {
    chunk(b"eXIf", tiff)
}

// ---------------------------------------------------------------------------
// EXIF
// ---------------------------------------------------------------------------

/// Big-endian TIFF whose IFD0 holds only InterColorProfile.
pub fn tiff_with_icc(icc: &[u8]) -> Vec<u8> {
    let mut out = b"MM\0*".to_vec();
    out.extend_from_slice(&8u32.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0x8773u16.to_be_bytes());
    out.extend_from_slice(&7u16.to_be_bytes()); // UNDEFINED
    out.extend_from_slice(&(icc.len() as u32).to_be_bytes());
    out.extend_from_slice(&26u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(icc);
    out
}

// ---------------------------------------------------------------------------
// JPEG
// ---------------------------------------------------------------------------

pub fn create_valid_jpeg(width: usize, height: usize) -> Vec<u8> {
    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    comp.set_size(width, height);
    comp.set_quality(80.0);
    comp.set_color_space(ColorSpace::JCS_YCbCr);

    let pixels: Vec<u8> = (0..width * height * 3).map(|i| (i % 256) as u8).collect();
    let mut output = Vec::new();
    {
        let mut writer = comp.start_compress(&mut output).unwrap();
        for row in pixels.chunks(width * 3) {
            writer.write_scanlines(row).unwrap();
        }
        writer.finish().unwrap();
    }
    output
}

pub fn icc_segment(seq: u8, total: u8, data: &[u8]) -> Vec<u8> {
    let mut out = b"ICC_PROFILE\0".to_vec();
    out.push(seq);
    out.push(total);
    out.extend_from_slice(data);
    out
}

/// Split `icc` into `parts` APP2 payloads.
pub fn split_icc(icc: &[u8], parts: usize) -> Vec<Vec<u8>> {
    let size = icc.len().div_ceil(parts);
    let chunks: Vec<&[u8]> = icc.chunks(size).collect();
    let total = chunks.len() as u8;
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| icc_segment(i as u8 + 1, total, c))
        .collect()
}

/// Insert (marker, payload) segments right after SOI.
pub fn with_segments(jpeg: Vec<u8>, segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(jpeg)).unwrap();
    for (i, (marker, data)) in segments.iter().enumerate() {
        let seg = JpegSegment::new_with_contents(*marker, Bytes::from(data.clone()));
        jpeg.segments_mut().insert(i, seg);
    }
    let mut out = Vec::new();
    jpeg.encoder().write_to(&mut out).unwrap();
    out
}

pub fn jpeg_with_icc(icc: &[u8], parts: usize) -> Vec<u8> {
    let segments: Vec<(u8, Vec<u8>)> = split_icc(icc, parts)
        .into_iter()
        .map(|s| (markers::APP2, s))
        .collect();
    with_segments(create_valid_jpeg(8, 8), &segments)
}

pub fn app1_exif(tiff: &[u8]) -> (u8, Vec<u8>) {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    (markers::APP1, payload)
}

pub fn app2(payload: Vec<u8>) -> (u8, Vec<u8>) {
    (markers::APP2, payload)
}
