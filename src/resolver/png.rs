// src/resolver/png.rs
//
// PNG probe: walks the ancillary chunks ahead of the pixel stream looking for
// iCCP, sRGB, cHRM and gAMA. CRCs are not verified.

use crate::error::ProbeError;
use crate::resolver::common::{log_miss, ProbeResult};
use crate::resolver::config::ResolverConfig;
use crate::resolver::profile::{
    self, Chromaticity, ColorProfile, Container, Primaries, D65, DEFAULT_GAMMA, SRGB_PRIMARIES,
};
use flate2::{Decompress, FlushDecompress, Status};
use tracing::trace;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// length (4) + type (4)
const CHUNK_HEADER_LEN: usize = 8;
/// header + CRC (4)
const CHUNK_OVERHEAD: u64 = 12;
/// cHRM and gAMA store values in units of 1/100000.
const FIXED_POINT_SCALE: f64 = 100_000.0;
const INITIAL_INFLATE_CAPACITY: usize = 16 * 1024;

pub fn has_png_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Look for a color description in a PNG. Only meaningful when the signature
/// matched; returns None otherwise.
pub fn try_png(bytes: &[u8], config: &ResolverConfig) -> Option<ColorProfile> {
    if !has_png_signature(bytes) {
        return None;
    }
    log_miss("png", probe_png(bytes, config))
}

fn probe_png(bytes: &[u8], config: &ResolverConfig) -> ProbeResult<Option<ColorProfile>> {
    let mut colors = ChunkColors::default();

    for header in ChunkHeaders::new(bytes) {
        let header = header?;
        trace!(
            target: "icc_resolver::png",
            offset = header.offset,
            kind = %String::from_utf8_lossy(&header.kind),
            length = header.length,
            "chunk"
        );

        // Metadata may not follow the critical stream.
        if matches!(&header.kind, b"IEND" | b"IDAT" | b"PLTE") {
            break;
        }

        let payload = header.payload(bytes)?;
        match &header.kind {
            b"iCCP" => {
                let stream = iccp_stream(payload)?;
                let icc = inflate(stream, config)?;
                return profile::from_blob(&icc, Container::Png).map(Some);
            }
            b"sRGB" => return Ok(Some(profile::srgb_chunk())),
            b"cHRM" => skip_malformed(colors.apply_chrm(payload)),
            b"gAMA" => skip_malformed(colors.apply_gama(payload)),
            _ => {}
        }
    }

    if !colors.custom {
        return Ok(None);
    }
    profile::from_primaries(colors.white, colors.primaries, colors.gamma).map(Some)
}

fn skip_malformed(result: ProbeResult<()>) {
    if let Err(err) = result {
        trace!(target: "icc_resolver::png", error = %err, "skipping chunk");
    }
}

/// Header of one chunk. `offset` points at the length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChunkHeader {
    offset: usize,
    length: u32,
    kind: [u8; 4],
}

impl ChunkHeader {
    /// Payload slice, provided payload and CRC both fit in `bytes`.
    fn payload<'a>(&self, bytes: &'a [u8]) -> ProbeResult<&'a [u8]> {
        let end = self.offset as u64 + CHUNK_OVERHEAD + u64::from(self.length);
        if end > bytes.len() as u64 {
            return Err(ProbeError::chunk_out_of_bounds(
                self.offset,
                u64::from(self.length),
                bytes.len(),
            ));
        }
        let start = self.offset + CHUNK_HEADER_LEN;
        Ok(&bytes[start..start + self.length as usize])
    }
}

/// Chunk headers from offset 8 until the bytes run out. A header that does
/// not fit is reported once, then iteration stops.
struct ChunkHeaders<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkHeaders<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: PNG_SIGNATURE.len(),
            done: false,
        }
    }
}

impl Iterator for ChunkHeaders<'_> {
    type Item = ProbeResult<ChunkHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.bytes.len() {
            return None;
        }
        let Some(raw) = self.bytes.get(self.pos..self.pos + CHUNK_HEADER_LEN) else {
            self.done = true;
            let available = self.bytes.len() - self.pos;
            return Some(Err(ProbeError::chunk_out_of_bounds(
                self.pos,
                CHUNK_HEADER_LEN as u64,
                available,
            )));
        };

        let header = ChunkHeader {
            offset: self.pos,
            length: u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            kind: [raw[4], raw[5], raw[6], raw[7]],
        };

        let next = self.pos as u64 + CHUNK_OVERHEAD + u64::from(header.length);
        match usize::try_from(next) {
            Ok(next) => self.pos = next,
            Err(_) => self.done = true,
        }
        Some(Ok(header))
    }
}

/// Values gathered from cHRM/gAMA, starting from sRGB-like defaults.
#[derive(Debug, Clone, PartialEq)]
struct ChunkColors {
    white: Chromaticity,
    primaries: Primaries,
    gamma: f64,
    custom: bool,
}

impl Default for ChunkColors {
    fn default() -> Self {
        Self {
            white: D65,
            primaries: SRGB_PRIMARIES,
            gamma: DEFAULT_GAMMA,
            custom: false,
        }
    }
}

impl ChunkColors {
    fn apply_chrm(&mut self, payload: &[u8]) -> ProbeResult<()> {
        if payload.len() < 32 {
            return Err(ProbeError::malformed_chunk(
                "cHRM",
                format!("expected 32 bytes, found {}", payload.len()),
            ));
        }
        let point = |i: usize| {
            Chromaticity::new(
                fixed_point(payload, i * 8),
                fixed_point(payload, i * 8 + 4),
            )
        };
        self.white = point(0);
        self.primaries = Primaries {
            red: point(1),
            green: point(2),
            blue: point(3),
        };
        self.custom = true;
        Ok(())
    }

    fn apply_gama(&mut self, payload: &[u8]) -> ProbeResult<()> {
        if payload.len() < 4 {
            return Err(ProbeError::malformed_chunk(
                "gAMA",
                format!("expected 4 bytes, found {}", payload.len()),
            ));
        }
        let encoding = fixed_point(payload, 0);
        if encoding <= 0.0 {
            return Err(ProbeError::malformed_chunk("gAMA", "gamma of zero"));
        }
        // gAMA stores the encoding exponent; the tone curve wants its reciprocal.
        self.gamma = 1.0 / encoding;
        self.custom = true;
        Ok(())
    }
}

/// Big-endian u32 at `at`, scaled down by 100000. Caller checked the length.
fn fixed_point(payload: &[u8], at: usize) -> f64 {
    let raw = u32::from_be_bytes([
        payload[at],
        payload[at + 1],
        payload[at + 2],
        payload[at + 3],
    ]);
    f64::from(raw) / FIXED_POINT_SCALE
}

/// Skip `name NUL compression_method` and return the zlib stream.
fn iccp_stream(payload: &[u8]) -> ProbeResult<&[u8]> {
    let nul = payload
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ProbeError::malformed_chunk("iCCP", "profile name is not terminated"))?;
    payload
        .get(nul + 2..)
        .ok_or_else(|| ProbeError::malformed_chunk("iCCP", "missing compression method"))
}

/// Inflate a complete zlib stream into a buffer that starts at 16 KiB and
/// doubles whenever the decoder runs out of room.
///
/// The buffer may reach one byte past the cap so a stream that stops exactly
/// at the cap can still report its end.
pub(crate) fn inflate(input: &[u8], config: &ResolverConfig) -> ProbeResult<Vec<u8>> {
    let limit = config.icc_cap().saturating_add(1);
    let mut stream = Decompress::new(true);
    let mut out = Vec::with_capacity(INITIAL_INFLATE_CAPACITY.min(limit));

    loop {
        let (in_before, out_before) = (stream.total_in(), stream.total_out());
        let remaining = input.get(in_before as usize..).unwrap_or(&[]);
        // Streaming mode: the decoder keeps its state across calls, so the
        // buffer can grow between them.
        let status = stream
            .decompress_vec(remaining, &mut out, FlushDecompress::None)
            .map_err(|e| ProbeError::inflate_failed(e.to_string()))?;

        if status == Status::StreamEnd {
            config.enforce_icc_len(out.len())?;
            return Ok(out);
        }

        if out.len() == out.capacity() {
            if out.len() >= limit {
                return Err(ProbeError::icc_too_large(
                    out.len() as u64,
                    config.max_icc_bytes.unwrap_or(u64::MAX),
                ));
            }
            let target = out.capacity().saturating_mul(2).clamp(1, limit);
            out.reserve_exact(target - out.len());
            continue;
        }

        let stalled = stream.total_in() == in_before && stream.total_out() == out_before;
        if stalled {
            return Err(ProbeError::inflate_failed("stream ended before completion"));
        }
    }
}
