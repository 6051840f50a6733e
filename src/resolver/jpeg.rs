// src/resolver/jpeg.rs
//
// JPEG probe: libjpeg-turbo (via mozjpeg) reads the header with APP2 markers
// saved, then the ICC_PROFILE segments are stitched back together.

use crate::error::ProbeError;
use crate::resolver::common::{log_miss, run_with_panic_policy, ProbeResult};
use crate::resolver::config::ResolverConfig;
use crate::resolver::profile::{self, ColorProfile, Container};
use mozjpeg::{Decompress, Marker};

/// Signature that opens every ICC-carrying APP2 segment.
pub const ICC_PROFILE_SIGNATURE: &[u8; 12] = b"ICC_PROFILE\0";
/// signature + sequence number + segment count
const ICC_SEGMENT_OVERHEAD: usize = ICC_PROFILE_SIGNATURE.len() + 2;

const SAVED_MARKERS: &[Marker] = &[Marker::APP(2)];

pub fn try_jpeg(bytes: &[u8], config: &ResolverConfig) -> Option<ColorProfile> {
    log_miss("jpeg", probe_jpeg(bytes, config))
}

fn probe_jpeg(bytes: &[u8], config: &ResolverConfig) -> ProbeResult<Option<ColorProfile>> {
    let Some(icc) = read_app2_icc(bytes)? else {
        return Ok(None);
    };
    config.enforce_icc_len(icc.len())?;
    profile::from_blob(&icc, Container::Jpeg).map(Some)
}

/// Read only the header and return the reassembled ICC profile, if any.
///
/// libjpeg's fatal error hook unwinds out of the decoder; the panic policy
/// catches it after the decoder has been dropped.
pub(crate) fn read_app2_icc(bytes: &[u8]) -> ProbeResult<Option<Vec<u8>>> {
    run_with_panic_policy("jpeg:header", || {
        let decompress = Decompress::builder()
            .with_markers(SAVED_MARKERS)
            .from_mem(bytes)
            .map_err(|e| ProbeError::jpeg_decode_failed(e.to_string()))?;

        let segments = decompress
            .markers()
            .filter(|m| m.marker == Marker::APP(2))
            .map(|m| m.data);
        assemble_icc(segments)
    })
}

/// Concatenate ICC_PROFILE segments in sequence order.
///
/// Every segment must carry the same count, sequence numbers run 1..=count
/// with no gaps or repeats. Segments without the signature are ignored.
/// Returns `Ok(None)` when no ICC segment exists at all.
pub(crate) fn assemble_icc<'a, I>(segments: I) -> ProbeResult<Option<Vec<u8>>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut count: Option<u8> = None;
    let mut parts: Vec<Option<&'a [u8]>> = Vec::new();

    for data in segments {
        if data.len() < ICC_SEGMENT_OVERHEAD || !data.starts_with(ICC_PROFILE_SIGNATURE) {
            continue;
        }
        let seq = data[ICC_PROFILE_SIGNATURE.len()];
        let total = data[ICC_PROFILE_SIGNATURE.len() + 1];

        match count {
            None => {
                count = Some(total);
                parts = vec![None; usize::from(total)];
            }
            Some(expected) if expected != total => {
                return Err(ProbeError::icc_segments_invalid(format!(
                    "segment count changed from {expected} to {total}"
                )));
            }
            Some(_) => {}
        }

        if seq == 0 || seq > total {
            return Err(ProbeError::icc_segments_invalid(format!(
                "sequence number {seq} outside 1..={total}"
            )));
        }
        let slot = &mut parts[usize::from(seq - 1)];
        if slot.is_some() {
            return Err(ProbeError::icc_segments_invalid(format!(
                "duplicate sequence number {seq}"
            )));
        }
        *slot = Some(&data[ICC_SEGMENT_OVERHEAD..]);
    }

    let Some(total) = count else {
        return Ok(None);
    };
    if total == 0 {
        return Err(ProbeError::icc_segments_invalid("segment count of zero"));
    }

    let mut icc = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let part = part.ok_or_else(|| {
            ProbeError::icc_segments_invalid(format!("missing segment {} of {total}", i + 1))
        })?;
        icc.extend_from_slice(part);
    }
    if icc.is_empty() {
        return Err(ProbeError::icc_segments_invalid("segments carry no data"));
    }
    Ok(Some(icc))
}
