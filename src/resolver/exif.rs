// src/resolver/exif.rs
//
// EXIF probe: InterColorProfile (0x8773) in IFD0, on any container the EXIF
// reader understands (JPEG, PNG eXIf, TIFF, WebP, HEIF).

use crate::error::ProbeError;
use crate::resolver::common::{log_miss, ProbeResult};
use crate::resolver::config::ResolverConfig;
use crate::resolver::profile::{self, ColorProfile, Container};
use exif::{Context, In, Tag, Value};
use std::io::Cursor;

/// InterColorProfile, TIFF/EP tag 34675.
pub const INTER_COLOR_PROFILE: Tag = Tag(Context::Tiff, 0x8773);

pub fn try_exif(bytes: &[u8], config: &ResolverConfig) -> Option<ColorProfile> {
    log_miss("exif", probe_exif(bytes, config))
}

fn probe_exif(bytes: &[u8], config: &ResolverConfig) -> ProbeResult<Option<ColorProfile>> {
    let icc = match extract_exif_icc(bytes) {
        Ok(icc) => icc,
        // Plain absence is the common case, not a failure worth logging.
        Err(ProbeError::ExifUnavailable { .. } | ProbeError::ExifTagMissing) => return Ok(None),
        Err(err) => return Err(err),
    };
    config.enforce_icc_len(icc.len())?;
    profile::from_blob(&icc, Container::Exif).map(Some)
}

/// Raw InterColorProfile payload from IFD0.
pub(crate) fn extract_exif_icc(bytes: &[u8]) -> ProbeResult<Vec<u8>> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new()
        .read_from_container(&mut cursor)
        .map_err(|e| ProbeError::exif_unavailable(e.to_string()))?;
    let field = exif
        .get_field(INTER_COLOR_PROFILE, In::PRIMARY)
        .ok_or_else(ProbeError::exif_tag_missing)?;

    match &field.value {
        Value::Undefined(data, _) | Value::Byte(data) => Ok(data.clone()),
        other => Err(ProbeError::exif_unavailable(format!(
            "InterColorProfile has unexpected type {other:?}"
        ))),
    }
}
