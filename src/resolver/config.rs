// src/resolver/config.rs
//
// Resolver configuration: which probes run and how large an ICC blob may get.

use crate::error::{ProbeError, ProbeResult};

const DEFAULT_MAX_ICC_BYTES: u64 = 64 * 1024 * 1024; // 64MB, far above any real profile
const STRICT_MAX_ICC_BYTES: u64 = 4 * 1024 * 1024; // 4MB covers LUT-heavy printer profiles

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Run the EXIF probe before the container-specific probes.
    pub read_exif: bool,
    /// Upper bound for any ICC blob a probe produces. `None` disables the cap.
    pub max_icc_bytes: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            read_exif: true,
            max_icc_bytes: Some(DEFAULT_MAX_ICC_BYTES),
        }
    }
}

impl ResolverConfig {
    pub fn strict() -> Self {
        Self {
            read_exif: true,
            max_icc_bytes: Some(STRICT_MAX_ICC_BYTES),
        }
    }

    pub fn with_max_icc_bytes(mut self, max: Option<u64>) -> Self {
        self.max_icc_bytes = max;
        self
    }

    pub fn with_exif(mut self, enabled: bool) -> Self {
        self.read_exif = enabled;
        self
    }

    pub fn enforce_icc_len(&self, len: usize) -> ProbeResult<()> {
        if let Some(max) = self.max_icc_bytes {
            let len_u64 = len as u64;
            if len_u64 > max {
                return Err(ProbeError::icc_too_large(len_u64, max));
            }
        }
        Ok(())
    }

    /// The cap as a buffer size; `usize::MAX` when uncapped.
    pub(crate) fn icc_cap(&self) -> usize {
        self.max_icc_bytes
            .map_or(usize::MAX, |max| usize::try_from(max).unwrap_or(usize::MAX))
    }
}
