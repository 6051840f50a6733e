// src/resolver.rs
//
// The core of icc-resolver. Given a file, find the color space its pixels are
// encoded in:
// 1. EXIF InterColorProfile (any container)
// 2. PNG: iCCP, sRGB, or cHRM/gAMA synthesis; a PNG never falls through to JPEG
// 3. JPEG: APP2 ICC_PROFILE segments
// 4. sRGB when nothing else produced a profile
//
// This file is a facade over the decomposed modules in resolver/

mod common;
mod config;
mod exif;
mod io;
mod jpeg;
mod png;
mod profile;

pub use common::ProbeResult;
pub use config::ResolverConfig;
pub use self::exif::{try_exif, INTER_COLOR_PROFILE};
pub use io::{map, FileBytes};
pub use jpeg::{try_jpeg, ICC_PROFILE_SIGNATURE};
pub use png::{has_png_signature, try_png, PNG_SIGNATURE};
pub use profile::{
    from_blob, from_primaries, srgb, Chromaticity, ColorProfile, Container, Primaries,
    ProfileSource, D65, DEFAULT_GAMMA, SRGB_PRIMARIES,
};

use std::path::Path;
use tracing::debug;

/// Runs the probe chain. Holds no state besides its configuration, so one
/// resolver can serve any number of threads.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the profile of the file at `path`. Never fails: anything that
    /// goes wrong ends in sRGB.
    pub fn resolve(&self, path: impl AsRef<Path>) -> ColorProfile {
        let path = path.as_ref();
        let profile = match io::map(path) {
            // `bytes` is unmapped when this arm ends, whichever probe answered.
            Ok(bytes) => self.resolve_bytes(bytes.as_bytes()),
            Err(err) => {
                debug!(target: "icc_resolver", path = %path.display(), error = %err, "cannot map file");
                profile::srgb()
            }
        };
        debug!(
            target: "icc_resolver",
            path = %path.display(),
            profile = %profile.describe(),
            "resolved"
        );
        profile
    }

    /// Run the probe chain over bytes already in memory.
    pub fn resolve_bytes(&self, bytes: &[u8]) -> ColorProfile {
        self.probe(bytes).unwrap_or_else(profile::srgb)
    }

    fn probe(&self, bytes: &[u8]) -> Option<ColorProfile> {
        if self.config.read_exif {
            if let Some(found) = exif::try_exif(bytes, &self.config) {
                return Some(found);
            }
        }
        if png::has_png_signature(bytes) {
            return png::try_png(bytes, &self.config);
        }
        jpeg::try_jpeg(bytes, &self.config)
    }
}

/// Resolve with the default configuration.
pub fn resolve_profile(path: impl AsRef<Path>) -> ColorProfile {
    Resolver::default().resolve(path)
}
