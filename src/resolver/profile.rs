// src/resolver/profile.rs
//
// Profile factory: the only place that talks to Little CMS.
// Every constructor returns a fresh, independently owned handle.

use crate::error::ProbeError;
use crate::resolver::common::ProbeResult;
use lcms2::{CIExyY, CIExyYTRIPLE, ColorSpaceSignature, Profile, ToneCurve};
use std::fmt;

/// CIE xy chromaticity coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

impl Chromaticity {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_valid(&self) -> bool {
        let in_range = |v: f64| v.is_finite() && v > 0.0 && v < 1.0;
        in_range(self.x) && in_range(self.y)
    }

    /// As an xyY triple with luminance fixed at 1.0.
    fn to_xyy(self) -> CIExyY {
        CIExyY {
            x: self.x,
            y: self.y,
            Y: 1.0,
        }
    }
}

/// Red, green and blue primaries of an RGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
}

impl Primaries {
    fn to_triple(self) -> CIExyYTRIPLE {
        CIExyYTRIPLE {
            Red: self.red.to_xyy(),
            Green: self.green.to_xyy(),
            Blue: self.blue.to_xyy(),
        }
    }
}

/// CIE standard illuminant D65.
pub const D65: Chromaticity = Chromaticity::new(0.3127, 0.3290);

/// ITU-R BT.709 / sRGB primaries.
pub const SRGB_PRIMARIES: Primaries = Primaries {
    red: Chromaticity::new(0.64, 0.33),
    green: Chromaticity::new(0.30, 0.60),
    blue: Chromaticity::new(0.15, 0.06),
};

/// Display gamma assumed when only chromaticities are known.
pub const DEFAULT_GAMMA: f64 = 2.2;

/// Where an embedded ICC blob was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// InterColorProfile tag in EXIF IFD0
    Exif,
    /// PNG iCCP chunk
    Png,
    /// JPEG APP2 ICC_PROFILE segments
    Jpeg,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Exif => "EXIF",
            Container::Png => "PNG iCCP",
            Container::Jpeg => "JPEG APP2",
        }
    }
}

/// How a resolved profile came to be.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileSource {
    /// Parsed from an ICC blob embedded in the file.
    Embedded { container: Container, len: usize },
    /// PNG sRGB chunk.
    SrgbChunk,
    /// Built from PNG cHRM/gAMA values.
    Synthesized {
        white: Chromaticity,
        primaries: Primaries,
        gamma: f64,
    },
    /// Nothing usable was found.
    Fallback,
}

/// Owned ICC profile handle plus a note on where it came from.
pub struct ColorProfile {
    inner: Profile,
    source: ProfileSource,
}

impl ColorProfile {
    pub fn source(&self) -> &ProfileSource {
        &self.source
    }

    /// True for both the PNG sRGB chunk and the fallback.
    pub fn is_srgb(&self) -> bool {
        matches!(
            self.source,
            ProfileSource::SrgbChunk | ProfileSource::Fallback
        )
    }

    pub fn as_lcms(&self) -> &Profile {
        &self.inner
    }

    pub fn into_lcms(self) -> Profile {
        self.inner
    }

    pub fn color_space(&self) -> ColorSpaceSignature {
        self.inner.color_space()
    }

    /// Serialize through the ICC library. Not guaranteed byte-identical to
    /// the embedded blob the profile was parsed from.
    pub fn icc(&self) -> ProbeResult<Vec<u8>> {
        self.inner
            .icc()
            .map_err(|e| ProbeError::icc_rejected(format!("serialization failed: {e}")))
    }

    pub fn describe(&self) -> String {
        match &self.source {
            ProfileSource::Embedded { container, len } => {
                format!("ICC from {} ({len} bytes)", container.as_str())
            }
            ProfileSource::SrgbChunk => "sRGB (PNG sRGB chunk)".to_string(),
            ProfileSource::Synthesized {
                white,
                primaries,
                gamma,
            } => format!(
                "gAMA({gamma:.5})+cHRM(wp={:.4},{:.4} r={:.4},{:.4} g={:.4},{:.4} b={:.4},{:.4})",
                white.x,
                white.y,
                primaries.red.x,
                primaries.red.y,
                primaries.green.x,
                primaries.green.y,
                primaries.blue.x,
                primaries.blue.y,
            ),
            ProfileSource::Fallback => "sRGB (fallback)".to_string(),
        }
    }
}

impl fmt::Debug for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorProfile")
            .field("source", &self.source)
            .field("color_space", &self.inner.color_space())
            .finish()
    }
}

/// Parse an ICC blob. The blob is copied; the caller may drop it right after.
pub fn from_blob(bytes: &[u8], container: Container) -> ProbeResult<ColorProfile> {
    let inner = Profile::new_icc(bytes).map_err(|e| ProbeError::icc_rejected(e.to_string()))?;
    Ok(ColorProfile {
        inner,
        source: ProfileSource::Embedded {
            container,
            len: bytes.len(),
        },
    })
}

/// The sRGB profile built into the ICC library.
pub fn srgb() -> ColorProfile {
    ColorProfile {
        inner: Profile::new_srgb(),
        source: ProfileSource::Fallback,
    }
}

/// sRGB attributed to a PNG sRGB chunk.
pub(crate) fn srgb_chunk() -> ColorProfile {
    ColorProfile {
        inner: Profile::new_srgb(),
        source: ProfileSource::SrgbChunk,
    }
}

/// Build an RGB profile from a white point, primaries and one shared gamma curve.
pub fn from_primaries(
    white: Chromaticity,
    primaries: Primaries,
    gamma: f64,
) -> ProbeResult<ColorProfile> {
    for (name, point) in [
        ("white", white),
        ("red", primaries.red),
        ("green", primaries.green),
        ("blue", primaries.blue),
    ] {
        if !point.is_valid() {
            return Err(ProbeError::profile_build_failed(format!(
                "{name} chromaticity ({}, {}) outside (0, 1)",
                point.x, point.y
            )));
        }
    }
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(ProbeError::profile_build_failed(format!(
            "gamma {gamma} is not a positive number"
        )));
    }

    // One curve shared by all three channels; freed when `curve` drops,
    // whether or not the build succeeds.
    let curve = ToneCurve::new(gamma);
    let inner = Profile::new_rgb(
        &white.to_xyy(),
        &primaries.to_triple(),
        &[&curve, &curve, &curve],
    )
    .map_err(|e| ProbeError::profile_build_failed(e.to_string()))?;

    Ok(ColorProfile {
        inner,
        source: ProfileSource::Synthesized {
            white,
            primaries,
            gamma,
        },
    })
}
