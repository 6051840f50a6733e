// lib.rs
//
// icc-resolver: find the ICC color profile describing a JPEG or PNG file.
//
// Design goals:
// - One call, one answer: resolve_profile() always returns a usable profile
// - Untrusted input: every read is bounds-checked, decoder failures are contained
// - Nothing outlives the call except the returned profile

//! Resolve the color space of an image file as an ICC profile.
//!
//! ```no_run
//! let profile = icc_resolver::resolve_profile("photo.jpg");
//! println!("{}", profile.describe());
//! let lcms_profile = profile.into_lcms();
//! # drop(lcms_profile);
//! ```
//!
//! Sources are tried in a fixed order: the EXIF `InterColorProfile` tag, then
//! the PNG `iCCP`/`sRGB`/`cHRM`+`gAMA` chunks or the JPEG `APP2` ICC segments,
//! and finally the sRGB profile built into Little CMS.

pub mod error;
pub mod resolver;

pub use error::{ErrorCategory, ProbeError, ProbeResult};
pub use resolver::{
    resolve_profile, Chromaticity, ColorProfile, Container, Primaries, ProfileSource, Resolver,
    ResolverConfig,
};
