// src/error.rs
//
// Error handling for icc-resolver
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - Io: the file could not be opened or mapped
// - Parse: container bytes are malformed or truncated
// - Library: the ICC library refused a blob or a build
// - ResourceLimit: a configured cap was hit
// - InternalBug: a foreign decoder panicked (should not happen)
//
// None of these ever reach the caller of resolve_profile(); every probe turns
// them into "no profile" and the chain falls through to sRGB.

use std::borrow::Cow;
use thiserror::Error;

/// Coarse classification of a [`ProbeError`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Cannot open, stat or map the file
    Io,
    /// EXIF, PNG chunk, zlib or JPEG structure is unusable
    Parse,
    /// The ICC library rejected a blob or failed to build a profile
    Library,
    /// A configured size cap was exceeded
    ResourceLimit,
    /// A decoder panicked across the probe boundary
    InternalBug,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Io => "io",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Library => "library",
            ErrorCategory::ResourceLimit => "resource_limit",
            ErrorCategory::InternalBug => "internal_bug",
        }
    }
}

/// Internal failure of a single resolution step.
#[derive(Debug, Error)]
pub enum ProbeError {
    // File I/O Errors
    #[error("Failed to open file '{path}': {source}")]
    FileOpenFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to memory-map file '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    // Parse Errors
    #[error("No usable EXIF data: {message}")]
    ExifUnavailable { message: Cow<'static, str> },

    #[error("EXIF data has no InterColorProfile entry in IFD0")]
    ExifTagMissing,

    #[error("PNG chunk at offset {offset} with length {length} exceeds {available} available bytes")]
    ChunkOutOfBounds {
        offset: usize,
        length: u64,
        available: usize,
    },

    #[error("Malformed {chunk} chunk: {message}")]
    MalformedChunk {
        chunk: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Failed to inflate iCCP stream: {message}")]
    InflateFailed { message: Cow<'static, str> },

    #[error("JPEG header could not be read: {message}")]
    JpegDecodeFailed { message: Cow<'static, str> },

    #[error("Invalid ICC_PROFILE segments: {message}")]
    IccSegmentsInvalid { message: Cow<'static, str> },

    // Library Errors
    #[error("ICC library rejected profile: {message}")]
    IccRejected { message: Cow<'static, str> },

    #[error("Failed to build RGB profile: {message}")]
    ProfileBuildFailed { message: Cow<'static, str> },

    // Size Limit Errors
    #[error("ICC profile of {size} bytes exceeds maximum {max}")]
    IccTooLarge { size: u64, max: u64 },

    // Internal Errors
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },
}

// Constructor Helpers
impl ProbeError {
    pub fn file_open_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileOpenFailed {
            path: path.into(),
            source,
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn exif_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ExifUnavailable {
            message: message.into(),
        }
    }

    pub fn exif_tag_missing() -> Self {
        Self::ExifTagMissing
    }

    pub fn chunk_out_of_bounds(offset: usize, length: u64, available: usize) -> Self {
        Self::ChunkOutOfBounds {
            offset,
            length,
            available,
        }
    }

    pub fn malformed_chunk(
        chunk: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::MalformedChunk {
            chunk: chunk.into(),
            message: message.into(),
        }
    }

    pub fn inflate_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InflateFailed {
            message: message.into(),
        }
    }

    pub fn jpeg_decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::JpegDecodeFailed {
            message: message.into(),
        }
    }

    pub fn icc_segments_invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::IccSegmentsInvalid {
            message: message.into(),
        }
    }

    pub fn icc_rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::IccRejected {
            message: message.into(),
        }
    }

    pub fn profile_build_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ProfileBuildFailed {
            message: message.into(),
        }
    }

    pub fn icc_too_large(size: u64, max: u64) -> Self {
        Self::IccTooLarge { size, max }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileOpenFailed { .. } | Self::MmapFailed { .. } => ErrorCategory::Io,

            Self::ExifUnavailable { .. }
            | Self::ExifTagMissing
            | Self::ChunkOutOfBounds { .. }
            | Self::MalformedChunk { .. }
            | Self::InflateFailed { .. }
            | Self::JpegDecodeFailed { .. }
            | Self::IccSegmentsInvalid { .. } => ErrorCategory::Parse,

            Self::IccRejected { .. } | Self::ProfileBuildFailed { .. } => ErrorCategory::Library,

            Self::IccTooLarge { .. } => ErrorCategory::ResourceLimit,

            Self::InternalPanic { .. } => ErrorCategory::InternalBug,
        }
    }
}

// Result type alias
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
