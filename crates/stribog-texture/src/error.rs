//! Error types for texture container parsing.

use thiserror::Error;

/// Errors that can occur when parsing a texture container.
///
/// Every variant is terminal for the parse that produced it: no partially
/// populated descriptor is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error (short reads).
    #[error("{0}")]
    Common(#[from] stribog_common::Error),

    /// The first four bytes match neither the DDS nor the KTX magic.
    #[error("unknown texture format")]
    UnknownMagic,

    /// Fewer than 124 header bytes were readable, or the header size field
    /// did not equal 124.
    #[error("dds: header size does not match")]
    DdsHeaderSize,

    /// Required CAPS/HEIGHT/WIDTH/PIXELFORMAT header flags are missing.
    #[error("dds: header has invalid flags")]
    DdsInvalidFlags,

    /// The pixel format sub-header size field did not equal 32.
    #[error("dds: pixel format header is invalid")]
    DdsInvalidPixelFormat,

    /// The TEXTURE capability bit is not set.
    #[error("dds: unsupported caps")]
    DdsUnsupportedCaps,

    /// The cubemap bit is set without all six face bits.
    #[error("dds: incomplete cubemap")]
    DdsIncompleteCubemap,

    /// Cubemap and volume texture bits are both set.
    #[error("dds: cubemap and volume texture are mutually exclusive")]
    DdsCubemapVolume,

    /// No translation table matched the pixel format.
    #[error("dds: unknown format")]
    DdsUnknownFormat,

    /// Short read of the KTX header.
    #[error("ktx: header size does not match")]
    KtxHeaderSize,

    /// The 12-byte KTX identifier does not match.
    #[error("ktx: invalid identifier")]
    KtxInvalidId,

    /// The endianness marker indicates a little-endian file.
    #[error("ktx: little-endian files are not supported")]
    KtxEndianUnsupported,

    /// The face count is neither 1 nor 6.
    #[error("ktx: incomplete cubemap")]
    KtxIncompleteCubemap,

    /// The GL internal format is not one we can translate.
    #[error("ktx: unsupported format")]
    KtxUnknownFormat,
}

/// Result type for texture parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
