//! KTX v1 container parsing.
//!
//! Wire layout per the Khronos KTX 1 specification: a 12-byte identifier
//! followed by 13 header words, a key/value metadata block, and per-mip
//! payloads each led by a 4-byte image size word. Header and image-size
//! words are decoded big-endian; the endianness marker must carry the
//! big-endian reference value, anything else is rejected.

use stribog_common::BinaryReader;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::TextureFormat;
use crate::texture::{TextureFlags, TextureInfo};
use crate::{Error, Result};

/// First four bytes of the KTX identifier, used for dispatch.
pub const KTX_MAGIC: [u8; 4] = [0xAB, b'K', b'T', b'X'];

/// Remaining eight bytes of the KTX v1 identifier.
pub const KTX_ID_TAIL: [u8; 8] = [b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n'];

/// Expected value of the endianness marker when decoded big-endian.
pub const KTX_ENDIAN_REF: u32 = 0x0403_0201;

type Bu32 = U32<BigEndian>;

/// OpenGL format enums referenced by the translation tables.
pub mod gl {
    pub const ALPHA: u32 = 0x1906;
    pub const RED: u32 = 0x1903;
    pub const RGB: u32 = 0x1907;
    pub const RGBA: u32 = 0x1908;

    pub const COMPRESSED_RGB_S3TC_DXT1_EXT: u32 = 0x83F0;
    pub const COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
    pub const COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
    pub const COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT: u32 = 0x8C4D;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT: u32 = 0x8C4E;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT: u32 = 0x8C4F;
    pub const COMPRESSED_RED_RGTC1: u32 = 0x8DBB;
    pub const COMPRESSED_RG_RGTC2: u32 = 0x8DBD;
    pub const COMPRESSED_RGBA_BPTC_UNORM_ARB: u32 = 0x8E8C;
    pub const COMPRESSED_SRGB_ALPHA_BPTC_UNORM_ARB: u32 = 0x8E8D;
    pub const COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT_ARB: u32 = 0x8E8F;
    pub const ETC1_RGB8_OES: u32 = 0x8D64;
    pub const COMPRESSED_RGB8_ETC2: u32 = 0x9274;
    pub const COMPRESSED_SRGB8_ETC2: u32 = 0x9275;
    pub const COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9276;
    pub const COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9277;
    pub const COMPRESSED_RGBA8_ETC2_EAC: u32 = 0x9278;
    pub const COMPRESSED_SRGB8_ALPHA8_ETC2_EAC: u32 = 0x9279;
    pub const COMPRESSED_RGB_PVRTC_4BPPV1_IMG: u32 = 0x8C00;
    pub const COMPRESSED_RGB_PVRTC_2BPPV1_IMG: u32 = 0x8C01;
    pub const COMPRESSED_RGBA_PVRTC_4BPPV1_IMG: u32 = 0x8C02;
    pub const COMPRESSED_RGBA_PVRTC_2BPPV1_IMG: u32 = 0x8C03;
    pub const COMPRESSED_RGBA_PVRTC_2BPPV2_IMG: u32 = 0x9137;
    pub const COMPRESSED_RGBA_PVRTC_4BPPV2_IMG: u32 = 0x9138;
    pub const ATC_RGB_AMD: u32 = 0x8C92;
    pub const ATC_RGBA_EXPLICIT_ALPHA_AMD: u32 = 0x8C93;
    pub const ATC_RGBA_INTERPOLATED_ALPHA_AMD: u32 = 0x87EE;
    pub const COMPRESSED_RGBA_ASTC_4X4_KHR: u32 = 0x93B0;
    pub const COMPRESSED_RGBA_ASTC_5X5_KHR: u32 = 0x93B2;
    pub const COMPRESSED_RGBA_ASTC_6X6_KHR: u32 = 0x93B4;
    pub const COMPRESSED_RGBA_ASTC_8X5_KHR: u32 = 0x93B5;
    pub const COMPRESSED_RGBA_ASTC_8X6_KHR: u32 = 0x93B6;
    pub const COMPRESSED_RGBA_ASTC_10X5_KHR: u32 = 0x93B8;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_4X4_KHR: u32 = 0x93D0;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_5X5_KHR: u32 = 0x93D2;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_6X6_KHR: u32 = 0x93D4;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8X5_KHR: u32 = 0x93D5;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8X6_KHR: u32 = 0x93D6;
    pub const COMPRESSED_SRGB8_ALPHA8_ASTC_10X5_KHR: u32 = 0x93D8;

    pub const ALPHA8: u32 = 0x803C;
    pub const R8: u32 = 0x8229;
    pub const R16: u32 = 0x822A;
    pub const RG8: u32 = 0x822B;
    pub const RG16: u32 = 0x822C;
    pub const R16F: u32 = 0x822D;
    pub const R32F: u32 = 0x822E;
    pub const RG16F: u32 = 0x822F;
    pub const RGB8: u32 = 0x8051;
    pub const RGBA8: u32 = 0x8058;
    pub const RGB10_A2: u32 = 0x8059;
    pub const RGBA16: u32 = 0x805B;
    pub const RGBA16F: u32 = 0x881A;
    pub const R11F_G11F_B10F: u32 = 0x8C3A;
    pub const SRGB8: u32 = 0x8C41;
    pub const SRGB8_ALPHA8: u32 = 0x8C43;
    pub const RG8_SNORM: u32 = 0x8F95;
    pub const RGBA8_SNORM: u32 = 0x8F97;
    pub const RG16_SNORM: u32 = 0x8F99;
    pub const BGRA8_EXT: u32 = 0x93A1;
}

/// KTX v1 file header, after the 4-byte dispatch magic.
///
/// The first eight bytes are the tail of the 12-byte identifier; everything
/// after is big-endian.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct KtxHeader {
    /// Identifier bytes 4..12, validated against [`KTX_ID_TAIL`].
    pub identifier_tail: [u8; 8],
    /// Endianness marker; must equal [`KTX_ENDIAN_REF`].
    pub endianness: Bu32,
    /// GL type of the pixel data (0 for compressed formats).
    pub gl_type: Bu32,
    /// Size of the GL type in bytes.
    pub gl_type_size: Bu32,
    /// GL pixel format (0 for compressed formats).
    pub gl_format: Bu32,
    /// GL internal format; the key the translation tables match on.
    pub gl_internal_format: Bu32,
    /// GL base internal format.
    pub gl_base_internal_format: Bu32,
    /// Width in pixels.
    pub pixel_width: Bu32,
    /// Height in pixels.
    pub pixel_height: Bu32,
    /// Depth in pixels (0 for non-3D textures).
    pub pixel_depth: Bu32,
    /// Number of array elements (0 for non-arrays).
    pub array_count: Bu32,
    /// Number of cubemap faces: 1 or 6.
    pub face_count: Bu32,
    /// Number of mip levels (0 means one level).
    pub mip_count: Bu32,
    /// Byte size of the key/value metadata block.
    pub metadata_size: Bu32,
}

const _: () = assert!(std::mem::size_of::<KtxHeader>() == 60);

/// GL internal formats of one canonical format: the sized internal format
/// and its sRGB sibling (0 when the format has none).
struct KtxFormatRow {
    internal_format: u32,
    internal_format_srgb: u32,
}

const fn k(internal_format: u32, internal_format_srgb: u32) -> KtxFormatRow {
    KtxFormatRow {
        internal_format,
        internal_format_srgb,
    }
}

/// Internal-format translation, indexed by [`TextureFormat`] ordinal.
static KTX_FORMAT_TABLE: [KtxFormatRow; TextureFormat::COUNT] = [
    k(gl::COMPRESSED_RGBA_S3TC_DXT1_EXT, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT), // BC1
    k(gl::COMPRESSED_RGBA_S3TC_DXT3_EXT, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT), // BC2
    k(gl::COMPRESSED_RGBA_S3TC_DXT5_EXT, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT), // BC3
    k(gl::COMPRESSED_RED_RGTC1, 0),                                                // BC4
    k(gl::COMPRESSED_RG_RGTC2, 0),                                                 // BC5
    k(gl::COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT_ARB, 0),                              // BC6H
    k(gl::COMPRESSED_RGBA_BPTC_UNORM_ARB, gl::COMPRESSED_SRGB_ALPHA_BPTC_UNORM_ARB), // BC7
    k(gl::ETC1_RGB8_OES, 0),                                                       // ETC1
    k(gl::COMPRESSED_RGB8_ETC2, gl::COMPRESSED_SRGB8_ETC2),                        // ETC2
    k(gl::COMPRESSED_RGBA8_ETC2_EAC, gl::COMPRESSED_SRGB8_ALPHA8_ETC2_EAC),        // ETC2A
    k(
        gl::COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2,
        gl::COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2,
    ), // ETC2A1
    k(gl::COMPRESSED_RGB_PVRTC_2BPPV1_IMG, 0),                                     // PTC12
    k(gl::COMPRESSED_RGB_PVRTC_4BPPV1_IMG, 0),                                     // PTC14
    k(gl::COMPRESSED_RGBA_PVRTC_2BPPV1_IMG, 0),                                    // PTC12A
    k(gl::COMPRESSED_RGBA_PVRTC_4BPPV1_IMG, 0),                                    // PTC14A
    k(gl::COMPRESSED_RGBA_PVRTC_2BPPV2_IMG, 0),                                    // PTC22
    k(gl::COMPRESSED_RGBA_PVRTC_4BPPV2_IMG, 0),                                    // PTC24
    k(gl::ATC_RGB_AMD, 0),                                                         // ATC
    k(gl::ATC_RGBA_EXPLICIT_ALPHA_AMD, 0),                                         // ATCE
    k(gl::ATC_RGBA_INTERPOLATED_ALPHA_AMD, 0),                                     // ATCI
    k(gl::COMPRESSED_RGBA_ASTC_4X4_KHR, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_4X4_KHR), // ASTC4x4
    k(gl::COMPRESSED_RGBA_ASTC_5X5_KHR, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_5X5_KHR), // ASTC5x5
    k(gl::COMPRESSED_RGBA_ASTC_6X6_KHR, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_6X6_KHR), // ASTC6x6
    k(gl::COMPRESSED_RGBA_ASTC_8X5_KHR, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_8X5_KHR), // ASTC8x5
    k(gl::COMPRESSED_RGBA_ASTC_8X6_KHR, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_8X6_KHR), // ASTC8x6
    k(
        gl::COMPRESSED_RGBA_ASTC_10X5_KHR,
        gl::COMPRESSED_SRGB8_ALPHA8_ASTC_10X5_KHR,
    ), // ASTC10x5
    k(gl::ALPHA8, 0),                                                              // A8
    k(gl::R8, 0),                                                                  // R8
    k(gl::RGBA8, gl::SRGB8_ALPHA8),                                                // RGBA8
    k(gl::RGBA8_SNORM, 0),                                                         // RGBA8S
    k(gl::RG16, 0),                                                                // RG16
    k(gl::RGB8, gl::SRGB8),                                                        // RGB8
    k(gl::R16, 0),                                                                 // R16
    k(gl::R32F, 0),                                                                // R32F
    k(gl::R16F, 0),                                                                // R16F
    k(gl::RG16F, 0),                                                               // RG16F
    k(gl::RG16_SNORM, 0),                                                          // RG16S
    k(gl::RGBA16F, 0),                                                             // RGBA16F
    k(gl::RGBA16, 0),                                                              // RGBA16
    k(gl::BGRA8_EXT, 0),                                                           // BGRA8
    k(gl::RGB10_A2, 0),                                                            // RGB10A2
    k(gl::R11F_G11F_B10F, 0),                                                      // RG11B10F
    k(gl::RG8, 0),                                                                 // RG8
    k(gl::RG8_SNORM, 0),                                                           // RG8S
];

struct KtxFallbackRow {
    internal_format: u32,
    format: TextureFormat,
}

/// Fallback for files whose internal format field holds a generic GL enum.
static KTX_FORMAT_FALLBACK: [KtxFallbackRow; 5] = [
    KtxFallbackRow {
        internal_format: gl::ALPHA,
        format: TextureFormat::A8,
    },
    KtxFallbackRow {
        internal_format: gl::RED,
        format: TextureFormat::R8,
    },
    KtxFallbackRow {
        internal_format: gl::RGB,
        format: TextureFormat::Rgb8,
    },
    KtxFallbackRow {
        internal_format: gl::RGBA,
        format: TextureFormat::Rgba8,
    },
    KtxFallbackRow {
        internal_format: gl::COMPRESSED_RGB_S3TC_DXT1_EXT,
        format: TextureFormat::Bc1,
    },
];

/// Parse a KTX v1 file image into a texture descriptor.
///
/// `data` is the whole file; the caller has already matched the first four
/// identifier bytes. The key/value block is located but not interpreted, and
/// the per-mip image size words are left in place for the sub-image walk.
pub(crate) fn parse(data: &[u8]) -> Result<TextureInfo> {
    let mut reader = BinaryReader::new_at(data, KTX_MAGIC.len());

    let header: KtxHeader = reader.read_struct().map_err(|_| Error::KtxHeaderSize)?;
    if header.identifier_tail != KTX_ID_TAIL {
        return Err(Error::KtxInvalidId);
    }
    if header.endianness.get() != KTX_ENDIAN_REF {
        return Err(Error::KtxEndianUnsupported);
    }

    let face_count = header.face_count.get();
    if face_count != 1 && face_count != 6 {
        return Err(Error::KtxIncompleteCubemap);
    }

    let internal_format = header.gl_internal_format.get();
    let mut srgb = false;
    let mut format = None;
    for candidate in TextureFormat::ALL {
        let row = &KTX_FORMAT_TABLE[candidate as usize];
        if row.internal_format == internal_format {
            format = Some(candidate);
            break;
        }
        if row.internal_format_srgb != 0 && row.internal_format_srgb == internal_format {
            format = Some(candidate);
            srgb = true;
            break;
        }
    }
    let format = format
        .or_else(|| {
            KTX_FORMAT_FALLBACK
                .iter()
                .find(|row| row.internal_format == internal_format)
                .map(|row| row.format)
        })
        .ok_or(Error::KtxUnknownFormat)?;

    let metadata_offset = reader.position();
    let metadata_size = header.metadata_size.get() as usize;
    reader.advance(metadata_size);
    let data_offset = reader.position();
    if data_offset > data.len() {
        return Err(Error::KtxHeaderSize);
    }

    let mut tex_flags = TextureFlags::KTX;
    if face_count == 6 {
        tex_flags |= TextureFlags::CUBEMAP;
    }
    if srgb {
        tex_flags |= TextureFlags::SRGB;
    }
    if format.has_alpha() {
        tex_flags |= TextureFlags::ALPHA;
    }

    Ok(TextureInfo {
        data_offset,
        size_bytes: data.len() - data_offset,
        format,
        flags: tex_flags,
        width: header.pixel_width.get().max(1),
        height: header.pixel_height.get().max(1),
        depth: header.pixel_depth.get().max(1),
        num_layers: header.array_count.get().max(1),
        num_mips: header.mip_count.get().max(1),
        bpp: format.block_info().bpp as u32,
        metadata_offset,
        metadata_size,
    })
}
