//! DDS container parsing.
//!
//! Wire layout per Microsoft's documented DDS header: 4-byte magic, 124-byte
//! primary header with an embedded 32-byte pixel format, and an optional
//! 20-byte DX10 extension when the pixel format FourCC is `"DX10"`. All
//! integers are little-endian.

use bitflags::bitflags;
use stribog_common::BinaryReader;
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::TextureFormat;
use crate::texture::{TextureFlags, TextureInfo};
use crate::{Error, Result};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: [u8; 4] = *b"DDS ";

type Lu32 = U32<LittleEndian>;

bitflags! {
    /// DDS header flags (`DDSD_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsFlags: u32 {
        const CAPS = 0x0000_0001;
        const HEIGHT = 0x0000_0002;
        const WIDTH = 0x0000_0004;
        const PITCH = 0x0000_0008;
        const PIXEL_FORMAT = 0x0000_1000;
        const MIPMAP_COUNT = 0x0002_0000;
        const LINEAR_SIZE = 0x0008_0000;
        const DEPTH = 0x0080_0000;

        /// Flags every well-formed header must carry.
        const REQUIRED = Self::CAPS.bits()
            | Self::HEIGHT.bits()
            | Self::WIDTH.bits()
            | Self::PIXEL_FORMAT.bits();
    }
}

bitflags! {
    /// DDS pixel format flags (`DDPF_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsPixelFlags: u32 {
        const ALPHA_PIXELS = 0x0000_0001;
        const ALPHA = 0x0000_0002;
        const FOURCC = 0x0000_0004;
        const INDEXED = 0x0000_0020;
        const RGB = 0x0000_0040;
        const YUV = 0x0000_0200;
        const LUMINANCE = 0x0002_0000;
        const BUMP_DUDV = 0x0008_0000;
    }
}

bitflags! {
    /// DDS surface capabilities (`DDSCAPS_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsCaps: u32 {
        const COMPLEX = 0x0000_0008;
        const TEXTURE = 0x0000_1000;
        const MIPMAP = 0x0040_0000;
    }
}

bitflags! {
    /// Additional DDS surface capabilities (`DDSCAPS2_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsCaps2: u32 {
        const CUBEMAP = 0x0000_0200;
        const CUBEMAP_POSITIVE_X = 0x0000_0400;
        const CUBEMAP_NEGATIVE_X = 0x0000_0800;
        const CUBEMAP_POSITIVE_Y = 0x0000_1000;
        const CUBEMAP_NEGATIVE_Y = 0x0000_2000;
        const CUBEMAP_POSITIVE_Z = 0x0000_4000;
        const CUBEMAP_NEGATIVE_Z = 0x0000_8000;
        const VOLUME = 0x0020_0000;

        /// All six cubemap face bits. Partial cubemaps are rejected.
        const CUBEMAP_ALL_FACES = Self::CUBEMAP_POSITIVE_X.bits()
            | Self::CUBEMAP_NEGATIVE_X.bits()
            | Self::CUBEMAP_POSITIVE_Y.bits()
            | Self::CUBEMAP_NEGATIVE_Y.bits()
            | Self::CUBEMAP_POSITIVE_Z.bits()
            | Self::CUBEMAP_NEGATIVE_Z.bits();
    }
}

/// Four-character code identifying a DDS format variant.
///
/// Legacy writers also store numeric D3DFMT codes in this field; those are
/// represented through [`FourCC::from_u32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const DXT1: Self = Self(*b"DXT1");
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    pub const ATI1: Self = Self(*b"ATI1");
    pub const ATI2: Self = Self(*b"ATI2");
    pub const BC4U: Self = Self(*b"BC4U");
    pub const BC5U: Self = Self(*b"BC5U");
    /// DX10 extended header marker.
    pub const DX10: Self = Self(*b"DX10");

    /// Interpret a little-endian DWORD as a FourCC value.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }
}

/// Numeric D3DFMT codes found in the FourCC field of legacy DDS files.
mod d3dfmt {
    pub const R8G8B8: u32 = 20;
    pub const A8R8G8B8: u32 = 21;
    pub const A2B10G10R10: u32 = 31;
    pub const G16R16: u32 = 34;
    pub const A16B16G16R16: u32 = 36;
    pub const A8L8: u32 = 51;
    pub const R16F: u32 = 111;
    pub const G16R16F: u32 = 112;
    pub const A16B16G16R16F: u32 = 113;
    pub const R32F: u32 = 114;
}

/// DXGI format ids used by the DX10 extension header.
pub mod dxgi {
    pub const R16G16B16A16_FLOAT: u32 = 10;
    pub const R16G16B16A16_UNORM: u32 = 11;
    pub const R10G10B10A2_UNORM: u32 = 24;
    pub const R11G11B10_FLOAT: u32 = 26;
    pub const R8G8B8A8_UNORM: u32 = 28;
    pub const R8G8B8A8_UNORM_SRGB: u32 = 29;
    pub const R16G16_FLOAT: u32 = 34;
    pub const R16G16_UNORM: u32 = 35;
    pub const R32_FLOAT: u32 = 41;
    pub const R8G8_UNORM: u32 = 49;
    pub const R16_FLOAT: u32 = 54;
    pub const R16_UNORM: u32 = 56;
    pub const R8_UNORM: u32 = 61;
    pub const BC1_UNORM: u32 = 71;
    pub const BC1_UNORM_SRGB: u32 = 72;
    pub const BC2_UNORM: u32 = 74;
    pub const BC2_UNORM_SRGB: u32 = 75;
    pub const BC3_UNORM: u32 = 77;
    pub const BC3_UNORM_SRGB: u32 = 78;
    pub const BC4_UNORM: u32 = 80;
    pub const BC5_UNORM: u32 = 83;
    pub const B8G8R8A8_UNORM: u32 = 87;
    pub const B8G8R8A8_UNORM_SRGB: u32 = 91;
    pub const BC6H_UF16: u32 = 95;
    pub const BC6H_SF16: u32 = 96;
    pub const BC7_UNORM: u32 = 98;
    pub const BC7_UNORM_SRGB: u32 = 99;
}

/// DDS pixel format sub-header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsPixelFormat {
    /// Structure size (must be 32).
    pub size: Lu32,
    /// Pixel format flags.
    pub flags: Lu32,
    /// Four-character code or numeric D3DFMT code.
    pub four_cc: FourCC,
    /// Bits per pixel for uncompressed formats.
    pub rgb_bit_count: Lu32,
    /// Red, green, blue and alpha channel masks.
    pub bit_mask: [Lu32; 4],
}

impl DdsPixelFormat {
    /// Expected sub-header size.
    pub const SIZE: u32 = 32;
}

/// DDS file header, after the 4-byte magic.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeader {
    /// Header size (must be 124).
    pub size: Lu32,
    /// Header flags.
    pub flags: Lu32,
    /// Image height.
    pub height: Lu32,
    /// Image width.
    pub width: Lu32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: Lu32,
    /// Depth (for volume textures).
    pub depth: Lu32,
    /// Number of mipmap levels.
    pub mip_count: Lu32,
    /// Reserved.
    pub reserved1: [Lu32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: Lu32,
    /// Surface capabilities 2.
    pub caps2: Lu32,
    /// Surface capabilities 3.
    pub caps3: Lu32,
    /// Surface capabilities 4.
    pub caps4: Lu32,
    /// Reserved.
    pub reserved2: Lu32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeaderDxt10 {
    /// DXGI format.
    pub dxgi_format: Lu32,
    /// Resource dimension.
    pub resource_dimension: Lu32,
    /// Misc flags.
    pub misc_flag: Lu32,
    /// Array size.
    pub array_size: Lu32,
    /// Misc flags 2.
    pub misc_flags2: Lu32,
}

impl DdsHeaderDxt10 {
    /// Misc flag marking the resource as a cubemap.
    pub const MISC_TEXTURE_CUBE: u32 = 0x4;
}

const _: () = assert!(std::mem::size_of::<DdsHeader>() == 124);
const _: () = assert!(std::mem::size_of::<DdsPixelFormat>() == 32);
const _: () = assert!(std::mem::size_of::<DdsHeaderDxt10>() == 20);

struct FourCcRow {
    four_cc: FourCC,
    format: TextureFormat,
    srgb: bool,
}

const fn fc(four_cc: FourCC, format: TextureFormat) -> FourCcRow {
    // The FourCC path never yields sRGB; only the DXGI path can.
    FourCcRow {
        four_cc,
        format,
        srgb: false,
    }
}

/// FourCC and numeric D3DFMT translation. Scanned linearly, first match
/// wins, so ordering encodes preference.
static FOURCC_TABLE: [FourCcRow; 19] = [
    fc(FourCC::DXT1, TextureFormat::Bc1),
    fc(FourCC::DXT2, TextureFormat::Bc2),
    fc(FourCC::DXT3, TextureFormat::Bc2),
    fc(FourCC::DXT4, TextureFormat::Bc3),
    fc(FourCC::DXT5, TextureFormat::Bc3),
    fc(FourCC::ATI1, TextureFormat::Bc4),
    fc(FourCC::BC4U, TextureFormat::Bc4),
    fc(FourCC::ATI2, TextureFormat::Bc5),
    fc(FourCC::BC5U, TextureFormat::Bc5),
    fc(FourCC::from_u32(d3dfmt::A16B16G16R16), TextureFormat::Rgba16),
    fc(FourCC::from_u32(d3dfmt::A16B16G16R16F), TextureFormat::Rgba16F),
    fc(FourCC::from_u32(d3dfmt::R16F), TextureFormat::R16F),
    fc(FourCC::from_u32(d3dfmt::R32F), TextureFormat::R32F),
    fc(FourCC::from_u32(d3dfmt::A8L8), TextureFormat::Rg8),
    fc(FourCC::from_u32(d3dfmt::G16R16), TextureFormat::Rg16),
    fc(FourCC::from_u32(d3dfmt::G16R16F), TextureFormat::Rg16F),
    fc(FourCC::from_u32(d3dfmt::R8G8B8), TextureFormat::Rgb8),
    fc(FourCC::from_u32(d3dfmt::A8R8G8B8), TextureFormat::Bgra8),
    fc(FourCC::from_u32(d3dfmt::A2B10G10R10), TextureFormat::Rgb10A2),
];

struct DxgiRow {
    dxgi_format: u32,
    format: TextureFormat,
    srgb: bool,
}

const fn dx(dxgi_format: u32, format: TextureFormat, srgb: bool) -> DxgiRow {
    DxgiRow {
        dxgi_format,
        format,
        srgb,
    }
}

/// DXGI id translation for the DX10 extension path.
static DXGI_TABLE: [DxgiRow; 27] = [
    dx(dxgi::BC1_UNORM, TextureFormat::Bc1, false),
    dx(dxgi::BC1_UNORM_SRGB, TextureFormat::Bc1, true),
    dx(dxgi::BC2_UNORM, TextureFormat::Bc2, false),
    dx(dxgi::BC2_UNORM_SRGB, TextureFormat::Bc2, true),
    dx(dxgi::BC3_UNORM, TextureFormat::Bc3, false),
    dx(dxgi::BC3_UNORM_SRGB, TextureFormat::Bc3, true),
    dx(dxgi::BC4_UNORM, TextureFormat::Bc4, false),
    dx(dxgi::BC5_UNORM, TextureFormat::Bc5, false),
    dx(dxgi::BC6H_UF16, TextureFormat::Bc6H, false),
    dx(dxgi::BC6H_SF16, TextureFormat::Bc6H, false),
    dx(dxgi::BC7_UNORM, TextureFormat::Bc7, false),
    dx(dxgi::BC7_UNORM_SRGB, TextureFormat::Bc7, true),
    dx(dxgi::R8_UNORM, TextureFormat::R8, false),
    dx(dxgi::R16_UNORM, TextureFormat::R16, false),
    dx(dxgi::R16_FLOAT, TextureFormat::R16F, false),
    dx(dxgi::R32_FLOAT, TextureFormat::R32F, false),
    dx(dxgi::R8G8_UNORM, TextureFormat::Rg8, false),
    dx(dxgi::R16G16_UNORM, TextureFormat::Rg16, false),
    dx(dxgi::R16G16_FLOAT, TextureFormat::Rg16F, false),
    dx(dxgi::B8G8R8A8_UNORM, TextureFormat::Bgra8, false),
    dx(dxgi::B8G8R8A8_UNORM_SRGB, TextureFormat::Bgra8, true),
    dx(dxgi::R8G8B8A8_UNORM, TextureFormat::Rgba8, false),
    dx(dxgi::R8G8B8A8_UNORM_SRGB, TextureFormat::Rgba8, true),
    dx(dxgi::R16G16B16A16_UNORM, TextureFormat::Rgba16, false),
    dx(dxgi::R16G16B16A16_FLOAT, TextureFormat::Rgba16F, false),
    dx(dxgi::R10G10B10A2_UNORM, TextureFormat::Rgb10A2, false),
    dx(dxgi::R11G11B10_FLOAT, TextureFormat::Rg11B10F, false),
];

struct PixelRow {
    bit_count: u32,
    flags: DdsPixelFlags,
    bit_mask: [u32; 4],
    format: TextureFormat,
}

const fn px(
    bit_count: u32,
    flags: DdsPixelFlags,
    bit_mask: [u32; 4],
    format: TextureFormat,
) -> PixelRow {
    PixelRow {
        bit_count,
        flags,
        bit_mask,
        format,
    }
}

/// Bit-mask translation for uncompressed legacy pixel formats. A row matches
/// only when the bit count, the flag word and all four channel masks are
/// simultaneously equal.
#[rustfmt::skip]
static PIXEL_TABLE: [PixelRow; 14] = [
    px( 8, DdsPixelFlags::ALPHA,     [0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_00ff], TextureFormat::A8),
    px( 8, DdsPixelFlags::LUMINANCE, [0x0000_00ff, 0x0000_0000, 0x0000_0000, 0x0000_0000], TextureFormat::R8),
    px(16, DdsPixelFlags::BUMP_DUDV, [0x0000_00ff, 0x0000_ff00, 0x0000_0000, 0x0000_0000], TextureFormat::Rg8S),
    px(24, DdsPixelFlags::RGB,       [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x0000_0000], TextureFormat::Rgb8),
    px(24, DdsPixelFlags::RGB,       [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0x0000_0000], TextureFormat::Rgb8),
    px(32, DdsPixelFlags::RGB,       [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x0000_0000], TextureFormat::Bgra8),
    px(32, DdsPixelFlags::RGB.union(DdsPixelFlags::ALPHA_PIXELS),
                                     [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000], TextureFormat::Rgba8),
    px(32, DdsPixelFlags::BUMP_DUDV, [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000], TextureFormat::Rgba8S),
    px(32, DdsPixelFlags::RGB,       [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000], TextureFormat::Bgra8),
    // D3DFMT_A8R8G8B8
    px(32, DdsPixelFlags::RGB.union(DdsPixelFlags::ALPHA_PIXELS),
                                     [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000], TextureFormat::Bgra8),
    // D3DFMT_X8R8G8B8
    px(32, DdsPixelFlags::RGB.union(DdsPixelFlags::ALPHA_PIXELS),
                                     [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x0000_0000], TextureFormat::Bgra8),
    px(32, DdsPixelFlags::RGB.union(DdsPixelFlags::ALPHA_PIXELS),
                                     [0x0000_03ff, 0x000f_fc00, 0x3ff0_0000, 0xc000_0000], TextureFormat::Rgb10A2),
    px(32, DdsPixelFlags::RGB,       [0x0000_ffff, 0xffff_0000, 0x0000_0000, 0x0000_0000], TextureFormat::Rg16),
    px(32, DdsPixelFlags::BUMP_DUDV, [0x0000_ffff, 0xffff_0000, 0x0000_0000, 0x0000_0000], TextureFormat::Rg16S),
];

/// Parse a DDS file image into a texture descriptor.
///
/// `data` is the whole file including the 4-byte magic, which the caller has
/// already validated.
pub(crate) fn parse(data: &[u8]) -> Result<TextureInfo> {
    let mut reader = BinaryReader::new_at(data, DDS_MAGIC.len());

    let header: DdsHeader = reader.read_struct().map_err(|_| Error::DdsHeaderSize)?;
    if header.size.get() != DdsHeader::SIZE {
        return Err(Error::DdsHeaderSize);
    }

    let flags = DdsFlags::from_bits_retain(header.flags.get());
    if !flags.contains(DdsFlags::REQUIRED) {
        return Err(Error::DdsInvalidFlags);
    }

    if header.pixel_format.size.get() != DdsPixelFormat::SIZE {
        return Err(Error::DdsInvalidPixelFormat);
    }

    let mut dxgi_format = 0;
    let mut array_size = 1;
    let mut dx10_cubemap = false;
    if header.pixel_format.four_cc == FourCC::DX10 {
        let dx10: DdsHeaderDxt10 = reader.read_struct().map_err(|_| Error::DdsHeaderSize)?;
        dxgi_format = dx10.dxgi_format.get();
        array_size = dx10.array_size.get().max(1);
        dx10_cubemap = dx10.misc_flag.get() & DdsHeaderDxt10::MISC_TEXTURE_CUBE != 0;
    }

    let caps = DdsCaps::from_bits_retain(header.caps.get());
    if !caps.contains(DdsCaps::TEXTURE) {
        return Err(Error::DdsUnsupportedCaps);
    }

    let caps2 = DdsCaps2::from_bits_retain(header.caps2.get());
    if caps2.contains(DdsCaps2::CUBEMAP) && !caps2.contains(DdsCaps2::CUBEMAP_ALL_FACES) {
        return Err(Error::DdsIncompleteCubemap);
    }
    let cubemap = caps2.contains(DdsCaps2::CUBEMAP) || dx10_cubemap;

    let depth = header.depth.get().max(1);
    if cubemap && depth > 1 {
        return Err(Error::DdsCubemapVolume);
    }

    let pixel_flags = DdsPixelFlags::from_bits_retain(header.pixel_format.flags.get());
    let mut srgb = false;
    let format = if dxgi_format != 0 {
        let row = DXGI_TABLE
            .iter()
            .find(|row| row.dxgi_format == dxgi_format)
            .ok_or(Error::DdsUnknownFormat)?;
        srgb = row.srgb;
        row.format
    } else if pixel_flags.contains(DdsPixelFlags::FOURCC) {
        let row = FOURCC_TABLE
            .iter()
            .find(|row| row.four_cc == header.pixel_format.four_cc)
            .ok_or(Error::DdsUnknownFormat)?;
        srgb = row.srgb;
        row.format
    } else {
        let pf = &header.pixel_format;
        let masks = [
            pf.bit_mask[0].get(),
            pf.bit_mask[1].get(),
            pf.bit_mask[2].get(),
            pf.bit_mask[3].get(),
        ];
        PIXEL_TABLE
            .iter()
            .find(|row| {
                row.bit_count == pf.rgb_bit_count.get()
                    && row.flags == pixel_flags
                    && row.bit_mask == masks
            })
            .ok_or(Error::DdsUnknownFormat)?
            .format
    };

    let mut tex_flags = TextureFlags::DDS;
    if cubemap {
        tex_flags |= TextureFlags::CUBEMAP;
    }
    if srgb {
        tex_flags |= TextureFlags::SRGB;
    }
    if pixel_flags.contains(DdsPixelFlags::ALPHA) || format.has_alpha() {
        tex_flags |= TextureFlags::ALPHA;
    }

    let data_offset = reader.position();
    Ok(TextureInfo {
        data_offset,
        size_bytes: data.len() - data_offset,
        format,
        flags: tex_flags,
        width: header.width.get().max(1),
        height: header.height.get().max(1),
        depth,
        num_layers: array_size,
        num_mips: if caps.contains(DdsCaps::MIPMAP) {
            header.mip_count.get().max(1)
        } else {
            1
        },
        bpp: format.block_info().bpp as u32,
        metadata_offset: 0,
        metadata_size: 0,
    })
}
