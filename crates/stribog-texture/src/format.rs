//! Canonical texture formats and their block geometry.
//!
//! Every container-specific identifier (DDS FourCC, DXGI id, DDS bit masks,
//! KTX GL internal format) translates into [`TextureFormat`]. The
//! [`BlockInfo`] table drives all sub-image size and offset arithmetic.

use std::fmt;

/// Canonical texture format.
///
/// Block-compressed variants come first, uncompressed variants second; the
/// ordering is load-bearing: [`TextureFormat::is_compressed`] classifies by
/// ordinal and [`BLOCK_INFO`] is indexed by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// DXT1
    Bc1,
    /// DXT3
    Bc2,
    /// DXT5
    Bc3,
    /// ATI1
    Bc4,
    /// ATI2
    Bc5,
    Bc6H,
    Bc7,
    /// ETC1 RGB8
    Etc1,
    /// ETC2 RGB8
    Etc2,
    /// ETC2 RGBA8
    Etc2A,
    /// ETC2 RGB8A1
    Etc2A1,
    /// PVRTC1 RGB 2bpp
    Ptc12,
    /// PVRTC1 RGB 4bpp
    Ptc14,
    /// PVRTC1 RGBA 2bpp
    Ptc12A,
    /// PVRTC1 RGBA 4bpp
    Ptc14A,
    /// PVRTC2 RGBA 2bpp
    Ptc22,
    /// PVRTC2 RGBA 4bpp
    Ptc24,
    /// ATC RGB
    Atc,
    /// ATC RGBA explicit alpha
    Atce,
    /// ATC RGBA interpolated alpha
    Atci,
    Astc4x4,
    Astc5x5,
    Astc6x6,
    Astc8x5,
    Astc8x6,
    Astc10x5,
    A8,
    R8,
    Rgba8,
    Rgba8S,
    Rg16,
    Rgb8,
    R16,
    R32F,
    R16F,
    Rg16F,
    Rg16S,
    Rgba16F,
    Rgba16,
    Bgra8,
    Rgb10A2,
    Rg11B10F,
    Rg8,
    Rg8S,
}

impl TextureFormat {
    /// Number of canonical formats.
    pub const COUNT: usize = 44;

    /// Every canonical format, in ordinal order.
    pub const ALL: [TextureFormat; Self::COUNT] = [
        Self::Bc1,
        Self::Bc2,
        Self::Bc3,
        Self::Bc4,
        Self::Bc5,
        Self::Bc6H,
        Self::Bc7,
        Self::Etc1,
        Self::Etc2,
        Self::Etc2A,
        Self::Etc2A1,
        Self::Ptc12,
        Self::Ptc14,
        Self::Ptc12A,
        Self::Ptc14A,
        Self::Ptc22,
        Self::Ptc24,
        Self::Atc,
        Self::Atce,
        Self::Atci,
        Self::Astc4x4,
        Self::Astc5x5,
        Self::Astc6x6,
        Self::Astc8x5,
        Self::Astc8x6,
        Self::Astc10x5,
        Self::A8,
        Self::R8,
        Self::Rgba8,
        Self::Rgba8S,
        Self::Rg16,
        Self::Rgb8,
        Self::R16,
        Self::R32F,
        Self::R16F,
        Self::Rg16F,
        Self::Rg16S,
        Self::Rgba16F,
        Self::Rgba16,
        Self::Bgra8,
        Self::Rgb10A2,
        Self::Rg11B10F,
        Self::Rg8,
        Self::Rg8S,
    ];

    /// Check if this is a block-compressed format.
    #[inline]
    pub fn is_compressed(self) -> bool {
        (self as usize) < (Self::A8 as usize)
    }

    /// Block geometry and channel layout for this format.
    #[inline]
    pub fn block_info(self) -> &'static BlockInfo {
        &BLOCK_INFO[self as usize]
    }

    /// Short ASCII display name, e.g. `"BC3"` or `"RGBA16F"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bc1 => "BC1",
            Self::Bc2 => "BC2",
            Self::Bc3 => "BC3",
            Self::Bc4 => "BC4",
            Self::Bc5 => "BC5",
            Self::Bc6H => "BC6H",
            Self::Bc7 => "BC7",
            Self::Etc1 => "ETC1",
            Self::Etc2 => "ETC2",
            Self::Etc2A => "ETC2A",
            Self::Etc2A1 => "ETC2A1",
            Self::Ptc12 => "PTC12",
            Self::Ptc14 => "PTC14",
            Self::Ptc12A => "PTC12A",
            Self::Ptc14A => "PTC14A",
            Self::Ptc22 => "PTC22",
            Self::Ptc24 => "PTC24",
            Self::Atc => "ATC",
            Self::Atce => "ATCE",
            Self::Atci => "ATCI",
            Self::Astc4x4 => "ASTC4x4",
            Self::Astc5x5 => "ASTC5x5",
            Self::Astc6x6 => "ASTC6x6",
            Self::Astc8x5 => "ASTC8x5",
            Self::Astc8x6 => "ASTC8x6",
            Self::Astc10x5 => "ASTC10x5",
            Self::A8 => "A8",
            Self::R8 => "R8",
            Self::Rgba8 => "RGBA8",
            Self::Rgba8S => "RGBA8S",
            Self::Rg16 => "RG16",
            Self::Rgb8 => "RGB8",
            Self::R16 => "R16",
            Self::R32F => "R32F",
            Self::R16F => "R16F",
            Self::Rg16F => "RG16F",
            Self::Rg16S => "RG16S",
            Self::Rgba16F => "RGBA16F",
            Self::Rgba16 => "RGBA16",
            Self::Bgra8 => "BGRA8",
            Self::Rgb10A2 => "RGB10A2",
            Self::Rg11B10F => "RG11B10F",
            Self::Rg8 => "RG8",
            Self::Rg8S => "RG8S",
        }
    }

    /// Whether files of this format carry an alpha channel by default.
    ///
    /// Containers that encode alpha explicitly (DDS pixel-format flags)
    /// override this; KTX has no such bit and uses the default.
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            Self::Bc2
                | Self::Bc3
                | Self::Bc7
                | Self::Etc2A
                | Self::Etc2A1
                | Self::Ptc12A
                | Self::Ptc14A
                | Self::Ptc22
                | Self::Ptc24
                | Self::Atce
                | Self::Atci
                | Self::Astc4x4
                | Self::Astc5x5
                | Self::Astc6x6
                | Self::Astc8x5
                | Self::Astc8x6
                | Self::Astc10x5
                | Self::A8
                | Self::Rgba8
                | Self::Rgba8S
                | Self::Rgba16F
                | Self::Rgba16
                | Self::Bgra8
                | Self::Rgb10A2
        )
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How channel values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Unsigned normalized.
    Unorm,
    /// Signed normalized.
    Snorm,
    /// Floating point.
    Float,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
}

/// Block geometry and channel layout of one canonical format.
///
/// Invariant, for every format: `block_size * 8 == bpp * block_width *
/// block_height`. All mip size arithmetic relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Bits per pixel, averaged over a block.
    pub bpp: u8,
    /// Block width in texels.
    pub block_width: u8,
    /// Block height in texels.
    pub block_height: u8,
    /// Encoded block size in bytes.
    pub block_size: u8,
    /// Minimum number of blocks in x a surface must occupy.
    pub min_block_x: u8,
    /// Minimum number of blocks in y a surface must occupy.
    pub min_block_y: u8,
    /// Depth channel bit width.
    pub depth_bits: u8,
    /// Stencil channel bit width.
    pub stencil_bits: u8,
    /// Red channel bit width.
    pub r_bits: u8,
    /// Green channel bit width.
    pub g_bits: u8,
    /// Blue channel bit width.
    pub b_bits: u8,
    /// Alpha channel bit width.
    pub a_bits: u8,
    /// Channel encoding.
    pub encoding: Encoding,
}

const fn bi(
    bpp: u8,
    bw: u8,
    bh: u8,
    bs: u8,
    mbx: u8,
    mby: u8,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    encoding: Encoding,
) -> BlockInfo {
    BlockInfo {
        bpp,
        block_width: bw,
        block_height: bh,
        block_size: bs,
        min_block_x: mbx,
        min_block_y: mby,
        depth_bits: 0,
        stencil_bits: 0,
        r_bits: r,
        g_bits: g,
        b_bits: b,
        a_bits: a,
        encoding,
    }
}

/// Per-format block info, indexed by [`TextureFormat`] ordinal.
#[rustfmt::skip]
pub static BLOCK_INFO: [BlockInfo; TextureFormat::COUNT] = [
    //  bpp bw  bh  size mx  my   r   g   b   a  encoding
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC1
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC2
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC3
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC4
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC5
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Float), // BC6H
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // BC7
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ETC1
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ETC2
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ETC2A
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ETC2A1
    bi(  2,  8,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC12
    bi(  4,  4,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC14
    bi(  2,  8,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC12A
    bi(  4,  4,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC14A
    bi(  2,  8,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC22
    bi(  4,  4,  4,   8,  2,  2,  0,  0,  0,  0, Encoding::Unorm), // PTC24
    bi(  4,  4,  4,   8,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ATC
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ATCE
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ATCI
    bi(  8,  4,  4,  16,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC4x4
    bi(  8,  5,  5,  25,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC5x5
    bi(  4,  6,  6,  18,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC6x6
    bi(  4,  8,  5,  20,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC8x5
    bi(  3,  8,  6,  18,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC8x6
    bi(  4, 10,  5,  25,  1,  1,  0,  0,  0,  0, Encoding::Unorm), // ASTC10x5
    bi(  8,  1,  1,   1,  1,  1,  0,  0,  0,  8, Encoding::Unorm), // A8
    bi(  8,  1,  1,   1,  1,  1,  8,  0,  0,  0, Encoding::Unorm), // R8
    bi( 32,  1,  1,   4,  1,  1,  8,  8,  8,  8, Encoding::Unorm), // RGBA8
    bi( 32,  1,  1,   4,  1,  1,  8,  8,  8,  8, Encoding::Snorm), // RGBA8S
    bi( 32,  1,  1,   4,  1,  1, 16, 16,  0,  0, Encoding::Unorm), // RG16
    bi( 24,  1,  1,   3,  1,  1,  8,  8,  8,  0, Encoding::Unorm), // RGB8
    bi( 16,  1,  1,   2,  1,  1, 16,  0,  0,  0, Encoding::Unorm), // R16
    bi( 32,  1,  1,   4,  1,  1, 32,  0,  0,  0, Encoding::Float), // R32F
    bi( 16,  1,  1,   2,  1,  1, 16,  0,  0,  0, Encoding::Float), // R16F
    bi( 32,  1,  1,   4,  1,  1, 16, 16,  0,  0, Encoding::Float), // RG16F
    bi( 32,  1,  1,   4,  1,  1, 16, 16,  0,  0, Encoding::Snorm), // RG16S
    bi( 64,  1,  1,   8,  1,  1, 16, 16, 16, 16, Encoding::Float), // RGBA16F
    bi( 64,  1,  1,   8,  1,  1, 16, 16, 16, 16, Encoding::Unorm), // RGBA16
    bi( 32,  1,  1,   4,  1,  1,  8,  8,  8,  8, Encoding::Unorm), // BGRA8
    bi( 32,  1,  1,   4,  1,  1, 10, 10, 10,  2, Encoding::Unorm), // RGB10A2
    bi( 32,  1,  1,   4,  1,  1, 11, 11, 10,  0, Encoding::Unorm), // RG11B10F
    bi( 16,  1,  1,   2,  1,  1,  8,  8,  0,  0, Encoding::Unorm), // RG8
    bi( 16,  1,  1,   2,  1,  1,  8,  8,  0,  0, Encoding::Snorm), // RG8S
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn block_size_matches_bpp_for_every_format() {
        for format in TextureFormat::ALL {
            let info = format.block_info();
            assert_eq!(
                info.block_size as u32 * 8,
                info.bpp as u32 * info.block_width as u32 * info.block_height as u32,
                "inconsistent block row for {}",
                format
            );
        }
    }

    #[test]
    fn names_are_total_and_injective() {
        let names: HashSet<&str> = TextureFormat::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), TextureFormat::COUNT);
        assert!(names.iter().all(|n| !n.is_empty() && n.is_ascii()));
    }

    #[test]
    fn compressed_partition_matches_listing() {
        let compressed = [
            TextureFormat::Bc1,
            TextureFormat::Bc2,
            TextureFormat::Bc3,
            TextureFormat::Bc4,
            TextureFormat::Bc5,
            TextureFormat::Bc6H,
            TextureFormat::Bc7,
            TextureFormat::Etc1,
            TextureFormat::Etc2,
            TextureFormat::Etc2A,
            TextureFormat::Etc2A1,
            TextureFormat::Ptc12,
            TextureFormat::Ptc14,
            TextureFormat::Ptc12A,
            TextureFormat::Ptc14A,
            TextureFormat::Ptc22,
            TextureFormat::Ptc24,
            TextureFormat::Atc,
            TextureFormat::Atce,
            TextureFormat::Atci,
            TextureFormat::Astc4x4,
            TextureFormat::Astc5x5,
            TextureFormat::Astc6x6,
            TextureFormat::Astc8x5,
            TextureFormat::Astc8x6,
            TextureFormat::Astc10x5,
        ];
        for format in TextureFormat::ALL {
            assert_eq!(format.is_compressed(), compressed.contains(&format));
        }
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(TextureFormat::Bc3.to_string(), "BC3");
        assert_eq!(TextureFormat::Rgba16F.to_string(), "RGBA16F");
        assert_eq!(TextureFormat::Astc6x6.to_string(), "ASTC6x6");
    }

    #[test]
    fn ordinals_are_dense_and_match_all() {
        for (idx, format) in TextureFormat::ALL.iter().enumerate() {
            assert_eq!(*format as usize, idx);
        }
    }
}
