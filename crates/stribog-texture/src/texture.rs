//! The parsed texture descriptor.

use bitflags::bitflags;

use crate::format::TextureFormat;

bitflags! {
    /// Properties of a parsed texture.
    ///
    /// Exactly one of [`DDS`](TextureFlags::DDS) and
    /// [`KTX`](TextureFlags::KTX) is set on a valid descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextureFlags: u32 {
        /// Texture is a cubemap with six faces.
        const CUBEMAP = 0x01;
        /// Pixel data is sRGB encoded.
        const SRGB = 0x02;
        /// Texture has an alpha channel.
        const ALPHA = 0x04;
        /// Container was a DDS file.
        const DDS = 0x08;
        /// Container was a KTX file.
        const KTX = 0x10;
    }
}

/// Descriptor of a parsed texture container.
///
/// Pure value type: the pixel data itself stays in the caller's buffer, and
/// [`TextureInfo::sub_image`] resolves (layer, face/slice, mip) indices into
/// borrowed views of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Offset of the pixel payload from the start of the file.
    pub data_offset: usize,
    /// Byte span of the pixel payload up to the end of the file.
    ///
    /// For KTX this includes the interleaved per-mip image-size words and
    /// the cube/mip padding, not just pixel bytes.
    pub size_bytes: usize,
    /// Canonical pixel format.
    pub format: TextureFormat,
    /// Texture properties.
    pub flags: TextureFlags,
    /// Width of the base mip level, at least 1.
    pub width: u32,
    /// Height of the base mip level, at least 1.
    pub height: u32,
    /// Depth of the base mip level, at least 1; greater than 1 for 3D
    /// textures.
    pub depth: u32,
    /// Number of array layers, at least 1.
    pub num_layers: u32,
    /// Number of mip levels, at least 1.
    pub num_mips: u32,
    /// Bits per pixel, copied from the format's block info.
    pub bpp: u32,
    /// Offset of the KTX key/value metadata block; 0 for DDS.
    pub metadata_offset: usize,
    /// Size of the KTX key/value metadata block; 0 for DDS.
    ///
    /// The metadata is located but never interpreted.
    pub metadata_size: usize,
}

impl TextureInfo {
    /// Check if this texture is a cubemap.
    #[inline]
    pub fn is_cubemap(&self) -> bool {
        self.flags.contains(TextureFlags::CUBEMAP)
    }

    /// Number of cubemap faces: 6 for cubemaps, otherwise 1.
    #[inline]
    pub fn num_faces(&self) -> u32 {
        if self.is_cubemap() {
            6
        } else {
            1
        }
    }
}
