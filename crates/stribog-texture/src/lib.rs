//! Zero-copy DDS/KTX texture container parsing.
//!
//! This crate reads GPU-ready texture containers from a fully materialized
//! byte buffer: DDS (legacy pixel formats, FourCC variants and the DX10/DXGI
//! extension) and KTX v1. Parsing produces a [`TextureInfo`] descriptor and
//! never copies, allocates or decodes pixel data; individual mip/layer/face
//! sub-images are resolved on demand into borrowed [`SubImage`] views.
//!
//! # Example
//!
//! ```no_run
//! use stribog_texture::parse;
//!
//! let data = std::fs::read("texture.dds")?;
//! let info = parse(&data)?;
//! println!("{} {}x{}, {} mips", info.format, info.width, info.height, info.num_mips);
//!
//! for mip in 0..info.num_mips {
//!     let sub = info.sub_image(&data, 0, 0, mip);
//!     // Upload sub.data as one GPU subresource.
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dds;
pub mod ktx;

mod error;
mod format;
mod sub;
#[cfg(test)]
mod test_prelude;
mod texture;

pub use dds::DDS_MAGIC;
pub use error::{Error, Result};
pub use format::{BlockInfo, Encoding, TextureFormat, BLOCK_INFO};
pub use ktx::KTX_MAGIC;
pub use sub::SubImage;
pub use texture::{TextureFlags, TextureInfo};

use stribog_common::BinaryReader;

/// Parse a texture container from a byte buffer.
///
/// Dispatches on the leading magic to the DDS or KTX parser. The buffer is
/// only borrowed: the returned descriptor carries offsets into it, and
/// [`TextureInfo::sub_image`] resolves sub-images against the same buffer
/// later.
pub fn parse(data: &[u8]) -> Result<TextureInfo> {
    let mut reader = BinaryReader::new(data);
    let magic = reader.read_bytes(4)?;
    if magic == DDS_MAGIC {
        dds::parse(data)
    } else if magic == KTX_MAGIC {
        ktx::parse(data)
    } else {
        Err(Error::UnknownMagic)
    }
}
