//! Builders for the synthetic DDS and KTX files used across the test suite.

use crate::dds::{DdsCaps, DdsCaps2, DdsFlags, DdsPixelFlags, FourCC, DDS_MAGIC};
use crate::format::TextureFormat;
use crate::ktx::{KTX_ENDIAN_REF, KTX_ID_TAIL, KTX_MAGIC};
use crate::sub::{mip_dimensions, mip_size_bytes};
use crate::texture::TextureInfo;

fn push_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

/// Exact DDS payload size for a descriptor: one mip chain per layer and
/// face, every mip holding one slice per depth level.
pub(crate) fn payload_size(info: &TextureInfo) -> usize {
    let block = info.format.block_info();
    let mut total = 0;
    for _ in 0..info.num_layers * info.num_faces() {
        let mut width = info.width;
        let mut height = info.height;
        let mut depth = info.depth;
        for _ in 0..info.num_mips {
            let (w, h) = mip_dimensions(width, height, block);
            total += mip_size_bytes(w, h, block) * depth as usize;
            width >>= 1;
            height >>= 1;
            depth = (depth >> 1).max(1);
        }
    }
    total
}

/// A DDS file under construction. The defaults describe a well-formed 2D
/// texture; tests flip individual fields to produce malformed files.
pub(crate) struct DdsBuilder {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mips: u32,
    pub pixel_flags: DdsPixelFlags,
    pub four_cc: FourCC,
    pub bit_count: u32,
    pub masks: [u32; 4],
    pub dxgi_format: u32,
    pub array_size: u32,
    pub dx10_misc_flag: u32,
    pub cubemap: bool,
    pub incomplete_cubemap: bool,
    pub pixel_format_size: u32,
    pub clear_required_flags: bool,
    pub clear_texture_cap: bool,
    pub clear_mipmap_cap: bool,
}

impl DdsBuilder {
    fn base(width: u32, height: u32, mips: u32) -> Self {
        Self {
            width,
            height,
            depth: 0,
            mips,
            pixel_flags: DdsPixelFlags::FOURCC,
            four_cc: FourCC([0; 4]),
            bit_count: 0,
            masks: [0; 4],
            dxgi_format: 0,
            array_size: 1,
            dx10_misc_flag: 0,
            cubemap: false,
            incomplete_cubemap: false,
            pixel_format_size: 32,
            clear_required_flags: false,
            clear_texture_cap: false,
            clear_mipmap_cap: false,
        }
    }

    /// A legacy FourCC file.
    pub fn four_cc(four_cc: FourCC, width: u32, height: u32, mips: u32) -> Self {
        Self {
            four_cc,
            ..Self::base(width, height, mips)
        }
    }

    /// A DX10-extended file with the given DXGI format.
    pub fn dx10(dxgi_format: u32, width: u32, height: u32, mips: u32) -> Self {
        Self {
            four_cc: FourCC::DX10,
            dxgi_format,
            ..Self::base(width, height, mips)
        }
    }

    /// An uncompressed legacy file described by bit count and channel masks.
    pub fn masked(
        bit_count: u32,
        pixel_flags: DdsPixelFlags,
        masks: [u32; 4],
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            pixel_flags,
            bit_count,
            masks,
            ..Self::base(width, height, 1)
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&DDS_MAGIC);

        let mut flags = if self.clear_required_flags {
            DdsFlags::CAPS
        } else {
            DdsFlags::REQUIRED
        };
        if self.mips > 1 {
            flags |= DdsFlags::MIPMAP_COUNT;
        }
        if self.depth > 1 {
            flags |= DdsFlags::DEPTH;
        }

        push_u32_le(&mut out, 124);
        push_u32_le(&mut out, flags.bits());
        push_u32_le(&mut out, self.height);
        push_u32_le(&mut out, self.width);
        push_u32_le(&mut out, 0); // pitch or linear size
        push_u32_le(&mut out, self.depth);
        push_u32_le(&mut out, self.mips);
        for _ in 0..11 {
            push_u32_le(&mut out, 0);
        }

        push_u32_le(&mut out, self.pixel_format_size);
        push_u32_le(&mut out, self.pixel_flags.bits());
        out.extend_from_slice(&self.four_cc.0);
        push_u32_le(&mut out, self.bit_count);
        for mask in self.masks {
            push_u32_le(&mut out, mask);
        }

        let mut caps = if self.clear_texture_cap {
            DdsCaps::empty()
        } else {
            DdsCaps::TEXTURE
        };
        if self.mips > 1 && !self.clear_mipmap_cap {
            caps |= DdsCaps::MIPMAP | DdsCaps::COMPLEX;
        }
        let mut caps2 = DdsCaps2::empty();
        if self.cubemap {
            caps2 |= DdsCaps2::CUBEMAP;
            caps2 |= if self.incomplete_cubemap {
                DdsCaps2::CUBEMAP_POSITIVE_X
                    | DdsCaps2::CUBEMAP_NEGATIVE_X
                    | DdsCaps2::CUBEMAP_POSITIVE_Y
            } else {
                DdsCaps2::CUBEMAP_ALL_FACES
            };
        }
        push_u32_le(&mut out, caps.bits());
        push_u32_le(&mut out, caps2.bits());
        push_u32_le(&mut out, 0);
        push_u32_le(&mut out, 0);
        push_u32_le(&mut out, 0);

        if self.four_cc == FourCC::DX10 {
            push_u32_le(&mut out, self.dxgi_format);
            push_u32_le(&mut out, 3); // TEXTURE2D
            push_u32_le(&mut out, self.dx10_misc_flag);
            push_u32_le(&mut out, self.array_size);
            push_u32_le(&mut out, 0);
        }

        // Append an exactly sized zero payload when the header is parseable.
        if let Ok(info) = crate::parse(&out) {
            let payload = payload_size(&info);
            out.resize(out.len() + payload, 0);
        }
        out
    }
}

/// A KTX v1 file under construction. `format` drives the payload geometry
/// and normally corresponds to `internal_format`.
pub(crate) struct KtxBuilder {
    pub internal_format: u32,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_count: u32,
    pub face_count: u32,
    pub mip_count: u32,
    pub metadata: Vec<u8>,
    pub metadata_size_override: Option<u32>,
    pub little_endian: bool,
}

impl KtxBuilder {
    pub fn new(internal_format: u32, format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            internal_format,
            format,
            width,
            height,
            depth: 0,
            array_count: 0,
            face_count: 1,
            mip_count: 1,
            metadata: Vec::new(),
            metadata_size_override: None,
            little_endian: false,
        }
    }

    pub fn with_mips(mut self, mip_count: u32) -> Self {
        self.mip_count = mip_count;
        self
    }

    pub fn with_faces(mut self, face_count: u32) -> Self {
        self.face_count = face_count;
        self
    }

    pub fn with_layers(mut self, array_count: u32) -> Self {
        self.array_count = array_count;
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<u8>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&KTX_MAGIC);
        out.extend_from_slice(&KTX_ID_TAIL);

        if self.little_endian {
            out.extend_from_slice(&KTX_ENDIAN_REF.to_le_bytes());
        } else {
            push_u32_be(&mut out, KTX_ENDIAN_REF);
        }
        push_u32_be(&mut out, 0); // gl type
        push_u32_be(&mut out, 1); // gl type size
        push_u32_be(&mut out, 0); // gl format
        push_u32_be(&mut out, self.internal_format);
        push_u32_be(&mut out, 0); // gl base internal format
        push_u32_be(&mut out, self.width);
        push_u32_be(&mut out, self.height);
        push_u32_be(&mut out, self.depth);
        push_u32_be(&mut out, self.array_count);
        push_u32_be(&mut out, self.face_count);
        push_u32_be(&mut out, self.mip_count);
        let metadata_size = self
            .metadata_size_override
            .unwrap_or(self.metadata.len() as u32);
        push_u32_be(&mut out, metadata_size);
        out.extend_from_slice(&self.metadata);

        // Payload: every mip led by its image size word, faces and mips
        // padded to DWORD boundaries.
        let block = self.format.block_info();
        let faces = if self.face_count == 6 { 6 } else { 1 };
        let layers = self.array_count.max(1);
        let mut width = self.width.max(1);
        let mut height = self.height.max(1);
        let mut depth = self.depth.max(1);
        for _ in 0..self.mip_count.max(1) {
            let (w, h) = mip_dimensions(width, height, block);
            let size = mip_size_bytes(w, h, block);
            push_u32_be(&mut out, size as u32 * faces * depth);

            for _ in 0..layers {
                for _ in 0..faces {
                    for _ in 0..depth {
                        out.resize(out.len() + size, 0);
                    }
                    pad4(&mut out);
                }
            }
            pad4(&mut out);

            width >>= 1;
            height >>= 1;
            depth = (depth >> 1).max(1);
        }
        out
    }
}
