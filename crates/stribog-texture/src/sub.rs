//! Sub-image location within a parsed texture payload.
//!
//! The payload of a texture container packs every (layer, face, slice, mip)
//! combination back to back, in an order that differs between DDS and KTX.
//! [`TextureInfo::sub_image`] walks that layout and returns a borrowed view
//! of exactly one sub-image, touching no unrelated bytes.

use crate::format::BlockInfo;
use crate::texture::{TextureFlags, TextureInfo};

/// A borrowed view of one (layer, face-or-slice, mip) sub-image.
///
/// The view points into the caller's file buffer; it never owns pixel data.
#[derive(Debug, Clone, Copy)]
pub struct SubImage<'a> {
    /// Encoded bytes of this sub-image.
    pub data: &'a [u8],
    /// Width in texels, rounded up to the block grid.
    pub width: u32,
    /// Height in texels, rounded up to the block grid.
    pub height: u32,
    /// Bytes per row of texels.
    pub row_pitch: u32,
}

impl SubImage<'_> {
    /// Byte size of this sub-image.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Round `width` and `height` of a mip level up to the format's block grid
/// and minimum surface size.
pub(crate) fn mip_dimensions(width: u32, height: u32, info: &BlockInfo) -> (u32, u32) {
    let bw = info.block_width as u32;
    let bh = info.block_height as u32;
    let w = width.div_ceil(bw) * bw;
    let h = height.div_ceil(bh) * bh;
    let w = w.max(info.min_block_x as u32 * bw);
    let h = h.max(info.min_block_y as u32 * bh);
    (w, h)
}

/// Byte size of one slice of a mip level with block-rounded dimensions.
pub(crate) fn mip_size_bytes(width: u32, height: u32, info: &BlockInfo) -> usize {
    let size = (width / info.block_width as u32) as usize
        * (height / info.block_height as u32) as usize
        * info.block_size as usize;
    debug_assert_eq!(
        size,
        width as usize * height as usize * info.bpp as usize / 8
    );
    size
}

const fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

fn read_u32_be(data: &[u8], offset: usize) -> u32 {
    assert!(offset + 4 <= data.len(), "texture payload truncated");
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

impl TextureInfo {
    /// Locate one sub-image inside the file buffer this descriptor was
    /// parsed from.
    ///
    /// `slice_face_idx` selects the cubemap face for cubemaps and the depth
    /// slice for everything else. Out-of-range indices and payloads shorter
    /// than the header promises are programming errors and panic; they are
    /// never parse errors.
    pub fn sub_image<'a>(
        &self,
        data: &'a [u8],
        layer_idx: u32,
        slice_face_idx: u32,
        mip_idx: u32,
    ) -> SubImage<'a> {
        assert!(layer_idx < self.num_layers, "layer index out of range");
        assert!(mip_idx < self.num_mips, "mip index out of range");
        if self.is_cubemap() {
            assert!(slice_face_idx < 6, "cubemap face index out of range");
        } else {
            assert!(slice_face_idx < self.depth, "depth slice index out of range");
        }

        if self.flags.contains(TextureFlags::DDS) {
            self.locate_dds(data, layer_idx, slice_face_idx, mip_idx)
        } else {
            self.locate_ktx(data, layer_idx, slice_face_idx, mip_idx)
        }
    }

    /// DDS payload order: layer, face, mip, slice.
    fn locate_dds<'a>(
        &self,
        data: &'a [u8],
        layer_idx: u32,
        slice_face_idx: u32,
        mip_idx: u32,
    ) -> SubImage<'a> {
        let info = self.format.block_info();
        let cubemap = self.is_cubemap();
        let num_faces = self.num_faces();
        let mut offset = self.data_offset;

        for layer in 0..self.num_layers {
            for face in 0..num_faces {
                let mut width = self.width;
                let mut height = self.height;
                let mut depth = self.depth;
                for mip in 0..self.num_mips {
                    let (w, h) = mip_dimensions(width, height, info);
                    let size = mip_size_bytes(w, h, info);

                    for slice in 0..depth {
                        let wanted = layer == layer_idx
                            && mip == mip_idx
                            && if cubemap {
                                face == slice_face_idx
                            } else {
                                slice == slice_face_idx
                            };
                        if wanted {
                            return SubImage {
                                data: &data[offset..offset + size],
                                width: w,
                                height: h,
                                row_pitch: w * info.bpp as u32 / 8,
                            };
                        }
                        offset += size;
                    }

                    width >>= 1;
                    height >>= 1;
                    depth = (depth >> 1).max(1);
                }
            }
        }
        unreachable!("sub-image walk exhausted the payload");
    }

    /// KTX payload order: mip (led by its image size word), layer, face,
    /// slice, with 4-byte padding after each face and after each mip.
    fn locate_ktx<'a>(
        &self,
        data: &'a [u8],
        layer_idx: u32,
        slice_face_idx: u32,
        mip_idx: u32,
    ) -> SubImage<'a> {
        let info = self.format.block_info();
        let cubemap = self.is_cubemap();
        let num_faces = self.num_faces();
        let mut offset = self.data_offset;
        let mut width = self.width;
        let mut height = self.height;
        let mut depth = self.depth;

        for mip in 0..self.num_mips {
            let (w, h) = mip_dimensions(width, height, info);
            let size = mip_size_bytes(w, h, info);

            let image_size = read_u32_be(data, offset);
            offset += 4;
            debug_assert_eq!(
                image_size as usize,
                size * num_faces as usize * depth as usize,
                "ktx image size word does not match computed mip size"
            );

            for layer in 0..self.num_layers {
                for face in 0..num_faces {
                    for slice in 0..depth {
                        let wanted = layer == layer_idx
                            && mip == mip_idx
                            && if cubemap {
                                face == slice_face_idx
                            } else {
                                slice == slice_face_idx
                            };
                        if wanted {
                            return SubImage {
                                data: &data[offset..offset + size],
                                width: w,
                                height: h,
                                row_pitch: w * info.bpp as u32 / 8,
                            };
                        }
                        offset += size;
                    }
                    // Cube padding.
                    offset = align4(offset);
                }
            }
            // Mip padding.
            offset = align4(offset);

            width >>= 1;
            height >>= 1;
            depth = (depth >> 1).max(1);
        }
        unreachable!("sub-image walk exhausted the payload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::{DdsPixelFlags, FourCC};
    use crate::ktx::gl;
    use crate::test_prelude::*;
    use crate::{parse, TextureFormat};

    const RGBA_MASKS: [u32; 4] = [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000];

    fn rgba_flags() -> DdsPixelFlags {
        DdsPixelFlags::RGB.union(DdsPixelFlags::ALPHA_PIXELS)
    }

    fn offset_of(file: &[u8], sub: &SubImage<'_>) -> usize {
        sub.data.as_ptr() as usize - file.as_ptr() as usize
    }

    #[test]
    fn dds_bc3_mip_chain_sizes_and_offsets() {
        let file = DdsBuilder::four_cc(FourCC::DXT5, 128, 128, 4).build();
        let info = parse(&file).unwrap();

        let expected = [16384usize, 4096, 1024, 256];
        let mut offset = info.data_offset;
        for (mip, want) in expected.iter().enumerate() {
            let sub = info.sub_image(&file, 0, 0, mip as u32);
            assert_eq!(sub.size_bytes(), *want, "mip {}", mip);
            assert_eq!(offset_of(&file, &sub), offset, "mip {}", mip);
            offset += want;
        }
        assert_eq!(offset, info.data_offset + info.size_bytes);
    }

    #[test]
    fn dds_cubemap_face_offsets() {
        let mut builder = DdsBuilder::masked(32, rgba_flags(), RGBA_MASKS, 64, 64);
        builder.cubemap = true;
        let file = builder.build();
        let info = parse(&file).unwrap();

        let sub = info.sub_image(&file, 0, 3, 0);
        assert_eq!(offset_of(&file, &sub), info.data_offset + 3 * 16384);
        assert_eq!(sub.size_bytes(), 16384);
        assert_eq!(sub.row_pitch, 256);
    }

    #[test]
    fn dds_cubemap_interleaves_mips_per_face() {
        let mut builder = DdsBuilder::four_cc(FourCC::DXT1, 8, 8, 2);
        builder.cubemap = true;
        let file = builder.build();
        let info = parse(&file).unwrap();

        // One face's mip chain: 8x8 BC1 (32 bytes) + 4x4 (8 bytes).
        let face_chain = 32 + 8;
        let sub = info.sub_image(&file, 0, 2, 1);
        assert_eq!(offset_of(&file, &sub), info.data_offset + 2 * face_chain + 32);
        assert_eq!(sub.size_bytes(), 8);
    }

    #[test]
    fn dds_volume_slices_within_mips() {
        let mut builder = DdsBuilder::masked(32, rgba_flags(), RGBA_MASKS, 4, 4);
        builder.depth = 4;
        builder.mips = 2;
        let file = builder.build();
        let info = parse(&file).unwrap();
        assert_eq!(info.depth, 4);

        // Mip 0 holds four 64-byte slices, mip 1 two 16-byte slices.
        let sub = info.sub_image(&file, 0, 1, 1);
        assert_eq!(offset_of(&file, &sub), info.data_offset + 4 * 64 + 16);
        assert_eq!(sub.size_bytes(), 16);
        assert_eq!(sub.width, 2);
    }

    #[test]
    fn dds_array_layers_carry_whole_chains() {
        let mut builder = DdsBuilder::dx10(crate::dds::dxgi::R8G8B8A8_UNORM, 8, 8, 2);
        builder.array_size = 3;
        let file = builder.build();
        let info = parse(&file).unwrap();
        assert_eq!(info.num_layers, 3);

        let layer_chain = 8 * 8 * 4 + 4 * 4 * 4;
        let sub = info.sub_image(&file, 2, 0, 1);
        assert_eq!(
            offset_of(&file, &sub),
            info.data_offset + 2 * layer_chain + 8 * 8 * 4
        );
        assert_eq!(sub.size_bytes(), 64);
    }

    #[test]
    fn dds_small_mips_clamp_to_block_size() {
        let file = DdsBuilder::four_cc(FourCC::DXT1, 16, 16, 5).build();
        let info = parse(&file).unwrap();

        // 1x1 mip still occupies a full 4x4 block.
        let sub = info.sub_image(&file, 0, 0, 4);
        assert_eq!((sub.width, sub.height), (4, 4));
        assert_eq!(sub.size_bytes(), 8);
    }

    #[test]
    fn ktx_mip_chain_skips_image_size_words() {
        let file = KtxBuilder::new(gl::COMPRESSED_RGB8_ETC2, TextureFormat::Etc2, 32, 32)
            .with_mips(6)
            .build();
        let info = parse(&file).unwrap();

        let sizes = [512usize, 128, 32, 8, 8, 8];
        let mut offset = info.data_offset;
        for (mip, want) in sizes.iter().enumerate() {
            // The stored image size word matches the computed mip size.
            let word = u32::from_be_bytes(file[offset..offset + 4].try_into().unwrap());
            assert_eq!(word as usize, *want, "image size word, mip {}", mip);
            offset += 4;

            let sub = info.sub_image(&file, 0, 0, mip as u32);
            assert_eq!(sub.size_bytes(), *want, "mip {}", mip);
            assert_eq!(offset_of(&file, &sub), offset, "mip {}", mip);
            offset += want;
        }
        assert_eq!(offset, info.data_offset + info.size_bytes);
    }

    #[test]
    fn ktx_cube_faces_pad_to_dword() {
        // 1x1 RGB8 faces are 3 bytes each, so every face is followed by a pad.
        let file = KtxBuilder::new(gl::RGB8, TextureFormat::Rgb8, 1, 1)
            .with_faces(6)
            .build();
        let info = parse(&file).unwrap();

        for face in 0..6 {
            let sub = info.sub_image(&file, 0, face, 0);
            assert_eq!(
                offset_of(&file, &sub),
                info.data_offset + 4 + face as usize * 4
            );
            assert_eq!(sub.size_bytes(), 3);
        }
    }

    #[test]
    fn ktx_array_layers_follow_each_other() {
        let file = KtxBuilder::new(gl::RGBA8, TextureFormat::Rgba8, 4, 4)
            .with_layers(2)
            .build();
        let info = parse(&file).unwrap();
        assert_eq!(info.num_layers, 2);

        let first = info.sub_image(&file, 0, 0, 0);
        let second = info.sub_image(&file, 1, 0, 0);
        assert_eq!(offset_of(&file, &first), info.data_offset + 4);
        assert_eq!(offset_of(&file, &second), info.data_offset + 4 + 64);
    }

    #[test]
    fn every_sub_image_stays_inside_the_payload() {
        let mut builder = DdsBuilder::four_cc(FourCC::DXT5, 64, 64, 7);
        builder.cubemap = true;
        let dds = builder.build();
        let ktx = KtxBuilder::new(gl::COMPRESSED_RGBA8_ETC2_EAC, TextureFormat::Etc2A, 64, 64)
            .with_faces(6)
            .with_mips(7)
            .build();

        for file in [&dds, &ktx] {
            let info = parse(file).unwrap();
            let begin = info.data_offset;
            let end = info.data_offset + info.size_bytes;
            for layer in 0..info.num_layers {
                for face in 0..info.num_faces() {
                    for mip in 0..info.num_mips {
                        let sub = info.sub_image(file, layer, face, mip);
                        let at = offset_of(file, &sub);
                        assert!(at >= begin && at + sub.size_bytes() <= end);
                    }
                }
            }
        }
    }

    #[test]
    fn dds_mip_sizes_sum_to_payload_size() {
        let mut builder = DdsBuilder::dx10(crate::dds::dxgi::BC7_UNORM, 128, 64, 8);
        builder.array_size = 2;
        let file = builder.build();
        let info = parse(&file).unwrap();

        let mut total = 0;
        for layer in 0..info.num_layers {
            for mip in 0..info.num_mips {
                total += info.sub_image(&file, layer, 0, mip).size_bytes();
            }
        }
        assert!(total <= info.size_bytes);
        assert_eq!(total, info.size_bytes);
    }

    #[test]
    #[should_panic(expected = "layer index out of range")]
    fn rejects_layer_out_of_range() {
        let file = DdsBuilder::four_cc(FourCC::DXT1, 4, 4, 1).build();
        let info = parse(&file).unwrap();
        info.sub_image(&file, 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "mip index out of range")]
    fn rejects_mip_out_of_range() {
        let file = DdsBuilder::four_cc(FourCC::DXT1, 4, 4, 1).build();
        let info = parse(&file).unwrap();
        info.sub_image(&file, 0, 0, 1);
    }

    #[test]
    #[should_panic(expected = "cubemap face index out of range")]
    fn rejects_face_out_of_range() {
        let mut builder = DdsBuilder::four_cc(FourCC::DXT1, 4, 4, 1);
        builder.cubemap = true;
        let file = builder.build();
        let info = parse(&file).unwrap();
        info.sub_image(&file, 0, 6, 0);
    }

    #[test]
    #[should_panic(expected = "depth slice index out of range")]
    fn rejects_slice_out_of_range() {
        let file = DdsBuilder::four_cc(FourCC::DXT1, 4, 4, 1).build();
        let info = parse(&file).unwrap();
        info.sub_image(&file, 0, 1, 0);
    }
}
