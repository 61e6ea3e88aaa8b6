// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    error::ConvertError,
    frame::{ChromaLayout, PlanarYuvFrame},
};
use core::fmt;
use std::ops::Deref;
use tracing::debug;
use turbojpeg::OwnedBuf;

/// Default JPEG quality for callers with no policy of their own.
pub const DEFAULT_QUALITY: u8 = 75;

/// A camera frame repacked into the NV21 byte layout.
///
/// The buffer is one contiguous allocation: the full-resolution luma plane
/// first, followed by the interleaved V,U chroma plane at half resolution
/// on both axes. It is built fresh for every frame, owned by the conversion
/// call, and dropped once the encoded image has been produced (unless the
/// caller keeps it for direct pixel access).
pub struct Nv21Buffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    y_len: usize,
}

impl Nv21Buffer {
    /// Repacks a validated frame into NV21.
    ///
    /// Luma rows are copied through the Y row stride so stride padding
    /// never reaches the output. The chroma copy strategy follows the
    /// layout detected at frame construction: interleaved sources reuse a
    /// row copy, planar sources are interleaved sample by sample.
    pub fn pack(frame: &PlanarYuvFrame) -> Self {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let y_len = frame.y_len();
        let vu_len = frame.vu_len();

        let mut data = Vec::with_capacity(y_len + vu_len);

        let y = frame.y();
        for row in 0..height {
            let start = row * y.row_stride;
            data.extend_from_slice(&y.buffer[start..start + width]);
        }

        match frame.chroma_layout() {
            ChromaLayout::InterleavedVu => pack_vu_interleaved(frame, &mut data),
            ChromaLayout::Planar => pack_vu_planar(frame, &mut data),
        }
        debug_assert_eq!(data.len(), y_len + vu_len);
        debug!("packed {} into {} byte nv21 buffer", frame, data.len());

        Self {
            data,
            width: frame.width(),
            height: frame.height(),
            y_len,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full NV21 byte sequence (luma followed by interleaved V,U).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Luma plane bytes.
    pub fn y(&self) -> &[u8] {
        &self.data[..self.y_len]
    }

    /// Interleaved V,U chroma bytes.
    pub fn vu(&self) -> &[u8] {
        &self.data[self.y_len..]
    }

    /// Converts the frame to a packed RGB888 raster.
    ///
    /// Full-range BT.601 integer math, for callers that need direct pixel
    /// access rather than compressed bytes. The output is row-major,
    /// `width * height * 3` bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        let w = self.width as usize;
        let h = self.height as usize;
        let cw = (w + 1) / 2;
        let y = self.y();
        let vu = self.vu();

        let mut rgb = Vec::with_capacity(w * h * 3);
        for row in 0..h {
            for col in 0..w {
                let luma = y[row * w + col] as i32;
                let c = (row / 2) * cw * 2 + (col / 2) * 2;
                let cr = vu[c] as i32 - 128;
                let cb = vu[c + 1] as i32 - 128;
                let r = luma + ((359 * cr) >> 8);
                let g = luma - ((88 * cb + 183 * cr) >> 8);
                let b = luma + ((454 * cb) >> 8);
                rgb.push(r.clamp(0, 255) as u8);
                rgb.push(g.clamp(0, 255) as u8);
                rgb.push(b.clamp(0, 255) as u8);
            }
        }
        rgb
    }
}

fn pack_vu_interleaved(frame: &PlanarYuvFrame, out: &mut Vec<u8>) {
    let v = frame.v();
    let u = frame.u();
    let cw = frame.chroma_width();
    let ch = frame.chroma_height();

    for row in 0..ch {
        let start = row * v.row_stride;
        let want = 2 * cw;
        let have = v.buffer.len().saturating_sub(start).min(want);
        out.extend_from_slice(&v.buffer[start..start + have]);
        if have < want {
            // Semi-planar sources end one byte short of the final V,U
            // pair; the missing U sample lives in plane 1.
            out.push(u.sample(cw - 1, row));
        }
    }
}

fn pack_vu_planar(frame: &PlanarYuvFrame, out: &mut Vec<u8>) {
    let v = frame.v();
    let u = frame.u();
    for row in 0..frame.chroma_height() {
        for col in 0..frame.chroma_width() {
            out.push(v.sample(col, row));
            out.push(u.sample(col, row));
        }
    }
}

/// A JPEG-encoded frame together with the parameters that produced it.
#[derive(Debug)]
pub struct EncodedImage {
    data: OwnedBuf,
    width: u32,
    height: u32,
    quality: u8,
}

impl EncodedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Deref for EncodedImage {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} jpeg q{} ({} bytes)",
            self.width,
            self.height,
            self.quality,
            self.data.len()
        )
    }
}

/// Encodes an NV21 buffer to baseline JPEG using turbojpeg.
///
/// The interleaved chroma is split back into the planar Y/U/V order
/// libjpeg-turbo expects and compressed with 4:2:0 subsampling, so the
/// encoder consumes the camera's chroma samples directly with no RGB
/// round trip.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidQuality`] for quality above 100 and
/// [`ConvertError::Encode`] when the encoder rejects the input.
pub fn encode_jpeg(nv21: &Nv21Buffer, quality: u8) -> Result<EncodedImage, ConvertError> {
    if quality > 100 {
        return Err(ConvertError::InvalidQuality(quality));
    }

    let vu = nv21.vu();
    let mut planar = Vec::with_capacity(nv21.as_bytes().len());
    planar.extend_from_slice(nv21.y());
    planar.extend(vu.iter().skip(1).step_by(2).copied());
    planar.extend(vu.iter().step_by(2).copied());

    let image = turbojpeg::YuvImage {
        pixels: planar.as_slice(),
        width: nv21.width() as usize,
        align: 1,
        height: nv21.height() as usize,
        subsamp: turbojpeg::Subsamp::Sub2x2,
    };
    // libjpeg-turbo's minimum quality is 1
    let data = turbojpeg::compress_yuv(image, quality.max(1) as i32)?;
    debug!(
        "encoded {}x{} frame to {} byte jpeg at q{}",
        nv21.width(),
        nv21.height(),
        data.len(),
        quality
    );

    Ok(EncodedImage {
        data,
        width: nv21.width(),
        height: nv21.height(),
        quality,
    })
}

/// Converts a planar YUV 4:2:0 frame to a baseline JPEG.
///
/// This is the one-shot entry point: repack the frame into NV21, then
/// encode the full image rectangle at the requested quality. The frame is
/// only read; the intermediate buffer is dropped before returning.
pub fn convert(frame: &PlanarYuvFrame, quality: u8) -> Result<EncodedImage, ConvertError> {
    let nv21 = Nv21Buffer::pack(frame);
    encode_jpeg(&nv21, quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Plane;

    // 4x4 frame: luma ramp, V ramp from 0x40, U ramp from 0xA0
    fn planar_frame_bufs() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let y: Vec<u8> = (0u8..16).map(|i| i * 16).collect();
        let v: Vec<u8> = (0u8..4).map(|i| 0x40 + i).collect();
        let u: Vec<u8> = (0u8..4).map(|i| 0xA0 + i).collect();
        (y, u, v)
    }

    #[test]
    fn test_pack_planar() {
        let (y, u, v) = planar_frame_bufs();
        let planes = [Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let nv21 = Nv21Buffer::pack(&frame);

        assert_eq!(nv21.as_bytes().len(), frame.y_len() + frame.vu_len());
        assert_eq!(nv21.y(), &y[..]);
        assert_eq!(nv21.vu(), &[0x40, 0xA0, 0x41, 0xA1, 0x42, 0xA2, 0x43, 0xA3]);
    }

    #[test]
    fn test_pack_interleaved_matches_planar() {
        let (y, u, v) = planar_frame_bufs();
        let planes = [Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let reference = Nv21Buffer::pack(&frame);

        // Same logical frame with the chroma pre-interleaved as V,U pairs,
        // the U view aliasing one byte in, both one byte short of the end
        // as semi-planar camera sources report them.
        let vu: Vec<u8> = reference.vu().to_vec();
        let planes = [
            Plane::new(&y, 4, 1),
            Plane::new(&vu[1..], 4, 2),
            Plane::new(&vu[..7], 4, 2),
        ];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let nv21 = Nv21Buffer::pack(&frame);

        assert_eq!(nv21.as_bytes(), reference.as_bytes());
    }

    #[test]
    fn test_pack_strips_luma_padding() {
        let (_, u, v) = planar_frame_bufs();
        let mut y = vec![0xEE; 8 * 4];
        for row in 0..4 {
            for col in 0..4 {
                y[row * 8 + col] = (row * 4 + col) as u8;
            }
        }
        let planes = [Plane::new(&y, 8, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let nv21 = Nv21Buffer::pack(&frame);

        let expected: Vec<u8> = (0..16).collect();
        assert_eq!(nv21.y(), &expected[..]);
    }

    #[test]
    fn test_to_rgb_neutral_gray() {
        let y = vec![128u8; 16];
        let u = vec![128u8; 4];
        let v = vec![128u8; 4];
        let planes = [Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let rgb = Nv21Buffer::pack(&frame).to_rgb();

        assert_eq!(rgb.len(), 4 * 4 * 3);
        assert!(rgb.iter().all(|&px| px == 128));
    }

    #[test]
    fn test_to_rgb_red_direction() {
        // V well above neutral pushes red up and green down
        let y = vec![128u8; 16];
        let u = vec![128u8; 4];
        let v = vec![255u8; 4];
        let planes = [Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let rgb = Nv21Buffer::pack(&frame).to_rgb();

        let (r, g, b) = (rgb[0], rgb[1], rgb[2]);
        assert!(r > 200, "r = {r}");
        assert!(g < 128, "g = {g}");
        assert_eq!(b, 128);
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let y = vec![128u8; 16];
        let u = vec![128u8; 4];
        let v = vec![128u8; 4];
        let planes = [Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)];
        let frame = PlanarYuvFrame::new(4, 4, &planes).unwrap();
        let nv21 = Nv21Buffer::pack(&frame);

        let err = encode_jpeg(&nv21, 101).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidQuality(101)));
    }
}
