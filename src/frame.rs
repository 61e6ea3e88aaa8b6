// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::ConvertError;
use core::fmt;
use tracing::debug;

/// Borrowed view over a single plane of camera-supplied memory.
///
/// The buffer is owned by the camera pipeline and must stay valid and
/// read-only for as long as the plane is borrowed; the borrow checker
/// enforces this for the duration of a conversion call.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    /// Raw plane bytes as handed out by the camera pipeline
    pub buffer: &'a [u8],
    /// Byte distance between consecutive rows
    pub row_stride: usize,
    /// Byte distance between consecutive samples within a row
    pub pixel_stride: usize,
}

impl<'a> Plane<'a> {
    pub fn new(buffer: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            buffer,
            row_stride,
            pixel_stride,
        }
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Sample at (col, row) addressed through the plane strides.
    pub(crate) fn sample(&self, col: usize, row: usize) -> u8 {
        self.buffer[row * self.row_stride + col * self.pixel_stride]
    }
}

/// Chroma memory layout, detected from the plane pixel strides.
///
/// Camera stacks disagree on how the two chroma planes of a 4:2:0 frame
/// are laid out: semi-planar sources expose plane 2 as interleaved V,U
/// byte pairs (with plane 1 aliasing the same memory one byte in), while
/// fully planar sources supply separate tightly packed U and V planes.
/// Selecting the packing strategy from the stride metadata, instead of
/// assuming interleaving, keeps both kinds of device correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaLayout {
    /// Plane 2 already holds interleaved V,U byte pairs (pixel stride 2)
    InterleavedVu,
    /// Separate U and V planes, one byte per sample (pixel stride 1)
    Planar,
}

/// Immutable view over a planar YUV 4:2:0 camera frame.
///
/// Plane 0 is full-resolution luma; planes 1 and 2 are chroma subsampled
/// at half resolution on both axes. Construction validates the descriptor
/// against the declared dimensions so the packing and encoding stages can
/// run without further bounds concerns.
///
/// # Example
///
/// ```
/// use frame_convert::frame::{ChromaLayout, Plane, PlanarYuvFrame};
///
/// # fn main() -> Result<(), frame_convert::ConvertError> {
/// let y = vec![128u8; 16];
/// let u = vec![128u8; 4];
/// let v = vec![128u8; 4];
/// let frame = PlanarYuvFrame::new(
///     4,
///     4,
///     &[Plane::new(&y, 4, 1), Plane::new(&u, 2, 1), Plane::new(&v, 2, 1)],
/// )?;
/// assert_eq!(frame.chroma_layout(), ChromaLayout::Planar);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlanarYuvFrame<'a> {
    width: u32,
    height: u32,
    y: Plane<'a>,
    u: Plane<'a>,
    v: Plane<'a>,
    chroma: ChromaLayout,
}

impl<'a> PlanarYuvFrame<'a> {
    /// Builds a frame view from the three plane descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidFrame`] when the descriptor itself is
    /// malformed (plane count, dimensions, strides) and
    /// [`ConvertError::BufferSizeMismatch`] when a plane buffer cannot cover
    /// the samples its declared geometry addresses.
    pub fn new(
        width: u32,
        height: u32,
        planes: &[Plane<'a>],
    ) -> Result<Self, ConvertError> {
        if planes.len() != 3 {
            return Err(ConvertError::InvalidFrame(format!(
                "expected 3 planes, found {}",
                planes.len()
            )));
        }
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidFrame(format!(
                "invalid dimensions {width}x{height}"
            )));
        }

        let (y, u, v) = (planes[0], planes[1], planes[2]);
        let (w, h) = (width as usize, height as usize);

        if y.pixel_stride != 1 {
            return Err(ConvertError::InvalidFrame(format!(
                "luma pixel stride {} is unsupported",
                y.pixel_stride
            )));
        }
        if y.row_stride < w {
            return Err(ConvertError::InvalidFrame(format!(
                "luma row stride {} is smaller than width {w}",
                y.row_stride
            )));
        }

        let chroma = match (u.pixel_stride, v.pixel_stride) {
            (2, 2) => ChromaLayout::InterleavedVu,
            (1, 1) => ChromaLayout::Planar,
            (ups, vps) => {
                return Err(ConvertError::InvalidFrame(format!(
                    "unrecognized chroma pixel strides {ups}/{vps}"
                )))
            }
        };

        let expected = (h - 1) * y.row_stride + w;
        if y.size() < expected {
            return Err(ConvertError::BufferSizeMismatch {
                plane: 0,
                expected,
                actual: y.size(),
            });
        }

        let cw = (w + 1) / 2;
        let ch = (h + 1) / 2;
        // Interleaved rows are copied whole, so every row before the last
        // must expose a full cw pairs; the final row may stop at its last
        // V sample (semi-planar sources end one byte short of a pair).
        let row_min = match chroma {
            ChromaLayout::InterleavedVu => 2 * cw,
            ChromaLayout::Planar => cw,
        };
        for (idx, plane) in [(1usize, u), (2usize, v)] {
            if ch > 1 && plane.row_stride < row_min {
                return Err(ConvertError::InvalidFrame(format!(
                    "chroma plane {idx} row stride {} is smaller than {row_min}",
                    plane.row_stride
                )));
            }
            let expected = (ch - 1) * plane.row_stride + (cw - 1) * plane.pixel_stride + 1;
            if plane.size() < expected {
                return Err(ConvertError::BufferSizeMismatch {
                    plane: idx,
                    expected,
                    actual: plane.size(),
                });
            }
        }

        debug!(
            "frame {}x{} chroma {:?} planes {}/{}/{} bytes",
            width,
            height,
            chroma,
            y.size(),
            u.size(),
            v.size()
        );

        Ok(Self {
            width,
            height,
            y,
            u,
            v,
            chroma,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn y(&self) -> &Plane<'a> {
        &self.y
    }

    pub fn u(&self) -> &Plane<'a> {
        &self.u
    }

    pub fn v(&self) -> &Plane<'a> {
        &self.v
    }

    pub fn chroma_layout(&self) -> ChromaLayout {
        self.chroma
    }

    /// Chroma plane width in samples (odd frame widths round up).
    pub fn chroma_width(&self) -> usize {
        (self.width as usize + 1) / 2
    }

    /// Chroma plane height in rows (odd frame heights round up).
    pub fn chroma_height(&self) -> usize {
        (self.height as usize + 1) / 2
    }

    /// Luma byte count of the packed NV21 representation.
    pub fn y_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Interleaved V,U byte count of the packed NV21 representation.
    pub fn vu_len(&self) -> usize {
        2 * self.chroma_width() * self.chroma_height()
    }
}

impl fmt::Display for PlanarYuvFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} yuv420 {:?}",
            self.width, self.height, self.chroma
        )
    }
}
