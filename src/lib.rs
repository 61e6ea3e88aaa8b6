// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # Frame Convert Library
//!
//! This library converts planar YUV 4:2:0 camera frames into baseline JPEG
//! images. It is the display/storage leg of a camera capture pipeline: the
//! caller owns the camera session and frame lifecycle, this crate only
//! reads the plane buffers and returns compressed bytes.
//!
//! ## Features
//!
//! - **Stride-aware repacking**: frames are repacked into NV21 with the
//!   chroma strategy selected from plane stride metadata, so both
//!   semi-planar (interleaved VU) and fully planar camera sources are
//!   handled correctly.
//! - **JPEG Encoding**: baseline JPEG compression using turbojpeg with
//!   SIMD, fed YUV planes directly with no RGB round trip.
//! - **Direct pixel access**: the packed frame can also be converted to an
//!   RGB888 raster for callers that need pixels instead of JPEG bytes.
//!
//! ## Example
//!
//! ```no_run
//! use frame_convert::{convert, Plane, PlanarYuvFrame, DEFAULT_QUALITY};
//!
//! # fn main() -> Result<(), frame_convert::ConvertError> {
//! let (width, height) = (640u32, 480u32);
//! let y = vec![0u8; (width * height) as usize];
//! let u = vec![128u8; (width * height / 4) as usize];
//! let v = vec![128u8; (width * height / 4) as usize];
//!
//! let frame = PlanarYuvFrame::new(
//!     width,
//!     height,
//!     &[
//!         Plane::new(&y, width as usize, 1),
//!         Plane::new(&u, (width / 2) as usize, 1),
//!         Plane::new(&v, (width / 2) as usize, 1),
//!     ],
//! )?;
//!
//! let jpeg = convert(&frame, DEFAULT_QUALITY)?;
//! println!("compressed to {} bytes", jpeg.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Conversion is a pure, synchronous, one-shot transform with no shared
//! state, so independent frames may be converted from multiple threads.
//! A [`frame::PlanarYuvFrame`] borrows the camera's plane memory for the
//! duration of the call; the borrow checker enforces the caller's lifetime
//! obligation.

pub mod error;
pub mod frame;
pub mod image;

pub use error::ConvertError;
pub use frame::{ChromaLayout, Plane, PlanarYuvFrame};
pub use image::{convert, encode_jpeg, EncodedImage, Nv21Buffer, DEFAULT_QUALITY};
