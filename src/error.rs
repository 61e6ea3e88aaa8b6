// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use thiserror::Error;

/// Errors surfaced by frame validation, packing, and JPEG encoding.
///
/// All errors are reported synchronously to the caller; no conversion is
/// retried internally and no partial output is ever returned.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The frame descriptor is malformed: wrong plane count, zero
    /// dimensions, or plane strides that do not describe a supported
    /// YUV 4:2:0 layout.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A plane buffer is smaller than its declared dimensions and strides
    /// require. Conversion fails up front rather than truncating.
    #[error("plane {plane} holds {actual} bytes but needs at least {expected}")]
    BufferSizeMismatch {
        plane: usize,
        expected: usize,
        actual: usize,
    },

    /// JPEG quality outside the 0-100 range.
    #[error("jpeg quality {0} is out of range (0-100)")]
    InvalidQuality(u8),

    /// The underlying JPEG encoder rejected the input.
    #[error("jpeg encoder: {0}")]
    Encode(#[from] turbojpeg::Error),
}
