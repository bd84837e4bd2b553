//! Filter operations
//!
//! This module provides the spatial filters for single-channel 8-bit images.

/// Filter kernels
pub mod kernels;

/// Direct 2D convolution
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;

use grayfilter_image::Image;

use crate::error::FilterError;

/// Round and saturate an accumulated value to the 8-bit range.
#[inline]
pub(crate) fn saturate_u8(x: f32) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Check that a `kernel_width x kernel_height` footprint fits inside the image.
pub(crate) fn check_kernel_fits(
    src: &Image,
    kernel_width: usize,
    kernel_height: usize,
) -> Result<(), FilterError> {
    if src.width() < kernel_width || src.height() < kernel_height {
        return Err(FilterError::KernelTooLargeForImage {
            image_width: src.width(),
            image_height: src.height(),
            kernel_width,
            kernel_height,
        });
    }
    Ok(())
}

/// Offsets of the kernel taps relative to the anchor.
pub(crate) fn tap_offsets(kernel_len: usize) -> Vec<isize> {
    let half = kernel_len / 2;
    (0..kernel_len)
        .map(|i| i as isize - half as isize)
        .collect()
}
