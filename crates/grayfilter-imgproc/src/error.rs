use grayfilter_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filtering operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel footprint does not fit inside the image.
    #[error(
        "Kernel of size {kernel_width}x{kernel_height} is larger than the image of size {image_width}x{image_height}"
    )]
    KernelTooLargeForImage {
        /// Width of the input image.
        image_width: usize,
        /// Height of the input image.
        image_height: usize,
        /// Width of the kernel.
        kernel_width: usize,
        /// Height of the kernel.
        kernel_height: usize,
    },

    /// The kernel definition is not valid.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// The filter name is not recognized.
    #[error("Unknown filter type: {0}")]
    UnknownFilterType(String),

    /// The mask size is not one of the supported sizes.
    #[error("Unsupported mask size: {0}, expected 3 or 5")]
    UnsupportedMaskSize(usize),

    /// Error while scheduling the work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// Error while creating the output image.
    #[error(transparent)]
    Image(#[from] ImageError),
}
