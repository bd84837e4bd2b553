/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has a zero dimension.
    #[error("Image size must be positive, got {0}x{1}")]
    InvalidImageSize(usize, usize),

    /// Error when the row stride is smaller than the image width.
    #[error("Row stride ({0}) must be at least the image width ({1})")]
    InvalidStride(usize, usize),

    /// Error when `stride * height` does not fit in `usize`.
    #[error("Buffer size overflows for row stride {0} and height {1}")]
    BufferSizeOverflow(usize, usize),

    /// Error when the data length does not match the buffer size.
    #[error("Data length ({0}) does not match the image buffer size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}
