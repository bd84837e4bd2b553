/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The data does not start with the binary graymap magic number.
    #[error("Invalid magic number {0:?}, expected \"P5\"")]
    InvalidMagicNumber(String),

    /// The header is malformed.
    #[error("Invalid PGM header. {0}")]
    InvalidHeader(String),

    /// The maximum sample value is not supported.
    #[error("Unsupported maximum value {0}, only 255 is supported")]
    UnsupportedMaxValue(usize),

    /// The raster is shorter than the header announces.
    #[error("Truncated image data: expected {0} bytes, got {1}")]
    TruncatedData(usize, usize),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] grayfilter_image::ImageError),
}
