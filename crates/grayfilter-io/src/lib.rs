#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access and decoding failures.
pub mod error;

/// High-level helpers to locate input images.
///
/// See [`functional::find_file_path`] for the search order.
pub mod functional;

/// Binary PGM (`P5`) image encoding and decoding.
///
/// Read and write 8-bit single channel images.
pub mod pgm;

pub use crate::error::IoError;
pub use crate::pgm::{decode_image_pgm, encode_image_pgm, read_image_pgm, write_image_pgm};
