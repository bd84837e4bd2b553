use std::{fs, path::Path};

use grayfilter_image::{Image, ImageSize};

use crate::error::IoError;

const MAGIC: &[u8] = b"P5";
const MAX_VALUE: usize = 255;

/// Cursor over the ASCII header tokens of a PGM file.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Skip whitespace and `#` comments, then return the next token.
    fn next_token(&mut self) -> Result<&'a [u8], IoError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    while let Some(&b) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                    }
                }
                Some(_) => break,
                None => {
                    return Err(IoError::InvalidHeader(
                        "unexpected end of header".to_string(),
                    ))
                }
            }
        }

        let start = self.pos;
        while let Some(b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || *b == b'#' {
                break;
            }
            self.pos += 1;
        }

        Ok(&self.bytes[start..self.pos])
    }

    fn next_usize(&mut self, field: &str) -> Result<usize, IoError> {
        let token = self.next_token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| {
                IoError::InvalidHeader(format!(
                    "{field} is not a number: {:?}",
                    String::from_utf8_lossy(token)
                ))
            })
    }

    /// Consume the single whitespace byte separating the header from the raster.
    fn end_of_header(&mut self) -> Result<usize, IoError> {
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(self.pos + 1),
            _ => Err(IoError::InvalidHeader(
                "missing whitespace after the maximum value".to_string(),
            )),
        }
    }
}

/// Decodes a binary PGM image from raw bytes.
///
/// The header is `P5`, width, height and maximum value as ASCII decimals separated
/// by whitespace, with `#` comments allowed between the fields. A single whitespace
/// byte separates the header from the `width * height` raw samples. Bytes after
/// the raster are ignored.
///
/// # Arguments
///
/// * `bytes` - Raw bytes of the pgm file.
///
/// # Errors
///
/// Returns an error if the header is malformed, the maximum value is not 255 or
/// the raster is truncated.
///
/// # Example
///
/// ```
/// use grayfilter_io::decode_image_pgm;
///
/// let image = decode_image_pgm(b"P5\n# two by one\n2 1\n255\n\x00\xff").unwrap();
///
/// assert_eq!(image.width(), 2);
/// assert_eq!(image.get(1, 0), Some(255));
/// ```
pub fn decode_image_pgm(bytes: &[u8]) -> Result<Image, IoError> {
    let mut reader = HeaderReader::new(bytes);

    let magic = reader.next_token()?;
    if magic != MAGIC {
        return Err(IoError::InvalidMagicNumber(
            String::from_utf8_lossy(magic).into_owned(),
        ));
    }

    let width = reader.next_usize("width")?;
    let height = reader.next_usize("height")?;
    let max_value = reader.next_usize("maximum value")?;

    if width == 0 || height == 0 {
        return Err(IoError::InvalidHeader(format!(
            "image size must be positive, got {width}x{height}"
        )));
    }

    if max_value != MAX_VALUE {
        return Err(IoError::UnsupportedMaxValue(max_value));
    }

    let raster_start = reader.end_of_header()?;
    let num_bytes = width.checked_mul(height).ok_or_else(|| {
        IoError::InvalidHeader(format!("image size {width}x{height} is too large"))
    })?;

    let raster = &bytes[raster_start..];
    if raster.len() < num_bytes {
        return Err(IoError::TruncatedData(num_bytes, raster.len()));
    }

    if raster.len() > num_bytes {
        log::debug!(
            "Ignoring {} trailing bytes after the PGM raster",
            raster.len() - num_bytes
        );
    }

    Ok(Image::new(
        ImageSize { width, height },
        raster[..num_bytes].to_vec(),
    )?)
}

/// Encodes an image as a binary PGM.
///
/// Only the `width` pixels of every row are written, the stride padding is dropped.
///
/// # Example
///
/// ```
/// use grayfilter_image::Image;
/// use grayfilter_io::encode_image_pgm;
///
/// let image = Image::new([2, 1].into(), vec![7, 8]).unwrap();
///
/// assert_eq!(encode_image_pgm(&image), b"P5\n2 1\n255\n\x07\x08");
/// ```
pub fn encode_image_pgm(image: &Image) -> Vec<u8> {
    let header = format!("P5\n{} {}\n{}\n", image.width(), image.height(), MAX_VALUE);
    let mut bytes = Vec::with_capacity(header.len() + image.width() * image.height());
    bytes.extend_from_slice(header.as_bytes());
    image
        .row_iter()
        .for_each(|row| bytes.extend_from_slice(row));
    bytes
}

/// Read a binary PGM image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_pgm(file_path: impl AsRef<Path>) -> Result<Image, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    let image = decode_image_pgm(&bytes)?;

    log::debug!(
        "Decoded {} ({}x{})",
        file_path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Write an image as a binary PGM file.
///
/// Missing parent directories are created.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
/// * `image` - The image to write.
pub fn write_image_pgm(file_path: impl AsRef<Path>, image: &Image) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(file_path, encode_image_pgm(image))?;

    log::debug!(
        "Encoded {} ({}x{})",
        file_path.display(),
        image.width(),
        image.height()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_with_comments() -> Result<(), IoError> {
        let bytes = b"P5 # magic\n# full line comment\n3\t2 # size\n255\n\x01\x02\x03\x04\x05\x06";
        let image = decode_image_pgm(bytes)?;
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.as_slice(), &[1, 2, 3, 4, 5, 6]);
        Ok(())
    }

    #[test]
    fn decode_raster_starting_with_whitespace_byte() -> Result<(), IoError> {
        // the first sample is 0x0a, which must not be eaten as header whitespace
        let image = decode_image_pgm(b"P5\n2 1\n255\n\x0a\x20")?;
        assert_eq!(image.as_slice(), &[0x0a, 0x20]);
        Ok(())
    }

    #[test]
    fn decode_ignores_trailing_bytes() -> Result<(), IoError> {
        let image = decode_image_pgm(b"P5\n1 1\n255\n\x09extra")?;
        assert_eq!(image.as_slice(), &[9]);
        Ok(())
    }

    #[test]
    fn decode_invalid_magic() {
        let res = decode_image_pgm(b"P2\n1 1\n255\n0");
        assert!(matches!(res, Err(IoError::InvalidMagicNumber(m)) if m == "P2"));
    }

    #[test]
    fn decode_invalid_header() {
        assert!(matches!(
            decode_image_pgm(b"P5\nten 1\n255\n\x00"),
            Err(IoError::InvalidHeader(_))
        ));
        assert!(matches!(
            decode_image_pgm(b"P5\n1 1\n"),
            Err(IoError::InvalidHeader(_))
        ));
        assert!(matches!(
            decode_image_pgm(b"P5\n0 4\n255\n"),
            Err(IoError::InvalidHeader(_))
        ));
        assert!(matches!(
            decode_image_pgm(b"P5\n1 1\n255"),
            Err(IoError::InvalidHeader(_))
        ));
        assert!(matches!(decode_image_pgm(b""), Err(IoError::InvalidHeader(_))));
    }

    #[test]
    fn decode_unsupported_max_value() {
        assert!(matches!(
            decode_image_pgm(b"P5\n1 1\n65535\n\x00\x00"),
            Err(IoError::UnsupportedMaxValue(65535))
        ));
    }

    #[test]
    fn decode_truncated() {
        assert!(matches!(
            decode_image_pgm(b"P5\n4 2\n255\n\x00\x01\x02"),
            Err(IoError::TruncatedData(8, 3))
        ));
    }

    #[test]
    fn encode_drops_stride_padding() -> Result<(), IoError> {
        let image = Image::with_stride([2, 2].into(), 3, vec![1, 2, 99, 3, 4, 99])?;
        assert_eq!(encode_image_pgm(&image), b"P5\n2 2\n255\n\x01\x02\x03\x04");
        Ok(())
    }

    #[test]
    fn write_read_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("nested").join("gradient.pgm");

        let image = Image::from_fn([16, 9].into(), |x, y| (x * 16 + y) as u8)?;
        write_image_pgm(&file_path, &image)?;

        let image_back = read_image_pgm(&file_path)?;
        assert_eq!(image_back, image);
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_pgm("does/not/exist.pgm");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
