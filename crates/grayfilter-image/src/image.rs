use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use grayfilter_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by this size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a single-channel image with 8-bit samples.
///
/// The samples are stored row-major in a buffer of `stride * height` bytes where
/// `stride >= width`. The bytes between `width` and `stride` on every row are
/// padding and are never exposed as pixels.
///
/// An image is immutable once built: filters allocate a new image for their output.
#[derive(Clone, Debug)]
pub struct Image {
    size: ImageSize,
    stride: usize,
    data: Vec<u8>,
}

impl Image {
    /// Create a new image from tightly packed pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, `width * height` samples.
    ///
    /// # Errors
    ///
    /// If the size has a zero dimension or the length of the pixel data does not
    /// match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayfilter_image::{Image, ImageSize};
    ///
    /// let image = Image::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.stride(), 10);
    /// ```
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::with_stride(size, size.width, data)
    }

    /// Create a new image from pixel data with padded rows.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `stride` - The number of samples between the starts of two consecutive rows.
    /// * `data` - The sample buffer, `stride * height` samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the size has a zero dimension, if the stride is smaller
    /// than the width, if `stride * height` overflows or if the buffer length is
    /// not `stride * height`.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayfilter_image::{Image, ImageSize};
    ///
    /// // two rows of three pixels, each row padded to four samples
    /// let image = Image::with_stride(
    ///     ImageSize { width: 3, height: 2 },
    ///     4,
    ///     vec![1, 2, 3, 0, 4, 5, 6, 0],
    /// ).unwrap();
    ///
    /// assert_eq!(image.get(2, 1), Some(6));
    /// assert_eq!(image.get(3, 1), None);
    /// ```
    pub fn with_stride(size: ImageSize, stride: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidImageSize(size.width, size.height));
        }

        if stride < size.width {
            return Err(ImageError::InvalidStride(stride, size.width));
        }

        let expected_len = stride
            .checked_mul(size.height)
            .ok_or(ImageError::BufferSizeOverflow(stride, size.height))?;

        if data.len() != expected_len {
            return Err(ImageError::InvalidDataLength(data.len(), expected_len));
        }

        Ok(Self { size, stride, data })
    }

    /// Create a new image with the given size where every pixel has the same value.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The value of every pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayfilter_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val([4, 3].into(), 7).unwrap();
    ///
    /// assert_eq!(image.get(3, 2), Some(7));
    /// ```
    pub fn from_size_val(size: ImageSize, val: u8) -> Result<Self, ImageError> {
        Self::new(size, vec![val; size.num_pixels()])
    }

    /// Create a new image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        size: ImageSize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(size.num_pixels());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the row stride of the image in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the rows are tightly packed, i.e. `stride == width`.
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.size.width
    }

    /// Get the raw sample buffer, including row padding.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the value of the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    /// Get the value of the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when the coordinates fall
    /// outside of the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<u8, ImageError> {
        self.get(x, y).ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.width(),
            self.height(),
        ))
    }

    /// Get the `width` pixels of row `y`, without the padding.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.size.height {
            return None;
        }
        let start = y * self.stride;
        Some(&self.data[start..start + self.size.width])
    }

    /// Iterate over the rows of the image, without the padding.
    pub fn row_iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data
            .chunks_exact(self.stride)
            .map(move |row| &row[..self.size.width])
    }

    /// Copy the pixels into a tightly packed buffer of `width * height` samples.
    pub fn to_vec(&self) -> Vec<u8> {
        if self.is_contiguous() {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.size.num_pixels());
        self.row_iter().for_each(|row| out.extend_from_slice(row));
        out
    }
}

/// Two images are equal when they have the same size and the same pixels,
/// regardless of their stride.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.row_iter().eq(other.row_iter())
    }
}

impl Eq for Image {}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.num_pixels(), 200);
        assert_eq!(
            image_size.to_string(),
            "ImageSize { width: 10, height: 20 }"
        );
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.cols(), 10);
        assert_eq!(image.rows(), 20);
        assert!(image.is_contiguous());

        Ok(())
    }

    #[test]
    fn image_invalid_data_length() {
        let res = Image::new([3, 2].into(), vec![0u8; 5]);
        assert_eq!(res.unwrap_err(), ImageError::InvalidDataLength(5, 6));
    }

    #[test]
    fn image_zero_size() {
        let res = Image::new([0, 2].into(), vec![]);
        assert_eq!(res.unwrap_err(), ImageError::InvalidImageSize(0, 2));
    }

    #[test]
    fn image_invalid_stride() {
        let res = Image::with_stride([4, 2].into(), 3, vec![0u8; 6]);
        assert_eq!(res.unwrap_err(), ImageError::InvalidStride(3, 4));
    }

    #[test]
    fn image_stride_overflow() {
        let res = Image::with_stride([1, 2].into(), usize::MAX / 2 + 1, vec![]);
        assert_eq!(
            res.unwrap_err(),
            ImageError::BufferSizeOverflow(usize::MAX / 2 + 1, 2)
        );
    }

    #[test]
    fn image_strided_access() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::with_stride(
            [3, 2].into(),
            5,
            vec![
                1, 2, 3, 99, 99,
                4, 5, 6, 99, 99,
            ],
        )?;

        assert_eq!(image.get(0, 0), Some(1));
        assert_eq!(image.get(2, 1), Some(6));
        // padding is not addressable
        assert_eq!(image.get(3, 0), None);
        assert_eq!(image.get(0, 2), None);
        assert_eq!(image.row(1), Some(&[4u8, 5, 6][..]));
        assert_eq!(image.row(2), None);
        assert_eq!(image.to_vec(), vec![1, 2, 3, 4, 5, 6]);
        assert!(!image.is_contiguous());

        Ok(())
    }

    #[test]
    fn image_get_pixel_out_of_bounds() -> Result<(), ImageError> {
        let image = Image::from_size_val([2, 2].into(), 3)?;
        assert_eq!(image.get_pixel(1, 1)?, 3);
        assert_eq!(
            image.get_pixel(2, 0),
            Err(ImageError::PixelIndexOutOfBounds(2, 0, 2, 2))
        );
        Ok(())
    }

    #[test]
    fn image_from_fn() -> Result<(), ImageError> {
        let image = Image::from_fn([3, 2].into(), |x, y| (y * 3 + x) as u8)?;
        assert_eq!(image.as_slice(), &[0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn image_eq_ignores_padding() -> Result<(), ImageError> {
        let compact = Image::new([2, 2].into(), vec![1, 2, 3, 4])?;
        let padded = Image::with_stride([2, 2].into(), 3, vec![1, 2, 7, 3, 4, 8])?;
        assert_eq!(compact, padded);

        let other = Image::new([2, 2].into(), vec![1, 2, 3, 5])?;
        assert_ne!(compact, other);
        Ok(())
    }
}
