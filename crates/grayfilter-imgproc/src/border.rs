use grayfilter_image::Image;

/// A border type for kernel taps that fall outside of the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderPolicy {
    /// This border type takes the outermost row or column of pixels and repeats it into the border.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Replicate,
}

impl BorderPolicy {
    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the border policy.
    ///
    /// - `Replicate`: clamp to edge
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension, must be positive.
    ///
    /// # Returns
    /// A valid mapped index within `[0, len)`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            BorderPolicy::Replicate => i.clamp(0, len as isize - 1) as usize,
        }
    }

    /// Reads the sample at `(x, y)`, resolving out-of-bounds coordinates with the policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayfilter_image::Image;
    /// use grayfilter_imgproc::border::BorderPolicy;
    ///
    /// let image = Image::new([3, 1].into(), vec![10, 20, 30]).unwrap();
    ///
    /// assert_eq!(BorderPolicy::Replicate.sample(&image, -2, 0), 10);
    /// assert_eq!(BorderPolicy::Replicate.sample(&image, 5, 3), 30);
    /// ```
    #[inline]
    pub fn sample(&self, image: &Image, x: isize, y: isize) -> u8 {
        let mx = self.map_index(x, image.width());
        let my = self.map_index(y, image.height());
        image.as_slice()[my * image.stride() + mx]
    }
}

#[cfg(test)]
mod tests {
    use super::BorderPolicy;
    use grayfilter_image::{Image, ImageError};

    #[test]
    fn replicate_map_index() {
        let border = BorderPolicy::Replicate;
        assert_eq!(border.map_index(-3, 5), 0);
        assert_eq!(border.map_index(-1, 5), 0);
        assert_eq!(border.map_index(0, 5), 0);
        assert_eq!(border.map_index(4, 5), 4);
        assert_eq!(border.map_index(5, 5), 4);
        assert_eq!(border.map_index(7, 5), 4);
    }

    #[test]
    fn replicate_single_pixel_row() -> Result<(), ImageError> {
        let border = BorderPolicy::Replicate;
        let image = Image::new([1, 1].into(), vec![42])?;

        for offset in -2..=2 {
            assert_eq!(border.map_index(offset, 1), 0);
            assert_eq!(border.sample(&image, offset, 0), 42);
            assert_eq!(border.sample(&image, 0, offset), 42);
        }

        Ok(())
    }

    #[test]
    fn replicate_single_pixel_column() -> Result<(), ImageError> {
        let border = BorderPolicy::Replicate;
        let image = Image::new([1, 4].into(), vec![1, 2, 3, 4])?;

        assert_eq!(border.sample(&image, -1, -1), 1);
        assert_eq!(border.sample(&image, 1, -2), 1);
        assert_eq!(border.sample(&image, 1, 2), 3);
        assert_eq!(border.sample(&image, -2, 4), 4);
        assert_eq!(border.sample(&image, 0, 9), 4);

        Ok(())
    }

    #[test]
    fn replicate_skips_stride_padding() -> Result<(), ImageError> {
        let border = BorderPolicy::Replicate;
        let image = Image::with_stride([2, 2].into(), 3, vec![1, 2, 255, 3, 4, 255])?;

        assert_eq!(border.sample(&image, 2, 0), 2);
        assert_eq!(border.sample(&image, 3, 1), 4);

        Ok(())
    }
}
