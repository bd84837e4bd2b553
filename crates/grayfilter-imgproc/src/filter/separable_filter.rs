use grayfilter_image::Image;

use super::{check_kernel_fits, saturate_u8, tap_offsets};
use crate::{
    border::BorderPolicy,
    error::FilterError,
    parallel::{par_iter_rows_mut, with_strategy_pool, ExecutionStrategy},
};

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
    divisor: f32,
    border: BorderPolicy,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32], divisor: f32, border: BorderPolicy) -> Self {
        Self {
            kernel_x,
            kernel_y,
            offsets_x: tap_offsets(kernel_x.len()),
            offsets_y: tap_offsets(kernel_y.len()),
            divisor,
            border,
        }
    }

    /// Runs both passes on the thread pool of the strategy.
    fn apply(&self, src: &Image, strategy: ExecutionStrategy) -> Result<Vec<u8>, FilterError> {
        with_strategy_pool(strategy, |strategy| self.apply_passes(src, strategy))?
    }

    /// Performs horizontal filtering into an f32 buffer followed by vertical filtering
    /// into the output, normalizing once at the end.
    fn apply_passes(
        &self,
        src: &Image,
        strategy: ExecutionStrategy,
    ) -> Result<Vec<u8>, FilterError> {
        let cols = src.cols();
        let rows = src.rows();
        let stride = src.stride();
        let src_data = src.as_slice();

        let mut temp = vec![0.0f32; cols * rows];
        let mut dst = vec![0u8; cols * rows];

        // Horizontal
        par_iter_rows_mut(strategy, &mut temp, cols, |r, row_temp| {
            let src_row = &src_data[r * stride..r * stride + cols];
            for (c, out) in row_temp.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (&k, &off) in self.kernel_x.iter().zip(&self.offsets_x) {
                    let x = self.border.map_index(c as isize + off, cols);
                    acc += src_row[x] as f32 * k;
                }
                *out = acc;
            }
        })?;

        // Vertical
        let temp = temp.as_slice();
        par_iter_rows_mut(strategy, &mut dst, cols, |r, row_dst| {
            let temp_rows = self
                .offsets_y
                .iter()
                .map(|&off| {
                    let y = self.border.map_index(r as isize + off, rows);
                    &temp[y * cols..(y + 1) * cols]
                })
                .collect::<Vec<_>>();

            for (c, out) in row_dst.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (&k, temp_row) in self.kernel_y.iter().zip(&temp_rows) {
                    acc += temp_row[c] * k;
                }
                *out = saturate_u8(acc / self.divisor);
            }
        })?;

        Ok(dst)
    }
}

/// Apply a separable filter with execution strategy control.
///
/// The result equals [`super::convolve2d`] with the kernel `kernel_y * kernel_x`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
/// * `divisor` - The value the weighted sum is divided by.
/// * `border` - The border policy for taps outside of the image.
/// * `strategy` - The execution strategy.
///
/// # Errors
///
/// Returns [`FilterError::InvalidKernel`] for empty or even kernels, non-finite
/// weights or a zero divisor,
/// and [`FilterError::KernelTooLargeForImage`] if the kernel is larger than the image.
pub fn separable_filter(
    src: &Image,
    kernel_x: &[f32],
    kernel_y: &[f32],
    divisor: f32,
    border: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<Image, FilterError> {
    if kernel_x.len() % 2 == 0 || kernel_y.len() % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "kernel lengths must be odd, got {} and {}",
            kernel_x.len(),
            kernel_y.len()
        )));
    }

    if kernel_x.iter().chain(kernel_y).any(|k| !k.is_finite()) {
        return Err(FilterError::InvalidKernel(
            "kernel weights must be finite".to_string(),
        ));
    }

    if divisor == 0.0 || !divisor.is_finite() {
        return Err(FilterError::InvalidKernel(format!(
            "divisor must be finite and non-zero, got {divisor}"
        )));
    }

    check_kernel_fits(src, kernel_x.len(), kernel_y.len())?;

    let filter = SeparableFilter::new(kernel_x, kernel_y, divisor, border);
    let dst = filter.apply(src, strategy)?;

    Ok(Image::new(src.size(), dst)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separable_filter_box() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let img = Image::new(
            [5, 5].into(),
            vec![
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 90, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let kernel = [1.0, 1.0, 1.0];
        let dst = separable_filter(
            &img,
            &kernel,
            &kernel,
            9.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 10, 10, 10, 0,
                0, 10, 10, 10, 0,
                0, 10, 10, 10, 0,
                0, 0, 0, 0, 0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_filter_strided_input() -> Result<(), FilterError> {
        let compact = Image::from_fn([4, 4].into(), |x, y| (x * 40 + y * 7) as u8)?;
        let mut padded_data = Vec::new();
        for row in compact.row_iter() {
            padded_data.extend_from_slice(row);
            padded_data.extend_from_slice(&[255, 255, 255]);
        }
        let padded = Image::with_stride(compact.size(), 7, padded_data)?;

        let kernel = [1.0, 2.0, 1.0];
        let a = separable_filter(
            &compact,
            &kernel,
            &kernel,
            16.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;
        let b = separable_filter(
            &padded,
            &kernel,
            &kernel,
            16.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;

        assert_eq!(a, b);
        assert!(b.is_contiguous());
        Ok(())
    }

    #[test]
    fn test_separable_filter_fixed_pool() -> Result<(), FilterError> {
        let img = Image::from_fn([9, 7].into(), |x, y| (x * 29 + y * 13) as u8)?;
        let kernel = [1.0, 4.0, 6.0, 4.0, 1.0];

        let serial = separable_filter(
            &img,
            &kernel,
            &kernel,
            256.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;
        let fixed = separable_filter(
            &img,
            &kernel,
            &kernel,
            256.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Fixed(2),
        )?;
        assert_eq!(fixed, serial);

        let res = separable_filter(
            &img,
            &kernel,
            &kernel,
            256.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Fixed(0),
        );
        assert!(matches!(res, Err(FilterError::Parallel(_))));
        Ok(())
    }

    #[test]
    fn test_separable_filter_invalid_kernel() -> Result<(), FilterError> {
        let img = Image::from_size_val([4, 4].into(), 0)?;
        let res = separable_filter(
            &img,
            &[1.0, 1.0],
            &[1.0],
            1.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(res, Err(FilterError::InvalidKernel(_))));

        let res = separable_filter(
            &img,
            &[1.0, f32::NAN, 1.0],
            &[1.0],
            1.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(res, Err(FilterError::InvalidKernel(_))));

        let res = separable_filter(
            &img,
            &[],
            &[1.0],
            1.0,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(res, Err(FilterError::InvalidKernel(_))));
        Ok(())
    }
}
