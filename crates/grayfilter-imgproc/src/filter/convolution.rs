use grayfilter_image::Image;

use super::{check_kernel_fits, kernels::Kernel, saturate_u8, tap_offsets};
use crate::{
    border::BorderPolicy,
    error::FilterError,
    parallel::{par_iter_rows_mut, ExecutionStrategy},
};

/// Convolve an image with a 2D kernel, evaluating every tap directly.
///
/// For every output pixel `(x, y)` the taps read `src(x + i - ax, y + j - ay)`,
/// with out-of-bounds coordinates resolved by `border`. The weighted sum is
/// divided by the kernel divisor, rounded and saturated to `[0, 255]`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The kernel to apply.
/// * `border` - The border policy for taps outside of the image.
/// * `strategy` - The execution strategy.
///
/// # Returns
///
/// A new image of the same size as `src`, with tightly packed rows.
///
/// # Errors
///
/// Returns [`FilterError::KernelTooLargeForImage`] if the kernel is larger than the image.
pub fn convolve2d(
    src: &Image,
    kernel: &Kernel,
    border: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<Image, FilterError> {
    check_kernel_fits(src, kernel.width(), kernel.height())?;

    let cols = src.cols();
    let rows = src.rows();
    let stride = src.stride();
    let src_data = src.as_slice();

    let kernel_w = kernel.width();
    let weights = kernel.weights();
    let divisor = kernel.divisor();
    let offsets_x = tap_offsets(kernel.width());
    let offsets_y = tap_offsets(kernel.height());

    // source column of every (output column, kernel column) pair
    let col_map = (0..cols)
        .flat_map(|x| {
            offsets_x
                .iter()
                .map(move |&off| border.map_index(x as isize + off, cols))
        })
        .collect::<Vec<_>>();

    let mut dst = vec![0u8; cols * rows];

    par_iter_rows_mut(strategy, &mut dst, cols, |y, dst_row| {
        let row_starts = offsets_y
            .iter()
            .map(|&off| border.map_index(y as isize + off, rows) * stride)
            .collect::<Vec<_>>();

        for (x, out) in dst_row.iter_mut().enumerate() {
            let src_cols = &col_map[x * kernel_w..(x + 1) * kernel_w];
            let mut acc = 0.0f32;
            for (kernel_row, &row_start) in weights.chunks_exact(kernel_w).zip(&row_starts) {
                for (&k, &sx) in kernel_row.iter().zip(src_cols) {
                    acc += src_data[row_start + sx] as f32 * k;
                }
            }
            *out = saturate_u8(acc / divisor);
        }
    })?;

    Ok(Image::new(src.size(), dst)?)
}
