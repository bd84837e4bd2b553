use std::borrow::Cow;

use crate::error::FilterError;

const BINOMIAL_3: [f32; 3] = [1.0, 2.0, 1.0];
const BINOMIAL_5: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

#[rustfmt::skip]
const GAUSSIAN_3X3_WEIGHTS: [f32; 9] = [
    1.0, 2.0, 1.0,
    2.0, 4.0, 2.0,
    1.0, 2.0, 1.0,
];

#[rustfmt::skip]
const GAUSSIAN_5X5_WEIGHTS: [f32; 25] = [
    1.0,  4.0,  6.0,  4.0, 1.0,
    4.0, 16.0, 24.0, 16.0, 4.0,
    6.0, 24.0, 36.0, 24.0, 6.0,
    4.0, 16.0, 24.0, 16.0, 4.0,
    1.0,  4.0,  6.0,  4.0, 1.0,
];

#[rustfmt::skip]
const LAPLACIAN_3X3_WEIGHTS: [f32; 9] = [
    -1.0, -1.0, -1.0,
    -1.0,  8.0, -1.0,
    -1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const LAPLACIAN_5X5_WEIGHTS: [f32; 25] = [
    -1.0, -3.0, -4.0, -3.0, -1.0,
    -3.0,  0.0,  6.0,  0.0, -3.0,
    -4.0,  6.0, 20.0,  6.0, -4.0,
    -3.0,  0.0,  6.0,  0.0, -3.0,
    -1.0, -3.0, -4.0, -3.0, -1.0,
];

/// Gaussian 3x3 low-pass kernel, the outer product of `[1 2 1]`.
pub const GAUSSIAN_3X3: Kernel = Kernel {
    width: 3,
    height: 3,
    weights: Cow::Borrowed(&GAUSSIAN_3X3_WEIGHTS),
    divisor: 16.0,
    factors: Some((Cow::Borrowed(&BINOMIAL_3), Cow::Borrowed(&BINOMIAL_3))),
};

/// Gaussian 5x5 low-pass kernel, the outer product of `[1 4 6 4 1]`.
pub const GAUSSIAN_5X5: Kernel = Kernel {
    width: 5,
    height: 5,
    weights: Cow::Borrowed(&GAUSSIAN_5X5_WEIGHTS),
    divisor: 256.0,
    factors: Some((Cow::Borrowed(&BINOMIAL_5), Cow::Borrowed(&BINOMIAL_5))),
};

/// Laplacian 3x3 kernel over the 8-neighbourhood.
pub const LAPLACIAN_3X3: Kernel = Kernel {
    width: 3,
    height: 3,
    weights: Cow::Borrowed(&LAPLACIAN_3X3_WEIGHTS),
    divisor: 1.0,
    factors: None,
};

/// Laplacian 5x5 edge detection kernel.
pub const LAPLACIAN_5X5: Kernel = Kernel {
    width: 5,
    height: 5,
    weights: Cow::Borrowed(&LAPLACIAN_5X5_WEIGHTS),
    divisor: 1.0,
    factors: None,
};

/// A 2D filter kernel with a normalization divisor.
///
/// The weights are stored row-major: `weight(i, j)` is the tap applied to the
/// sample at column offset `i - anchor.0` and row offset `j - anchor.1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Cow<'static, [f32]>,
    divisor: f32,
    factors: Option<(Cow<'static, [f32]>, Cow<'static, [f32]>)>,
}

impl Kernel {
    /// Create a new kernel.
    ///
    /// # Arguments
    ///
    /// * `width` - The number of columns, must be odd.
    /// * `height` - The number of rows, must be odd.
    /// * `weights` - The `width * height` weights, row-major.
    /// * `divisor` - The value the weighted sum is divided by, must be non-zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayfilter_imgproc::filter::kernels::Kernel;
    ///
    /// let kernel = Kernel::new(3, 1, vec![1.0, 1.0, 1.0], 3.0).unwrap();
    ///
    /// assert_eq!(kernel.anchor(), (1, 0));
    /// assert!(!kernel.is_separable());
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        weights: Vec<f32>,
        divisor: f32,
    ) -> Result<Self, FilterError> {
        validate_shape(width, height, &weights, divisor)?;
        Ok(Self {
            width,
            height,
            weights: Cow::Owned(weights),
            divisor,
            factors: None,
        })
    }

    /// Create a separable kernel from its horizontal and vertical factors.
    ///
    /// The 2D weights are the outer product `kernel_y * kernel_x`.
    pub fn separable(
        kernel_x: Vec<f32>,
        kernel_y: Vec<f32>,
        divisor: f32,
    ) -> Result<Self, FilterError> {
        let weights = kernel_y
            .iter()
            .flat_map(|ky| kernel_x.iter().map(move |kx| ky * kx))
            .collect::<Vec<_>>();
        validate_shape(kernel_x.len(), kernel_y.len(), &weights, divisor)?;
        Ok(Self {
            width: kernel_x.len(),
            height: kernel_y.len(),
            weights: Cow::Owned(weights),
            divisor,
            factors: Some((Cow::Owned(kernel_x), Cow::Owned(kernel_y))),
        })
    }

    /// Number of columns of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The kernel cell aligned with the output pixel, `(width / 2, height / 2)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// The row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The weight at column `i` and row `j`.
    pub fn weight(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.width || j >= self.height {
            return None;
        }
        Some(self.weights[j * self.width + i])
    }

    /// The normalization divisor.
    pub fn divisor(&self) -> f32 {
        self.divisor
    }

    /// Sum of all the weights.
    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// The horizontal and vertical factors of a separable kernel.
    pub fn factors(&self) -> Option<(&[f32], &[f32])> {
        self.factors
            .as_ref()
            .map(|(kx, ky)| (kx.as_ref(), ky.as_ref()))
    }

    /// Whether the kernel can be evaluated as two 1D passes.
    pub fn is_separable(&self) -> bool {
        self.factors.is_some()
    }
}

fn validate_shape(
    width: usize,
    height: usize,
    weights: &[f32],
    divisor: f32,
) -> Result<(), FilterError> {
    let num_weights = weights.len();
    if width % 2 == 0 || height % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "kernel size must be odd, got {width}x{height}"
        )));
    }

    if num_weights != width * height {
        return Err(FilterError::InvalidKernel(format!(
            "expected {} weights, got {num_weights}",
            width * height
        )));
    }

    if let Some(k) = weights.iter().find(|k| !k.is_finite()) {
        return Err(FilterError::InvalidKernel(format!(
            "weights must be finite, got {k}"
        )));
    }

    if divisor == 0.0 || !divisor.is_finite() {
        return Err(FilterError::InvalidKernel(format!(
            "divisor must be finite and non-zero, got {divisor}"
        )));
    }

    Ok(())
}
