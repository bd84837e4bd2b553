use std::{fmt, str::FromStr};

use grayfilter_image::Image;

use super::{convolve2d, kernels, kernels::Kernel, separable_filter};
use crate::{border::BorderPolicy, error::FilterError, parallel::ExecutionStrategy};

/// The family of a spatial filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Gaussian low-pass blur.
    Gaussian,
    /// Laplacian edge detection.
    Laplacian,
}

impl FilterKind {
    /// The canonical name of the filter, as accepted by [`FilterKind::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Gaussian => "gaussian",
            FilterKind::Laplacian => "laplace",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" | "gauss" => Ok(FilterKind::Gaussian),
            "laplace" | "laplacian" => Ok(FilterKind::Laplacian),
            _ => Err(FilterError::UnknownFilterType(s.to_string())),
        }
    }
}

/// The supported square kernel sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskSize {
    /// 3x3 kernel.
    Size3x3,
    /// 5x5 kernel.
    #[default]
    Size5x5,
}

impl MaskSize {
    /// The number of rows and columns of the mask.
    pub fn side(&self) -> usize {
        match self {
            MaskSize::Size3x3 => 3,
            MaskSize::Size5x5 => 5,
        }
    }
}

impl TryFrom<usize> for MaskSize {
    type Error = FilterError;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        match side {
            3 => Ok(MaskSize::Size3x3),
            5 => Ok(MaskSize::Size5x5),
            _ => Err(FilterError::UnsupportedMaskSize(side)),
        }
    }
}

/// A filter selection: the filter family and its mask size.
///
/// Every selection is bound to one fixed kernel and one border policy.
///
/// # Examples
///
/// ```
/// use grayfilter_imgproc::filter::{FilterKind, FilterSpec, MaskSize};
///
/// let spec: FilterSpec = Default::default();
///
/// assert_eq!(spec.kind(), FilterKind::Gaussian);
/// assert_eq!(spec.mask_size(), MaskSize::Size5x5);
/// assert_eq!(spec.kernel().width(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    kind: FilterKind,
    mask_size: MaskSize,
}

impl FilterSpec {
    /// Gaussian blur with a 5x5 mask.
    pub const GAUSSIAN_5X5: FilterSpec = FilterSpec::new(FilterKind::Gaussian, MaskSize::Size5x5);

    /// Laplacian with a 5x5 mask.
    pub const LAPLACIAN_5X5: FilterSpec =
        FilterSpec::new(FilterKind::Laplacian, MaskSize::Size5x5);

    /// Create a new filter selection.
    pub const fn new(kind: FilterKind, mask_size: MaskSize) -> Self {
        Self { kind, mask_size }
    }

    /// The filter family.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The mask size.
    pub fn mask_size(&self) -> MaskSize {
        self.mask_size
    }

    /// The kernel bound to this selection.
    pub fn kernel(&self) -> Kernel {
        match (self.kind, self.mask_size) {
            (FilterKind::Gaussian, MaskSize::Size3x3) => kernels::GAUSSIAN_3X3,
            (FilterKind::Gaussian, MaskSize::Size5x5) => kernels::GAUSSIAN_5X5,
            (FilterKind::Laplacian, MaskSize::Size3x3) => kernels::LAPLACIAN_3X3,
            (FilterKind::Laplacian, MaskSize::Size5x5) => kernels::LAPLACIAN_5X5,
        }
    }

    /// The border policy bound to this selection.
    pub fn border(&self) -> BorderPolicy {
        match self.kind {
            FilterKind::Gaussian | FilterKind::Laplacian => BorderPolicy::Replicate,
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::GAUSSIAN_5X5
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.mask_size.side();
        write!(f, "{} {side}x{side}", self.kind)
    }
}

/// Filter an image with any kernel.
///
/// Separable kernels are evaluated as two 1D passes, the others tap by tap.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The kernel to apply.
/// * `border` - The border policy for taps outside of the image.
/// * `strategy` - The execution strategy.
///
/// # Errors
///
/// Returns [`FilterError::KernelTooLargeForImage`] if the kernel is larger than the image.
pub fn filter2d(
    src: &Image,
    kernel: &Kernel,
    border: BorderPolicy,
    strategy: ExecutionStrategy,
) -> Result<Image, FilterError> {
    match kernel.factors() {
        Some((kernel_x, kernel_y)) => {
            separable_filter(src, kernel_x, kernel_y, kernel.divisor(), border, strategy)
        }
        None => convolve2d(src, kernel, border, strategy),
    }
}

/// Apply a filter selection to an image.
///
/// The output has the size of the input and never aliases it.
///
/// # Errors
///
/// Returns [`FilterError::KernelTooLargeForImage`] if the mask is larger than the image.
///
/// # Examples
///
/// ```
/// use grayfilter_image::Image;
/// use grayfilter_imgproc::filter::{apply, FilterSpec};
///
/// let image = Image::from_size_val([8, 8].into(), 100).unwrap();
/// let blurred = apply(&image, FilterSpec::GAUSSIAN_5X5).unwrap();
///
/// assert_eq!(blurred, image);
/// ```
pub fn apply(src: &Image, spec: FilterSpec) -> Result<Image, FilterError> {
    apply_with_strategy(src, spec, ExecutionStrategy::default())
}

/// Apply a filter selection to an image with execution strategy control.
pub fn apply_with_strategy(
    src: &Image,
    spec: FilterSpec,
    strategy: ExecutionStrategy,
) -> Result<Image, FilterError> {
    filter2d(src, &spec.kernel(), spec.border(), strategy)
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image.
/// * `mask_size` - The size of the kernel.
pub fn gaussian_blur(src: &Image, mask_size: MaskSize) -> Result<Image, FilterError> {
    apply(src, FilterSpec::new(FilterKind::Gaussian, mask_size))
}

/// Detect edges with a laplacian filter, replicating the border pixels.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `mask_size` - The size of the kernel.
pub fn laplacian(src: &Image, mask_size: MaskSize) -> Result<Image, FilterError> {
    apply(src, FilterSpec::new(FilterKind::Laplacian, mask_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_kind_from_str() -> Result<(), FilterError> {
        assert_eq!("gaussian".parse::<FilterKind>()?, FilterKind::Gaussian);
        assert_eq!("Laplace".parse::<FilterKind>()?, FilterKind::Laplacian);
        assert_eq!("laplacian".parse::<FilterKind>()?, FilterKind::Laplacian);
        assert_eq!(
            "sobel".parse::<FilterKind>(),
            Err(FilterError::UnknownFilterType("sobel".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_mask_size_try_from() {
        assert_eq!(MaskSize::try_from(3), Ok(MaskSize::Size3x3));
        assert_eq!(MaskSize::try_from(5), Ok(MaskSize::Size5x5));
        assert_eq!(
            MaskSize::try_from(7),
            Err(FilterError::UnsupportedMaskSize(7))
        );
    }

    #[test]
    fn test_filter_spec_binding() {
        assert_eq!(FilterSpec::GAUSSIAN_5X5.kernel(), kernels::GAUSSIAN_5X5);
        assert_eq!(FilterSpec::LAPLACIAN_5X5.kernel(), kernels::LAPLACIAN_5X5);
        assert_eq!(FilterSpec::LAPLACIAN_5X5.border(), BorderPolicy::Replicate);
        assert_eq!(FilterSpec::LAPLACIAN_5X5.to_string(), "laplace 5x5");
        assert_eq!(
            FilterSpec::new(FilterKind::Gaussian, MaskSize::Size3x3).kernel(),
            kernels::GAUSSIAN_3X3
        );
    }

    #[test]
    fn test_filter2d_dispatches_separable() -> Result<(), FilterError> {
        let img = Image::from_fn([7, 6].into(), |x, y| ((x * 37 + y * 11) % 256) as u8)?;
        let kernel = kernels::GAUSSIAN_5X5;
        let direct = convolve2d(
            &img,
            &kernel,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;
        let dispatched = filter2d(
            &img,
            &kernel,
            BorderPolicy::Replicate,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(direct, dispatched);
        Ok(())
    }

    #[test]
    fn test_wrappers() -> Result<(), FilterError> {
        let img = Image::from_size_val([6, 6].into(), 77)?;
        assert_eq!(gaussian_blur(&img, MaskSize::Size3x3)?, img);
        assert_eq!(
            laplacian(&img, MaskSize::Size5x5)?,
            Image::from_size_val(img.size(), 0)?
        );
        Ok(())
    }
}
