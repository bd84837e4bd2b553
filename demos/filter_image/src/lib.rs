#![deny(missing_docs)]
//! Command line front-end: argument validation, the run pipeline and its errors.

use std::path::{Path, PathBuf};

use argh::FromArgs;

use grayfilter::{
    imgproc::{
        filter::{self, FilterKind, FilterSpec, MaskSize},
        parallel::ExecutionStrategy,
        FilterError,
    },
    io::{functional::find_file_path, read_image_pgm, write_image_pgm, IoError},
};

/// Where the filtered image is written.
pub const DEFAULT_OUTPUT_PATH: &str = "./data/output_image.pgm";

#[derive(FromArgs, Debug)]
/// Apply a gaussian or laplacian filter to a grayscale PGM image
pub struct Args {
    /// path to the input PGM image
    #[argh(option)]
    pub input: Option<PathBuf>,

    /// the filter to apply: gaussian or laplace
    #[argh(option, short = 'f', default = "String::from(\"gaussian\")")]
    pub filter: String,

    /// the size of the square mask: 3 or 5
    #[argh(option, default = "5")]
    pub mask_size: usize,

    /// the number of worker threads, chosen automatically when omitted
    #[argh(option)]
    pub threads: Option<usize>,
}

/// Errors that end a run.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A command line argument is missing or invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input image could not be read.
    #[error("Failed to load the input image. {0}")]
    DecodeFailure(#[source] IoError),

    /// The filter could not be applied, e.g. the kernel is larger than the image.
    #[error("Failed to filter the image. {0}")]
    Filter(#[from] FilterError),

    /// The output image could not be written.
    #[error("Failed to save the output image. {0}")]
    EncodeFailure(#[source] IoError),
}

/// Immutable settings of a run, built once from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    input: PathBuf,
    spec: FilterSpec,
    output: PathBuf,
    strategy: ExecutionStrategy,
}

impl FilterConfig {
    /// Validate the parsed arguments.
    ///
    /// The input is searched next to the working directory and the executable; when it
    /// cannot be found the path is kept as given and reading it reports the failure.
    pub fn from_args(args: &Args, executable: Option<&Path>) -> Result<Self, AppError> {
        let Some(input) = args
            .input
            .as_ref()
            .filter(|input| !input.as_os_str().is_empty())
        else {
            return Err(AppError::InvalidArgument(
                "missing required argument --input".to_string(),
            ));
        };

        let kind = args
            .filter
            .parse::<FilterKind>()
            .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

        let mask_size = MaskSize::try_from(args.mask_size)
            .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

        let strategy = match args.threads {
            None => ExecutionStrategy::Auto,
            Some(0) => {
                return Err(AppError::InvalidArgument(
                    "thread count must be > 0".to_string(),
                ))
            }
            Some(n) => ExecutionStrategy::Fixed(n),
        };

        let input = find_file_path(input, executable).unwrap_or_else(|| input.clone());

        Ok(Self {
            input,
            spec: FilterSpec::new(kind, mask_size),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            strategy,
        })
    }

    /// Write the result somewhere else than [`DEFAULT_OUTPUT_PATH`].
    pub fn with_output(self, output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..self
        }
    }

    /// The resolved input image path.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The filter to apply.
    pub fn spec(&self) -> FilterSpec {
        self.spec
    }

    /// Where the filtered image is written.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// How the filter rows are scheduled.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }
}

/// Load, filter and save one image.
pub fn run(config: &FilterConfig) -> Result<(), AppError> {
    log::info!("Filename Value: {}", config.input().display());
    log::info!("Filter Type Value: {}", config.spec());

    let src = read_image_pgm(config.input()).map_err(AppError::DecodeFailure)?;
    log::debug!("Loaded {} image", src.size());

    let dst = filter::apply_with_strategy(&src, config.spec(), config.strategy())?;

    write_image_pgm(config.output(), &dst).map_err(AppError::EncodeFailure)?;
    log::info!("Saved image: {}", config.output().display());

    Ok(())
}

/// Build the configuration from the command line and [`run`] it.
pub fn run_with_args(args: &Args, executable: Option<&Path>) -> Result<(), AppError> {
    let config = FilterConfig::from_args(args, executable)?;
    run(&config)
}
