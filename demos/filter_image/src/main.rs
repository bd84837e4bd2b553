use std::{
    panic,
    path::{Path, PathBuf},
    process::ExitCode,
};

use filter_image::{run_with_args, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let program = std::env::args()
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("filter_image"));

    log::info!("{} Starting...", program.display());
    log::info!("grayfilter version {}", env!("CARGO_PKG_VERSION"));
    log::info!("  Worker threads: {}", rayon::current_num_threads());

    let args: Args = argh::from_env();

    // panics end up in the same exit path as errors
    let result = panic::catch_unwind(move || run_with_args(&args, Some(Path::new(&program))));

    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            eprintln!("Program error! The following error occurred:");
            eprintln!("{err}");
            eprintln!("Aborting.");
            ExitCode::FAILURE
        }
        Err(_) => {
            eprintln!("Program error! An unknown type of error occurred.");
            eprintln!("Aborting.");
            ExitCode::FAILURE
        }
    }
}
