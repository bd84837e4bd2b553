use std::path::{Path, PathBuf};

/// Directories searched, relative to the working directory, when a file is not found as given.
const SEARCH_DIRS: [&str; 2] = ["data", "../data"];

/// Search for an input file.
///
/// The candidates are tried in order and the first existing file wins:
///
/// 1. `file_name` as given.
/// 2. `data/<file_name>` and `../data/<file_name>`.
/// 3. The directory of `executable` and its `data/` subdirectory.
///
/// # Arguments
///
/// * `file_name` - The file to look for.
/// * `executable` - The path of the running executable, usually `argv[0]`.
///
/// # Returns
///
/// The first existing candidate, or `None`.
pub fn find_file_path(file_name: impl AsRef<Path>, executable: Option<&Path>) -> Option<PathBuf> {
    let file_name = file_name.as_ref();

    let mut candidates = vec![file_name.to_path_buf()];

    // absolute paths are only looked up as given
    if file_name.is_relative() {
        candidates.extend(SEARCH_DIRS.iter().map(|dir| Path::new(dir).join(file_name)));

        if let Some(exe_dir) = executable.and_then(Path::parent) {
            candidates.push(exe_dir.join(file_name));
            candidates.push(exe_dir.join("data").join(file_name));
        }
    }

    let found = candidates.into_iter().find(|candidate| candidate.is_file());

    match &found {
        Some(path) => log::debug!("Resolved {} to {}", file_name.display(), path.display()),
        None => log::debug!("Could not resolve {}", file_name.display()),
    }

    found
}
