//! Path construction shared by every artifact.
//! Paths are assembled as strings and runs of `/` are collapsed to one, so a
//! directory given with or without a trailing separator yields the same file.

use crate::error::Result;
use crate::fs::FileSystem;
use log::debug;
use std::path::PathBuf;

/// Collapses every run of `/` into a single separator.
pub fn collapse_separators(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_was_separator = false;
    for c in path.chars() {
        if c == '/' {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Joins a directory and a file name, or returns the file name alone when the
/// directory is empty.
fn join(directory: &str, filename: &str) -> String {
    if directory.is_empty() {
        collapse_separators(filename)
    } else {
        collapse_separators(&format!("{directory}/{filename}"))
    }
}

/// Builds `name.ext`, or the bare name when there is no extension.
pub fn artifact_filename(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{name}.{ext}"),
        _ => name.to_string(),
    }
}

/// Normalizes a directory assigned to an artifact: trailing separators are
/// trimmed and runs collapsed. A leading root separator is kept.
pub fn normalize_directory(directory: &str) -> String {
    let collapsed = collapse_separators(directory.trim());
    if collapsed == "/" {
        return collapsed;
    }
    collapsed.trim_end_matches('/').to_string()
}

/// Returns the path an artifact is written to.
///
/// A non-empty `output_directory` is created (with parents) when missing and
/// the result is `output_directory/filename`. Without a directory the bare
/// file name is returned and the file lands in the working directory.
///
/// # Errors
/// * `Error::WriteError` if the directory cannot be created
pub fn resolve_output_file(
    fs: &dyn FileSystem,
    output_directory: Option<&str>,
    filename: &str,
) -> Result<PathBuf> {
    let directory = output_directory.unwrap_or_default();
    if !directory.is_empty() {
        let directory = PathBuf::from(collapse_separators(directory));
        if !fs.exists(&directory) {
            debug!("Creating output directory '{}'.", directory.display());
            fs.create_dir_all(&directory)?;
        }
    }
    let output_file = output_file_path(output_directory, filename);
    debug!("Output file: '{}'.", output_file.display());
    Ok(output_file)
}

/// Same path as [`resolve_output_file`] without touching the filesystem.
pub fn output_file_path(output_directory: Option<&str>, filename: &str) -> PathBuf {
    PathBuf::from(join(output_directory.unwrap_or_default(), filename))
}

/// Returns `template_directory/template_file`. Existence is checked at render
/// time, not here.
pub fn resolve_template_path(template_directory: &str, template_file: &str) -> PathBuf {
    PathBuf::from(join(template_directory, template_file))
}
