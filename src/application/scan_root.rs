use std::env;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

use crate::ext::PathExt;

/// Turns the user's answer into an absolute, lexically normalized path.
/// An empty answer means the current working directory.
pub fn resolve_scan_root(input: &Path) -> Result<PathBuf, ResolveRootError> {
    if input.as_os_str().is_empty() {
        return env::current_dir().context(CurrentDirSnafu);
    }

    let absolute = std::path::absolute(input).context(AbsoluteSnafu {
        input: input.display().to_string(),
    })?;
    Ok(absolute.normalized())
}

#[derive(Debug, Snafu)]
pub enum ResolveRootError {
    #[snafu(display("Failed to obtain current dir"))]
    CurrentDirError { source: std::io::Error },
    #[snafu(display("Cannot make '{}' absolute", input))]
    AbsoluteError {
        input: String,
        source: std::io::Error,
    },
}
