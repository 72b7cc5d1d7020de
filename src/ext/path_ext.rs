use std::path::{Component, Path, PathBuf};

/// Renders `path` as absolute as it can be made, preferring the canonical form.
pub fn best_effort_path_display(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical_path) => canonical_path.display().to_string(),
        Err(_) => {
            let absolute_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            normalize_path(&absolute_path).display().to_string()
        }
    }
}

/// Lexically resolves `.` and `..` components without touching the filesystem.
///
/// A `..` directly below the root is dropped, so `/..` normalizes to `/`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// The name a directory is shown under: its base name, or the whole path
/// when there is none (`/`).
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

pub trait PathExt {
    fn best_effort_path_display(&self) -> String;
    fn normalized(&self) -> PathBuf;
    fn display_name(&self) -> String;
}

impl PathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }

    fn normalized(&self) -> PathBuf {
        normalize_path(self)
    }

    fn display_name(&self) -> String {
        display_name(self)
    }
}

impl PathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }

    fn normalized(&self) -> PathBuf {
        normalize_path(self)
    }

    fn display_name(&self) -> String {
        display_name(self)
    }
}
