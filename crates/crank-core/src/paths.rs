use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "crank.yaml";

pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// Directory a recipe runs in: the root itself, or `working_dir` below it.
pub fn recipe_dir(root: &Path, working_dir: Option<&str>) -> PathBuf {
    match working_dir {
        Some(dir) if !dir.is_empty() && dir != "." => root.join(dir),
        _ => root.to_path_buf(),
    }
}

/// True when `dir` stays inside the root: relative and without `..`.
pub fn is_contained(dir: &str) -> bool {
    let path = Path::new(dir);
    !path.is_absolute()
        && path
            .components()
            .all(|c| !matches!(c, std::path::Component::ParentDir))
}
