use crank_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the directory recipes run relative to.
///
/// Priority:
/// 1. `--root` flag / `CRANK_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `crank.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
///
/// The result is absolute: recipes change directory before exec, so a
/// relative root would be applied twice to `./script` style programs.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover(&cwd)
}

fn discover(cwd: &Path) -> PathBuf {
    if let Some(dir) = find_upward(cwd, |d| paths::manifest_path(d).is_file()) {
        return dir;
    }
    if let Some(dir) = find_upward(cwd, |d| d.join(".git").is_dir()) {
        return dir;
    }
    cwd.to_path_buf()
}

fn find_upward(start: &Path, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| matches(dir))
        .map(Path::to_path_buf)
}
