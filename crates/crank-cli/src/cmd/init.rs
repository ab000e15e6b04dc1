use anyhow::Context;
use crank_core::{io, manifest::BUILTIN_MANIFEST, paths};
use std::path::Path;

pub fn run(root: &Path, force: bool) -> anyhow::Result<()> {
    let path = paths::manifest_path(root);

    if force {
        io::atomic_write(&path, BUILTIN_MANIFEST.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  wrote:   {}", paths::MANIFEST_FILE);
        return Ok(());
    }

    let written = io::write_if_missing(&path, BUILTIN_MANIFEST.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if written {
        println!("  created: {}", paths::MANIFEST_FILE);
    } else {
        println!("  exists:  {} (use --force to replace)", paths::MANIFEST_FILE);
    }
    Ok(())
}
