use anyhow::Context;
use crank_core::{Dispatcher, Manifest, ProcessRunner};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

pub fn run(
    root: &Path,
    recipe: &str,
    args: &[String],
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let manifest = Manifest::load_or_builtin(root).context("failed to load manifest")?;
    let dispatcher = Dispatcher::new(&manifest, root, inherited_env());

    if dry_run {
        let invocation = dispatcher.resolve(recipe, args)?;
        return super::show::print(&invocation, json);
    }

    dispatcher
        .run(recipe, args, &ProcessRunner)
        .with_context(|| format!("failed to run recipe '{recipe}'"))?;
    Ok(())
}

/// The calling shell's environment. Values are kept as raw OS strings so a
/// non-UTF-8 value still counts as set; names that are not UTF-8 cannot
/// match a manifest binding and are skipped.
pub fn inherited_env() -> HashMap<String, OsString> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v)))
        .collect()
}
