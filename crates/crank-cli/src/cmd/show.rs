use crate::output::print_json;
use anyhow::Context;
use crank_core::{Dispatcher, Invocation, Manifest};
use std::path::Path;

pub fn run(root: &Path, recipe: &str, args: &[String], json: bool) -> anyhow::Result<()> {
    let manifest = Manifest::load_or_builtin(root).context("failed to load manifest")?;
    let dispatcher = Dispatcher::new(&manifest, root, super::run::inherited_env());
    let invocation = dispatcher.resolve(recipe, args)?;
    print(&invocation, json)
}

pub fn print(invocation: &Invocation, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "recipe": invocation.recipe,
            "command_line": invocation.command_line(),
            "program": invocation.program,
            "args": invocation.args,
            "working_dir": invocation.working_dir,
            "env": invocation.env,
        });
        return print_json(&value);
    }

    println!("command: {}", invocation.command_line());
    println!("cwd:     {}", invocation.working_dir.display());
    for var in invocation.env_overrides() {
        println!("env:     {var}");
    }
    Ok(())
}
