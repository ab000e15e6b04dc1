use crate::output::{print_json, print_table};
use anyhow::Context;
use crank_core::Manifest;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let manifest = Manifest::load_or_builtin(root).context("failed to load manifest")?;

    if json {
        let items: Vec<serde_json::Value> = manifest
            .recipes
            .iter()
            .map(|(name, recipe)| {
                serde_json::json!({
                    "name": name,
                    "usage": recipe.usage(name),
                    "description": recipe.description,
                    "params": recipe.params,
                    "command": recipe.command,
                    "working_dir": recipe.working_dir,
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if manifest.recipes.is_empty() {
        println!("No recipes defined.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = manifest
        .recipes
        .iter()
        .map(|(name, recipe)| {
            vec![
                recipe.usage(name),
                recipe.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["RECIPE", "DESCRIPTION"], rows);
    Ok(())
}
