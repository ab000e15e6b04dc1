use crate::output::{print_json, print_table};
use anyhow::Context;
use crank_core::manifest::{ManifestWarning, WarnLevel};
use crank_core::{paths, runner, Manifest};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ProgramStatus {
    recipe: String,
    program: String,
    found: Option<String>,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let manifest = Manifest::load_or_builtin(root).context("failed to load manifest")?;
    let warnings = manifest.validate();
    let programs = probe_programs(&manifest, root);

    if json {
        let manifest_path = paths::manifest_path(root);
        print_json(&serde_json::json!({
            "manifest": manifest_path.is_file().then_some(&manifest_path),
            "warnings": warnings,
            "programs": programs,
        }))?;
    } else {
        print_warnings(&warnings);
        let rows = programs
            .iter()
            .map(|p| {
                vec![
                    p.recipe.clone(),
                    p.program.clone(),
                    p.found.clone().unwrap_or_else(|| "not found".to_string()),
                ]
            })
            .collect();
        print_table(&["RECIPE", "PROGRAM", "RESOLVES TO"], rows);
    }

    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("manifest has {errors} error(s)");
    }
    Ok(())
}

fn print_warnings(warnings: &[ManifestWarning]) {
    if warnings.is_empty() {
        println!("Manifest is valid. No warnings.");
        return;
    }
    for w in warnings {
        let prefix = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        println!("[{prefix}] {}", w.message);
    }
    println!();
}

/// First command token of each recipe, skipping templated programs which
/// cannot be known before arguments are bound.
fn probe_programs(manifest: &Manifest, root: &Path) -> Vec<ProgramStatus> {
    manifest
        .recipes
        .iter()
        .filter_map(|(name, recipe)| {
            let program = recipe.command.first()?;
            if program.contains("{{") {
                return None;
            }
            let cwd = paths::recipe_dir(root, recipe.working_dir.as_deref());
            let found = runner::probe(program, &cwd);
            Some(ProgramStatus {
                recipe: name.clone(),
                program: program.clone(),
                found: found.map(|p| p.display().to_string()),
            })
        })
        .collect()
}
