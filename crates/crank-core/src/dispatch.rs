use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::env::resolve_env;
use crate::error::{CrankError, Result};
use crate::invocation::Invocation;
use crate::manifest::Manifest;
use crate::paths;
use crate::recipe;
use crate::runner::Runner;

/// Turns `recipe args...` into exactly one child process.
pub struct Dispatcher<'a> {
    manifest: &'a Manifest,
    root: PathBuf,
    inherited: HashMap<String, OsString>,
}

impl<'a> Dispatcher<'a> {
    /// `inherited` is the calling shell's environment, consulted only for
    /// variables the manifest declares globally.
    pub fn new(
        manifest: &'a Manifest,
        root: &Path,
        inherited: HashMap<String, OsString>,
    ) -> Self {
        Self {
            manifest,
            root: root.to_path_buf(),
            inherited,
        }
    }

    pub fn resolve(&self, name: &str, args: &[String]) -> Result<Invocation> {
        let recipe = self.manifest.recipe(name)?;

        if let Some(pos) = recipe.params.iter().position(|p| p.arity.is_variadic()) {
            if pos + 1 != recipe.params.len() {
                return Err(CrankError::InvalidManifest(format!(
                    "recipe '{name}': variadic parameter '{}' must be last",
                    recipe.params[pos]
                )));
            }
        }

        let bindings = recipe::bind(name, &recipe.params, args)?;
        let mut argv = recipe::expand(name, &recipe.command, &bindings)?.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                CrankError::InvalidManifest(format!("recipe '{name}' has an empty command"))
            })?;

        if let Some(dir) = &recipe.working_dir {
            if !paths::is_contained(dir) {
                return Err(CrankError::InvalidManifest(format!(
                    "recipe '{name}' working_dir '{dir}' leaves the root"
                )));
            }
        }

        let invocation = Invocation {
            recipe: name.to_string(),
            program,
            args: argv.collect(),
            working_dir: paths::recipe_dir(&self.root, recipe.working_dir.as_deref()),
            env: resolve_env(&self.manifest.env, &recipe.env, &self.inherited),
        };
        tracing::debug!(
            recipe = name,
            command = %invocation.command_line(),
            "resolved recipe"
        );
        Ok(invocation)
    }

    /// Resolve and run a recipe. A non-zero child exit becomes
    /// `SubprocessFailure` carrying the code unchanged.
    pub fn run(&self, name: &str, args: &[String], runner: &dyn Runner) -> Result<()> {
        let invocation = self.resolve(name, args)?;
        match runner.run(&invocation)? {
            0 => Ok(()),
            code => Err(CrankError::SubprocessFailure {
                recipe: name.to_string(),
                code,
            }),
        }
    }
}
