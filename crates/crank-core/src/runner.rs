//! Process execution for resolved recipes.
//!
//! `Runner` is the seam between the dispatcher and the operating system;
//! `ProcessRunner` is the real implementation. The child inherits crank's
//! stdio and its whole environment, plus the invocation's explicit
//! variables. crank blocks until the child exits and reports its status as
//! a plain integer exit code.
//!
//! # Interrupts
//! A terminal Ctrl-C is delivered to the whole foreground process group, so
//! the child already sees it. crank absorbs its own copy and keeps waiting,
//! so the child's exit code is still relayed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::error::{CrankError, Result};
use crate::invocation::Invocation;

pub trait Runner {
    /// Run `invocation` to completion and return its exit code.
    fn run(&self, invocation: &Invocation) -> Result<i32>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        let program = locate(invocation)?;

        let mut cmd = Command::new(&program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .envs(&invocation.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::info!(
            recipe = %invocation.recipe,
            command = %invocation.command_line(),
            cwd = %invocation.working_dir.display(),
            "spawning recipe"
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let status = rt.block_on(wait_for_child(cmd))?;

        let code = exit_code(status);
        tracing::debug!(recipe = %invocation.recipe, code, "recipe exited");
        Ok(code)
    }
}

async fn wait_for_child(mut cmd: Command) -> std::io::Result<ExitStatus> {
    let mut child = cmd.spawn()?;
    loop {
        tokio::select! {
            status = child.wait() => return status,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => tracing::warn!("interrupt received; waiting for recipe to exit"),
                Err(e) => {
                    tracing::warn!(error = %e, "cannot watch for interrupts");
                    return child.wait().await;
                }
            },
        }
    }
}

/// Resolve the program the way the child would: paths relative to the
/// working directory, bare names through `PATH` (the invocation's own
/// `PATH` when it sets one).
fn locate(invocation: &Invocation) -> Result<PathBuf> {
    let search_path = invocation.env.get("PATH").map(OsString::from);
    resolve_program(&invocation.program, &invocation.working_dir, search_path)
        .ok_or_else(|| CrankError::ProgramNotFound(invocation.program.clone()))
}

/// Where `program` resolves from `cwd` on the current `PATH`, if anywhere.
pub fn probe(program: &str, cwd: &Path) -> Option<PathBuf> {
    resolve_program(program, cwd, None)
}

fn resolve_program(program: &str, cwd: &Path, search_path: Option<OsString>) -> Option<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let path = std::path::absolute(cwd.join(program)).ok()?;
        return path.is_file().then_some(path);
    }
    let search_path = search_path.or_else(|| std::env::var_os("PATH"));
    which::which_in(program, search_path, cwd).ok()
}

/// The child's exit code; `128 + signal` when a signal killed it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
