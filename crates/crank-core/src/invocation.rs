use crate::env::EnvMap;
use serde::Serialize;
use std::path::PathBuf;

/// A fully resolved recipe: what to spawn, where, and with which explicit
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub recipe: String,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: EnvMap,
}

impl Invocation {
    /// Program and arguments rendered as a POSIX shell command line.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|word| quote(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Explicit environment as `NAME=value` words, shell quoted.
    pub fn env_overrides(&self) -> Vec<String> {
        self.env
            .iter()
            .map(|(k, v)| format!("{k}={}", quote(v)))
            .collect()
    }
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c)
}

/// Quote a word for a POSIX shell, leaving plain words untouched.
pub fn quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}
