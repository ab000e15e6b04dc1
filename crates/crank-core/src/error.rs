use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrankError {
    #[error("unknown recipe '{0}'; run 'crank list' to see available recipes")]
    UnknownRecipe(String),

    #[error("recipe '{recipe}' failed with exit code {code}")]
    SubprocessFailure { recipe: String, code: i32 },

    #[error("recipe '{recipe}' requires a value for '{param}'")]
    MissingArgument { recipe: String, param: String },

    #[error("recipe '{recipe}' takes at most {expected} argument(s), got {got}")]
    TooManyArguments {
        recipe: String,
        expected: usize,
        got: usize,
    },

    #[error("recipe '{recipe}' references undefined parameter '{name}'")]
    UndefinedParameter { recipe: String, name: String },

    #[error("invalid template in recipe '{recipe}': {reason}")]
    InvalidTemplate { recipe: String, reason: String },

    #[error("invalid parameter '{0}': expected NAME, NAME=default, +NAME or *NAME")]
    InvalidParam(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("unsupported manifest version {0} (expected 1)")]
    UnsupportedVersion(u32),

    #[error("program not found: '{0}' is not on PATH")]
    ProgramNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl CrankError {
    /// Process exit code for this error. A failed recipe relays the child's
    /// code unchanged; everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrankError::SubprocessFailure { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subprocess_failure_relays_code() {
        let err = CrankError::SubprocessFailure {
            recipe: "migrate".to_string(),
            code: 42,
        };
        assert_eq!(err.exit_code(), 42);
        assert_eq!(err.to_string(), "recipe 'migrate' failed with exit code 42");
    }

    #[test]
    fn other_errors_exit_one() {
        assert_eq!(CrankError::UnknownRecipe("nope".into()).exit_code(), 1);
        assert_eq!(CrankError::ProgramNotFound("sqlx".into()).exit_code(), 1);
    }
}
