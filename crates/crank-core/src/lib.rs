pub mod dispatch;
pub mod env;
pub mod error;
pub mod invocation;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod recipe;
pub mod runner;

pub use dispatch::Dispatcher;
pub use error::{CrankError, Result};
pub use invocation::Invocation;
pub use manifest::{Manifest, Recipe};
pub use runner::{ProcessRunner, Runner};
