//! The delegated native build tool.

use thiserror::Error;

use crate::builder::toolchain::ToolchainVariables;

/// Failure reported by the delegated build tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("build tool `{tool}` not found")]
    NotFound { tool: String },

    #[error("failed to run `{command}`: {reason}")]
    Launch { command: String, reason: String },

    #[error("`{command}` failed with exit code {status:?}\n{stderr}")]
    Failed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to prepare build: {0}")]
    Setup(String),
}

/// The native build system the recipe drives.
///
/// Each call blocks until the tool finishes. The tool owns whatever partial
/// output a failed call leaves behind.
pub trait BuildTool {
    /// Configure the build with the generated toolchain variables.
    fn configure(&mut self, vars: &ToolchainVariables) -> Result<(), ToolError>;

    /// Build `target`, or the default target when `None`.
    fn build_target(&mut self, target: Option<&str>, parallel: bool) -> Result<(), ToolError>;

    /// Install the build into the package folder.
    fn install(&mut self) -> Result<(), ToolError>;
}
