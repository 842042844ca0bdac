//! `sfc-recipe build`, `package` and `create` commands

use anyhow::{anyhow, Result};

use crate::cli::{ConfigArgs, GlobalArgs};
use crate::commands::{load_workspace, shell};
use sfc_recipe::builder::ToolError;
use sfc_recipe::ops::{build, BuildMode, BuildOptions};
use sfc_recipe::util::diagnostic::suggestions;

pub fn execute(args: ConfigArgs, global: &GlobalArgs, mode: BuildMode) -> Result<()> {
    let ws = load_workspace(global, &args)?;
    let shell = shell(global);

    let mut tool = ws.cmake_tool().map_err(|e| match e {
        ToolError::NotFound { .. } => anyhow!("{}\nhelp: {}", e, suggestions::CMAKE_NOT_FOUND),
        other => anyhow::Error::new(other),
    })?;

    build(&ws, &mut tool, &BuildOptions { mode }, &shell)?;

    Ok(())
}
