//! Command implementations

pub mod build;
pub mod completions;
pub mod export;
pub mod info;
pub mod layout;
pub mod plan;
pub mod toolchain;
pub mod version;

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::{ConfigArgs, GlobalArgs, MessageFormat};
use sfc_recipe::core::recipe::BUILD_DESCRIPTION_FILE;
use sfc_recipe::core::{Overrides, RecipeWorkspace};
use sfc_recipe::util::diagnostic::suggestions;
use sfc_recipe::util::{GlobalContext, Shell};

/// Create the output shell from the command line flags.
pub fn shell(global: &GlobalArgs) -> Shell {
    Shell::from_flags(
        global.quiet,
        global.verbose,
        global.color,
        global.message_format == MessageFormat::Json,
    )
}

/// The recipe root: `--recipe-dir` resolved against the working directory.
pub fn recipe_root(ctx: &GlobalContext, global: &GlobalArgs) -> Result<PathBuf> {
    let root = match &global.recipe_dir {
        Some(dir) => ctx.cwd().join(dir),
        None => ctx.cwd().to_path_buf(),
    };

    if !root.join(BUILD_DESCRIPTION_FILE).is_file() {
        bail!(
            "could not find `{}` in `{}`\nhelp: {}",
            BUILD_DESCRIPTION_FILE,
            root.display(),
            suggestions::NO_BUILD_DESCRIPTION
        );
    }

    Ok(root)
}

/// Load the recipe workspace with the command line overrides applied.
pub fn load_workspace(global: &GlobalArgs, args: &ConfigArgs) -> Result<RecipeWorkspace> {
    let ctx = GlobalContext::new()?;
    let root = recipe_root(&ctx, global)?;

    let overrides = Overrides {
        options: args.options.clone(),
        settings: args.settings.clone(),
        package_folder: args
            .package_folder
            .as_ref()
            .map(|folder| ctx.cwd().join(folder)),
    };

    RecipeWorkspace::load(&ctx, &root, &overrides)
}
