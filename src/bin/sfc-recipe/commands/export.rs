//! `sfc-recipe export` command

use anyhow::Result;

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::{recipe_root, shell};
use sfc_recipe::core::Recipe;
use sfc_recipe::ops::export_sources;
use sfc_recipe::util::shell::Status;
use sfc_recipe::util::GlobalContext;

pub fn execute(args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let recipe = Recipe::load(&recipe_root(&ctx, global)?)?;
    let dest = ctx.cwd().join(&args.dest);

    let result = export_sources(&recipe, &dest)?;

    let shell = shell(global);
    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "exported",
            "reference": recipe.reference(),
            "files": result.files,
            "manifest": result.manifest,
        }));
    } else {
        shell.status(
            Status::Exported,
            format!(
                "{} ({} files) to {}",
                recipe.reference(),
                result.files.len(),
                dest.display()
            ),
        );
    }

    Ok(())
}
