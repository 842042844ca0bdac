//! `sfc-recipe version` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::{recipe_root, shell};
use sfc_recipe::core::Recipe;
use sfc_recipe::util::GlobalContext;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let recipe = Recipe::load(&recipe_root(&ctx, global)?)?;

    let shell = shell(global);
    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "name": recipe.name(),
            "version": recipe.version().to_string(),
        }));
    } else {
        println!("{}", recipe.version());
    }

    Ok(())
}
