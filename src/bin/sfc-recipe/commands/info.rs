//! `sfc-recipe info` command

use anyhow::Result;

use crate::cli::{ConfigArgs, GlobalArgs};
use crate::commands::load_workspace;
use sfc_recipe::ops::recipe_info;

pub fn execute(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global, &args)?;
    println!("{}", recipe_info(&ws).to_json_pretty()?);
    Ok(())
}
