//! `sfc-recipe layout` command

use anyhow::Result;

use crate::cli::{ConfigArgs, GlobalArgs};
use crate::commands::{load_workspace, shell};

pub fn execute(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global, &args)?;
    let layout = ws.layout();

    let shell = shell(global);
    if shell.is_json() {
        shell.json_event(layout);
        return Ok(());
    }

    println!("source:     {}", layout.source_folder.display());
    println!("build:      {}", layout.build_folder.display());
    println!("generators: {}", layout.generators_folder.display());

    Ok(())
}
