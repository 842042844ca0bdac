//! `sfc-recipe toolchain` command
//!
//! Prints the generated toolchain variables, or writes the toolchain file
//! into the generators folder with `--write`.

use anyhow::Result;

use crate::cli::{GlobalArgs, ToolchainArgs};
use crate::commands::{load_workspace, shell};
use sfc_recipe::builder::toolchain::ToolchainValue;
use sfc_recipe::util::shell::Status;

pub fn execute(args: ToolchainArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global, &args.config)?;
    let vars = ws.toolchain();
    let shell = shell(global);

    if args.write {
        let path = vars.write(&ws.anchored_layout().generators_folder)?;
        shell.status(Status::Generated, path.display());
        return Ok(());
    }

    if shell.is_json() {
        shell.json_event(&vars);
        return Ok(());
    }

    for path in vars.user_toolchain() {
        println!("include {}", path.display());
    }

    let core = vars.core();
    println!("BUILD_SHARED_LIBS={}", on_off(core.build_shared_libs));
    println!(
        "CMAKE_POSITION_INDEPENDENT_CODE={}",
        on_off(core.position_independent_code)
    );

    for (name, value) in vars.iter() {
        match value {
            ToolchainValue::Bool(b) => println!("{}={}", name, on_off(*b)),
            ToolchainValue::Path(p) => println!("{}={}", name, p.display()),
        }
    }

    Ok(())
}

fn on_off(b: bool) -> &'static str {
    if b {
        "ON"
    } else {
        "OFF"
    }
}
