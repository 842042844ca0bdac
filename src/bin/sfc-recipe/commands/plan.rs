//! `sfc-recipe plan` command

use anyhow::Result;

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::{load_workspace, shell};
use sfc_recipe::builder::plan::BuildAction;

pub fn execute(args: PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global, &args.config)?;
    let plan = ws.build_plan(args.package);

    let shell = shell(global);
    if shell.is_json() {
        shell.json_event(&plan);
        return Ok(());
    }

    println!(
        "{} ({}{})",
        ws.recipe().reference(),
        ws.config().settings(),
        if plan.is_cross_building() {
            ", cross-building"
        } else {
            ""
        }
    );

    for (i, action) in plan.actions().iter().enumerate() {
        let what = match action {
            BuildAction::Configure => "configure".to_string(),
            BuildAction::Build => "build".to_string(),
            BuildAction::BuildTarget { target, parallel } => {
                if *parallel {
                    format!("build target `{}`", target)
                } else {
                    format!("build target `{}` (serial)", target)
                }
            }
            BuildAction::Install => format!("install into {}", ws.package_folder().display()),
        };
        println!("  {}. {}", i + 1, what);
    }

    for skipped in plan.skipped() {
        println!("  skipped: {} ({})", skipped.stage, skipped.reason);
    }

    Ok(())
}
