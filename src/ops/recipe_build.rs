//! Implementation of `sfc-recipe build`, `package` and `create`.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::events::BuildEvent;
use crate::builder::orchestrator::{BuildOrchestrator, BuildReport};
use crate::builder::plan::{BuildPlan, BuildStage};
use crate::builder::tool::BuildTool;
use crate::core::package_info::PackageInfo;
use crate::core::settings::RecipeOptions;
use crate::core::workspace::RecipeWorkspace;
use crate::util::diagnostic::suggestions;
use crate::util::shell::{format_duration, Shell, Spinner, Status};

/// Which part of the recipe to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Configure and build, including the optional targets
    #[default]
    Build,
    /// Install an existing build and export the package descriptor
    Package,
    /// Build followed by package
    Create,
}

/// Options for the build commands.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub mode: BuildMode,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub report: BuildReport,
    /// Written package descriptor, when the run installed
    pub package_info: Option<PathBuf>,
}

/// Plan for `mode` in `ws`.
pub fn plan_for(ws: &RecipeWorkspace, mode: BuildMode) -> BuildPlan {
    match mode {
        BuildMode::Build => ws.build_plan(false),
        BuildMode::Package => ws.install_plan(),
        BuildMode::Create => ws.build_plan(true),
    }
}

/// Run the recipe against `tool`.
pub fn build(
    ws: &RecipeWorkspace,
    tool: &mut dyn BuildTool,
    opts: &BuildOptions,
    shell: &Shell,
) -> Result<BuildOutcome> {
    if opts.mode == BuildMode::Package && !ws.anchored_layout().build_folder.exists() {
        bail!(
            "no build found in {}\nhelp: {}",
            ws.anchored_layout().build_folder.display(),
            suggestions::BUILD_FIRST
        );
    }

    let plan = plan_for(ws, opts.mode);
    let vars = ws.toolchain();

    if let Some(requirement) = ws.recipe().build_requirements(ws.config()).first() {
        shell.note(format!("build requires {}", requirement));
    }

    let mut spinner: Option<Spinner> = None;
    let report = BuildOrchestrator::new(&plan, &vars).run_with_events(tool, |event| {
        if shell.is_json() {
            shell.json_event(event);
            return;
        }

        match event {
            BuildEvent::StageStarted { stage, .. } => {
                let (status, what) = describe(*stage, ws);
                spinner = Some(shell.spinner(status, what));
            }
            BuildEvent::StageFinished { .. } | BuildEvent::StageFailed { .. } => {
                spinner = None;
            }
            BuildEvent::StageSkipped { stage, skip_reason } => {
                if requested(*stage, ws.config().options()) {
                    shell.warn(format!("{} requested but skipped ({})", stage, skip_reason));
                } else {
                    shell.status(Status::Skipped, format!("{} ({})", stage, skip_reason));
                }
            }
            BuildEvent::BuildFinished { .. } => {}
        }
    })?;
    drop(spinner);

    let package_info = if report.completed.contains(&BuildStage::Installed) {
        let path = PackageInfo::sfc().write(ws.package_folder())?;
        shell.status(
            Status::Packaged,
            format!("{} into {}", ws.recipe().reference(), ws.package_folder().display()),
        );
        Some(path)
    } else {
        None
    };

    shell.status(
        Status::Finished,
        format!(
            "{} in {}",
            ws.recipe().reference(),
            format_duration(std::time::Duration::from_millis(report.duration_ms))
        ),
    );

    Ok(BuildOutcome {
        report,
        package_info,
    })
}

/// Whether the options asked for an optional `stage`.
fn requested(stage: BuildStage, options: &RecipeOptions) -> bool {
    match stage {
        BuildStage::DocBuilt => options.build_doc,
        BuildStage::CoverageBuilt => options.code_coverage,
        _ => false,
    }
}

fn describe(stage: BuildStage, ws: &RecipeWorkspace) -> (Status, String) {
    let reference = ws.recipe().reference();
    match stage {
        BuildStage::Configured => (
            Status::Configuring,
            format!("{} ({})", reference, ws.config().settings()),
        ),
        BuildStage::Built => (Status::Building, reference),
        BuildStage::DocBuilt => (Status::Documenting, reference),
        BuildStage::CoverageBuilt => (Status::Covering, reference),
        BuildStage::Installed => (Status::Installing, reference),
    }
}
