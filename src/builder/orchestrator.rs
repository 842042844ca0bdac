//! Build plan execution.
//!
//! Runs the actions of a [`BuildPlan`] against a [`BuildTool`] in order.
//! The first failing action aborts the run and no later action is invoked.

use std::time::Instant;

use serde::Serialize;

use crate::builder::events::BuildEvent;
use crate::builder::plan::{BuildAction, BuildPlan, BuildStage, SkippedStage};
use crate::builder::tool::BuildTool;
use crate::builder::toolchain::ToolchainVariables;
use crate::core::errors::RecipeError;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Stages reached, in order
    pub completed: Vec<BuildStage>,
    /// Optional stages left out of the plan
    pub skipped: Vec<SkippedStage>,
    pub duration_ms: u64,
}

/// Executes a build plan.
#[derive(Debug, Clone, Copy)]
pub struct BuildOrchestrator<'a> {
    plan: &'a BuildPlan,
    vars: &'a ToolchainVariables,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator configuring with `vars`.
    pub fn new(plan: &'a BuildPlan, vars: &'a ToolchainVariables) -> Self {
        BuildOrchestrator { plan, vars }
    }

    /// Run the plan.
    pub fn run(&self, tool: &mut dyn BuildTool) -> Result<BuildReport, RecipeError> {
        self.run_with_events(tool, |_| {})
    }

    /// Run the plan, reporting progress to `on_event`.
    pub fn run_with_events<F>(
        &self,
        tool: &mut dyn BuildTool,
        mut on_event: F,
    ) -> Result<BuildReport, RecipeError>
    where
        F: FnMut(&BuildEvent),
    {
        let start = Instant::now();
        let mut completed = Vec::with_capacity(self.plan.actions().len());

        for skipped in self.plan.skipped() {
            tracing::debug!("skipping {} ({})", skipped.stage, skipped.reason);
            on_event(&BuildEvent::StageSkipped {
                stage: skipped.stage,
                skip_reason: skipped.reason,
            });
        }

        for action in self.plan.actions() {
            let stage = action.stage();
            let target = match action {
                BuildAction::BuildTarget { target, .. } => Some(target.as_str()),
                _ => None,
            };
            on_event(&BuildEvent::started(stage, target));
            tracing::debug!("running {} step", stage);

            let step_start = Instant::now();
            let result = match action {
                BuildAction::Configure => tool.configure(self.vars),
                BuildAction::Build => tool.build_target(None, true),
                BuildAction::BuildTarget { target, parallel } => {
                    tool.build_target(Some(target), *parallel)
                }
                BuildAction::Install => tool.install(),
            };

            if let Err(source) = result {
                tracing::debug!("{} step failed: {}", stage, source);
                on_event(&BuildEvent::StageFailed {
                    stage,
                    message: source.to_string(),
                });
                on_event(&BuildEvent::finished(
                    false,
                    elapsed_ms(start),
                    completed.clone(),
                ));
                return Err(RecipeError::DelegatedTool { stage, source });
            }

            on_event(&BuildEvent::StageFinished {
                stage,
                duration_ms: elapsed_ms(step_start),
            });
            completed.push(stage);
        }

        let duration_ms = elapsed_ms(start);
        on_event(&BuildEvent::finished(true, duration_ms, completed.clone()));

        Ok(BuildReport {
            completed,
            skipped: self.plan.skipped().to_vec(),
            duration_ms,
        })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::layout::BuildLayout;
    use crate::builder::plan::SkipReason;
    use crate::builder::toolchain::ToolchainGenerator;
    use crate::core::platform::{is_cross_building, Platform};
    use crate::core::settings::{RecipeConfig, RecipeOptions, Settings};
    use crate::test_support::fixtures::linux_settings;
    use crate::test_support::MockBuildTool;
    use std::path::Path;

    fn vars(config: &RecipeConfig) -> ToolchainVariables {
        ToolchainGenerator::new(config, Path::new("/pkg")).generate()
    }

    #[test]
    fn test_native_default_run() {
        let settings = linux_settings();
        let build_platform = Platform::new("Linux", Some("x86_64"));
        let cross = is_cross_building(&settings, &build_platform);
        assert!(!cross);

        let config = RecipeConfig::new(RecipeOptions::default(), settings.clone());
        let vars = vars(&config);
        let plan = BuildPlan::new(config.options(), cross).with_install();
        let mut tool = MockBuildTool::new();

        let report = BuildOrchestrator::new(&plan, &vars).run(&mut tool).unwrap();

        assert_eq!(
            report.completed,
            [BuildStage::Configured, BuildStage::Built, BuildStage::Installed]
        );
        assert_eq!(tool.calls(), ["configure", "build", "install"]);
        assert_eq!(tool.configured_with().map(ToolchainVariables::len), Some(5));
        assert_eq!(
            BuildLayout::plan(&settings).build_folder,
            Path::new("build/Linux-Release-x86_64-conan-build")
        );
    }

    #[test]
    fn test_cross_build_skips_doc_and_coverage() {
        let settings = Settings {
            arch: Some("armv8".to_string()),
            ..linux_settings()
        };
        let cross = is_cross_building(&settings, &Platform::new("Linux", Some("x86_64")));
        assert!(cross);

        let options = RecipeOptions {
            build_doc: true,
            code_coverage: true,
            ..RecipeOptions::default()
        };
        let config = RecipeConfig::new(options, settings);
        let vars = vars(&config);
        let plan = BuildPlan::new(config.options(), cross);
        let mut tool = MockBuildTool::new();

        let report = BuildOrchestrator::new(&plan, &vars).run(&mut tool).unwrap();

        assert_eq!(report.completed, [BuildStage::Configured, BuildStage::Built]);
        assert_eq!(tool.calls(), ["configure", "build"]);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::CrossBuilding));
    }

    #[test]
    fn test_coverage_runs_serially_after_doc() {
        let options = RecipeOptions {
            build_doc: true,
            code_coverage: true,
            ..RecipeOptions::default()
        };
        let config = RecipeConfig::new(options, linux_settings());
        let vars = vars(&config);
        let plan = BuildPlan::new(config.options(), false);
        let mut tool = MockBuildTool::new();

        BuildOrchestrator::new(&plan, &vars).run(&mut tool).unwrap();

        assert_eq!(
            tool.calls(),
            [
                "configure",
                "build",
                "build doc parallel=true",
                "build coverage parallel=false"
            ]
        );
    }

    #[test]
    fn test_failure_aborts_remaining_actions() {
        let config = RecipeConfig::new(RecipeOptions::default(), linux_settings());
        let vars = vars(&config);
        let plan = BuildPlan::new(config.options(), false).with_install();
        let mut tool = MockBuildTool::new().fail_at("build");

        let mut events = Vec::new();
        let err = BuildOrchestrator::new(&plan, &vars)
            .run_with_events(&mut tool, |e| events.push(e.clone()))
            .unwrap_err();

        assert_eq!(err.stage(), Some(BuildStage::Built));
        assert_eq!(tool.calls(), ["configure", "build"]);
        assert!(events.contains(&BuildEvent::StageFailed {
            stage: BuildStage::Built,
            message: "`mock build` failed with exit code Some(1)\nbuild failed".to_string(),
        }));
        assert!(matches!(
            events.last(),
            Some(BuildEvent::BuildFinished { success: false, stages, .. })
                if stages == &[BuildStage::Configured]
        ));
    }

    #[test]
    fn test_events_in_order() {
        let config = RecipeConfig::new(RecipeOptions::default(), linux_settings());
        let vars = vars(&config);
        let plan = BuildPlan::new(config.options(), false);
        let mut tool = MockBuildTool::new();

        let mut reasons = Vec::new();
        BuildOrchestrator::new(&plan, &vars)
            .run_with_events(&mut tool, |e| {
                let json: serde_json::Value = serde_json::from_str(&e.to_json()).unwrap();
                reasons.push(json["reason"].as_str().unwrap().to_string());
            })
            .unwrap();

        assert_eq!(
            reasons,
            [
                "stage-skipped",
                "stage-skipped",
                "stage-started",
                "stage-finished",
                "stage-started",
                "stage-finished",
                "build-finished"
            ]
        );
    }
}
