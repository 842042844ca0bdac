//! Build plan generation.
//!
//! A BuildPlan lists the delegated build-tool actions of one recipe run, in
//! execution order: configure, build, the optional `doc` and `coverage`
//! targets, and install when packaging.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::settings::RecipeOptions;

/// CMake target producing the documentation.
pub const DOC_TARGET: &str = "doc";

/// CMake target running the tests under coverage instrumentation.
pub const COVERAGE_TARGET: &str = "coverage";

/// Stages of a recipe run. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStage {
    Configured,
    Built,
    DocBuilt,
    CoverageBuilt,
    Installed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Configured => "configure",
            BuildStage::Built => "build",
            BuildStage::DocBuilt => "doc",
            BuildStage::CoverageBuilt => "coverage",
            BuildStage::Installed => "install",
        };
        f.write_str(name)
    }
}

/// A single delegated build-tool action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuildAction {
    /// Configure with the generated toolchain
    Configure,
    /// Build the default target
    Build,
    /// Build a named target
    BuildTarget { target: String, parallel: bool },
    /// Install into the package folder
    Install,
}

impl BuildAction {
    /// The stage reached once this action succeeds.
    pub fn stage(&self) -> BuildStage {
        match self {
            BuildAction::Configure => BuildStage::Configured,
            BuildAction::Build => BuildStage::Built,
            BuildAction::BuildTarget { target, .. } if target == COVERAGE_TARGET => {
                BuildStage::CoverageBuilt
            }
            BuildAction::BuildTarget { .. } => BuildStage::DocBuilt,
            BuildAction::Install => BuildStage::Installed,
        }
    }
}

/// Why an optional stage is not part of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The option enabling the stage is off
    Disabled,
    /// The stage cannot run when cross-building
    CrossBuilding,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => f.write_str("disabled"),
            SkipReason::CrossBuilding => f.write_str("not supported when cross-building"),
        }
    }
}

/// An optional stage left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedStage {
    pub stage: BuildStage,
    pub reason: SkipReason,
}

/// Ordered actions of one recipe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    actions: Vec<BuildAction>,
    skipped: Vec<SkippedStage>,
    cross_building: bool,
}

impl BuildPlan {
    /// Plan the build actions for `options`.
    ///
    /// The `doc` and `coverage` targets never run when cross-building,
    /// whatever the options say.
    pub fn new(options: &RecipeOptions, cross_building: bool) -> Self {
        let mut plan = BuildPlan {
            actions: vec![BuildAction::Configure, BuildAction::Build],
            skipped: Vec::new(),
            cross_building,
        };

        plan.optional(BuildStage::DocBuilt, options.build_doc, || {
            BuildAction::BuildTarget {
                target: DOC_TARGET.to_string(),
                parallel: true,
            }
        });

        // Coverage instrumentation is not safe under a parallel build.
        plan.optional(BuildStage::CoverageBuilt, options.code_coverage, || {
            BuildAction::BuildTarget {
                target: COVERAGE_TARGET.to_string(),
                parallel: false,
            }
        });

        plan
    }

    /// A plan that only installs an existing build.
    pub fn install_only(cross_building: bool) -> Self {
        BuildPlan {
            actions: vec![BuildAction::Install],
            skipped: Vec::new(),
            cross_building,
        }
    }

    /// Append the install action.
    pub fn with_install(mut self) -> Self {
        if !self.actions.contains(&BuildAction::Install) {
            self.actions.push(BuildAction::Install);
        }
        self
    }

    fn optional(&mut self, stage: BuildStage, enabled: bool, action: impl FnOnce() -> BuildAction) {
        if self.cross_building {
            self.skipped.push(SkippedStage {
                stage,
                reason: SkipReason::CrossBuilding,
            });
        } else if enabled {
            self.actions.push(action());
        } else {
            self.skipped.push(SkippedStage {
                stage,
                reason: SkipReason::Disabled,
            });
        }
    }

    /// Actions in execution order.
    pub fn actions(&self) -> &[BuildAction] {
        &self.actions
    }

    /// Optional stages left out of the plan.
    pub fn skipped(&self) -> &[SkippedStage] {
        &self.skipped
    }

    /// Stages the plan reaches when every action succeeds.
    pub fn stages(&self) -> Vec<BuildStage> {
        self.actions.iter().map(BuildAction::stage).collect()
    }

    /// Whether the plan was made for a cross-build.
    pub fn is_cross_building(&self) -> bool {
        self.cross_building
    }

    /// Serialize the plan to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize build plan")
    }
}
