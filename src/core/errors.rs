//! Recipe error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::plan::BuildStage;
use crate::builder::tool::ToolError;
use crate::core::version::VersionComponent;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Invalid recipe input. Always fatal, raised before any build action runs.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigurationError {
    #[error("missing version component `{component}`")]
    #[diagnostic(
        code(sfc_recipe::version::missing),
        help("declare it in CMakeLists.txt, e.g. `set(SFC_VERSION_MAJOR 1)`")
    )]
    MissingVersionComponent { component: VersionComponent },

    #[error(
        "ambiguous version component `{component}`: {first} (line {first_line}) vs {second} (line {second_line})"
    )]
    #[diagnostic(
        code(sfc_recipe::version::ambiguous),
        help("keep a single definition of each version component")
    )]
    AmbiguousVersionComponent {
        component: VersionComponent,
        first: u64,
        first_line: usize,
        second: u64,
        second_line: usize,
    },

    #[error("invalid value `{value}` for version component `{component}` (line {line})")]
    #[diagnostic(code(sfc_recipe::version::invalid))]
    InvalidVersionComponent {
        component: VersionComponent,
        value: String,
        line: usize,
    },

    #[error("expected `name=value`, got `{input}`")]
    #[diagnostic(code(sfc_recipe::config::assignment))]
    InvalidAssignment { input: String },

    #[error("unknown option `{name}`")]
    #[diagnostic(
        code(sfc_recipe::config::unknown_option),
        help("valid options: shared, fPIC, build_tests, code_coverage, build_doc")
    )]
    UnknownOption { name: String },

    #[error("unknown setting `{name}`")]
    #[diagnostic(
        code(sfc_recipe::config::unknown_setting),
        help("valid settings: os, compiler, build_type, arch")
    )]
    UnknownSetting { name: String },

    #[error("invalid boolean `{value}` for option `{name}`")]
    #[diagnostic(
        code(sfc_recipe::config::invalid_bool),
        help("use True/False, true/false, ON/OFF or 1/0")
    )]
    InvalidBool { name: String, value: String },
}

impl ConfigurationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let ConfigurationError::MissingVersionComponent { .. }
        | ConfigurationError::AmbiguousVersionComponent { .. }
        | ConfigurationError::InvalidVersionComponent { .. } = self
        {
            diag = diag.with_location("CMakeLists.txt");
        }
        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }
        diag
    }
}

/// Error raised while evaluating the recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("{stage} step failed")]
    DelegatedTool {
        stage: BuildStage,
        #[source]
        source: ToolError,
    },
}

impl RecipeError {
    /// The stage that failed, if a delegated tool call failed.
    pub fn stage(&self) -> Option<BuildStage> {
        match self {
            RecipeError::DelegatedTool { stage, .. } => Some(*stage),
            RecipeError::Configuration(_) => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RecipeError::Configuration(err) => err.to_diagnostic(),
            RecipeError::DelegatedTool { stage, source } => {
                Diagnostic::error(format!("{} step failed", stage))
                    .with_context(source.to_string())
                    .with_context("remaining steps were not run")
                    .with_suggestion(suggestions::BUILD_FAILED)
            }
        }
    }
}
