//! High-level operations.
//!
//! This module contains the implementation of sfc-recipe commands.

pub mod recipe_build;
pub mod recipe_export;
pub mod recipe_info;

pub use recipe_build::{build, plan_for, BuildMode, BuildOptions, BuildOutcome};
pub use recipe_export::{export_sources, ExportResult};
pub use recipe_info::{recipe_info, RecipeInfo};
