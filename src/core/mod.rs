//! Core data structures for sfc-recipe.
//!
//! This module contains the foundational types of a recipe evaluation:
//! - Version resolution from the build description
//! - Options, settings and the build platform
//! - Recipe identity and the exported package descriptor
//! - Workspace management

pub mod errors;
pub mod package_info;
pub mod platform;
pub mod recipe;
pub mod settings;
pub mod version;
pub mod workspace;

pub use errors::{ConfigurationError, RecipeError};
pub use package_info::PackageInfo;
pub use platform::Platform;
pub use recipe::Recipe;
pub use settings::{RecipeConfig, RecipeOptions, Settings};
pub use version::ResolvedVersion;
pub use workspace::{Overrides, RecipeWorkspace};
