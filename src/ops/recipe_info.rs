//! Implementation of `sfc-recipe info`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::package_info::PackageInfo;
use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::core::settings::{RecipeOptions, Settings};
use crate::core::workspace::RecipeWorkspace;

/// Everything known about one evaluation of the recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeInfo {
    pub name: &'static str,
    pub version: String,
    /// The version normalized to semantic versioning
    pub semver: semver::Version,
    pub reference: String,
    pub description: &'static str,
    pub author: &'static str,
    pub url: &'static str,
    pub package_id: String,
    pub settings: Settings,
    pub options: RecipeOptions,
    pub build_platform: Platform,
    pub cross_building: bool,
    pub build_requires: Vec<String>,
    pub package_folder: PathBuf,
    pub package_info: PackageInfo,
}

/// Describe the recipe evaluated by `ws`.
pub fn recipe_info(ws: &RecipeWorkspace) -> RecipeInfo {
    let recipe = ws.recipe();
    RecipeInfo {
        name: Recipe::NAME,
        version: recipe.version().to_string(),
        semver: recipe.version().to_semver(),
        reference: recipe.reference(),
        description: Recipe::DESCRIPTION,
        author: Recipe::AUTHOR,
        url: Recipe::URL,
        package_id: ws.package_id(),
        settings: ws.config().settings().clone(),
        options: *ws.config().options(),
        build_platform: ws.build_platform().clone(),
        cross_building: ws.is_cross_building(),
        build_requires: recipe.build_requirements(ws.config()),
        package_folder: ws.package_folder().to_path_buf(),
        package_info: PackageInfo::sfc(),
    }
}

impl RecipeInfo {
    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize recipe info")
    }
}
