//! Recipe identity: name, version and static metadata of the `sfc` library.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::errors::ConfigurationError;
use crate::core::settings::RecipeConfig;
use crate::core::version::ResolvedVersion;
use crate::util::fs::read_to_string;
use crate::util::hash::Fingerprint;

/// File the version is resolved from.
pub const BUILD_DESCRIPTION_FILE: &str = "CMakeLists.txt";

/// Test framework required when the unit tests are built.
pub const TEST_FRAMEWORK_REQUIREMENT: &str = "gtest/1.11.0";

/// The loaded recipe. The version is resolved once at load time and is part
/// of the recipe's identity from then on.
#[derive(Debug, Clone)]
pub struct Recipe {
    root: PathBuf,
    version: ResolvedVersion,
}

impl Recipe {
    pub const NAME: &'static str = "sfc";
    pub const DESCRIPTION: &'static str = "C++ 'Sequential function chart' 2nd party lib.";
    pub const AUTHOR: &'static str = "ERGENSCHAEFFTER, Cedric <ceber@ergen.fr>";
    pub const URL: &'static str = "https://home.ergen.fr/gitlab/cpp/libs/sfc";

    /// Source patterns shipped with the recipe.
    pub const EXPORTS_SOURCES: [&'static str; 9] = [
        "src/**",
        "include/**",
        "unit-tests/**",
        "cmake/**",
        "Doxyfile",
        "README.md",
        "LICENSE",
        "CMakeLists.txt",
        "sfcConfig.cmake.in",
    ];

    /// Load the recipe rooted at `root`, resolving its version from
    /// `CMakeLists.txt`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(BUILD_DESCRIPTION_FILE);
        let text = read_to_string(&path)?;
        let recipe = Self::from_text(root, &text)
            .with_context(|| format!("failed to resolve version from {}", path.display()))?;

        tracing::debug!("loaded {} from {}", recipe.reference(), root.display());
        Ok(recipe)
    }

    /// Build the recipe from already loaded build description text.
    pub fn from_text(root: &Path, text: &str) -> Result<Self, ConfigurationError> {
        Ok(Recipe {
            root: root.to_path_buf(),
            version: ResolvedVersion::resolve(text)?,
        })
    }

    /// Get the recipe name.
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Get the resolved version.
    pub fn version(&self) -> &ResolvedVersion {
        &self.version
    }

    /// Get the recipe root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `name/version` reference.
    pub fn reference(&self) -> String {
        format!("{}/{}", Self::NAME, self.version)
    }

    /// Tool requirements needed to build with `config`.
    pub fn build_requirements(&self, config: &RecipeConfig) -> Vec<String> {
        if config.options().tests_enabled() {
            vec![TEST_FRAMEWORK_REQUIREMENT.to_string()]
        } else {
            Vec::new()
        }
    }

    /// Binary package identifier for `config`.
    ///
    /// Two configs produce the same id exactly when their settings and
    /// options are equal.
    pub fn package_id(&self, config: &RecipeConfig) -> String {
        let settings = config.settings();
        let mut fp = Fingerprint::new();
        fp.update_str(&self.reference())
            .update_str(&settings.os)
            .update_str(&settings.compiler)
            .update_str(&settings.build_type)
            .update_opt(settings.arch());
        for (name, value) in config.options().iter() {
            fp.update_str(name).update_bool(value);
        }
        fp.finish_short()
    }
}
