//! Configuration file support for sfc-recipe.
//!
//! sfc-recipe supports two configuration file locations:
//! - Global: `<home>/config.toml` - User-wide defaults
//! - Project: `<recipe>/.sfc-recipe/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigurationError;
use crate::core::platform::Platform;
use crate::core::settings::{RecipeOptions, Settings};

/// sfc-recipe configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recipe option overrides (`shared = false`)
    pub options: BTreeMap<String, toml::Value>,

    /// Target setting overrides (`arch = "armv8"`)
    pub settings: BTreeMap<String, String>,

    /// Build machine description
    pub build_settings: BuildSettingsConfig,

    /// Toolchain settings
    pub toolchain: ToolchainConfig,

    /// CMake settings
    pub cmake: CMakeConfig,

    /// Package settings
    pub package: PackageConfig,
}

/// The machine the build runs on. Defaults to the detected host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettingsConfig {
    pub os: Option<String>,
    pub arch: Option<String>,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain files included before the generated variables
    pub user_toolchain: Vec<PathBuf>,
}

/// CMake settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CMakeConfig {
    /// CMake executable (default: `cmake` from PATH)
    pub program: Option<PathBuf>,

    /// CMake generator (e.g. "Ninja")
    pub generator: Option<String>,

    /// Number of parallel jobs (None = CMake default)
    pub jobs: Option<usize>,
}

/// Package settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Install folder (default: under the sfc-recipe home)
    pub folder: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.options.extend(other.options);
        self.settings.extend(other.settings);

        if other.build_settings.os.is_some() {
            self.build_settings.os = other.build_settings.os;
        }
        if other.build_settings.arch.is_some() {
            self.build_settings.arch = other.build_settings.arch;
        }

        // Replaced, not appended
        if !other.toolchain.user_toolchain.is_empty() {
            self.toolchain.user_toolchain = other.toolchain.user_toolchain;
        }

        if other.cmake.program.is_some() {
            self.cmake.program = other.cmake.program;
        }
        if other.cmake.generator.is_some() {
            self.cmake.generator = other.cmake.generator;
        }
        if other.cmake.jobs.is_some() {
            self.cmake.jobs = other.cmake.jobs;
        }

        if other.package.folder.is_some() {
            self.package.folder = other.package.folder;
        }
    }

    /// Apply the `[options]` table to `options`.
    ///
    /// Values may be TOML booleans or any string `parse_bool` accepts.
    pub fn apply_options(&self, options: &mut RecipeOptions) -> Result<(), ConfigurationError> {
        for (name, value) in &self.options {
            let value = match value {
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            options.set(name, &value)?;
        }
        Ok(())
    }

    /// Apply the `[settings]` table to `settings`.
    pub fn apply_settings(&self, settings: &mut Settings) -> Result<(), ConfigurationError> {
        for (name, value) in &self.settings {
            settings.set(name, value)?;
        }
        Ok(())
    }

    /// The build machine: the detected host with `[build_settings]` applied.
    pub fn build_platform(&self) -> Platform {
        let host = Platform::host();
        let os = self.build_settings.os.as_deref().unwrap_or(&host.os);
        let arch = match self.build_settings.arch.as_deref() {
            Some(arch) => Some(arch),
            None => host.arch.as_deref(),
        };
        Platform::new(os, arch)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.sfc-recipe/config.toml)
/// 2. Global config (<home>/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}
