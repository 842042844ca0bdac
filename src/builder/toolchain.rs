//! CMake toolchain generation.
//!
//! Derives the variables handed to CMake from the recipe config and renders
//! them as `conan_toolchain.cmake` in the generators folder. When
//! cross-building inside a Yocto/OE SDK environment, the SDK's own toolchain
//! file is included ahead of the generated variables.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::settings::RecipeConfig;
use crate::util::fs::write_string;

/// Environment variable pointing at the OE SDK native sysroot.
pub const NATIVE_SYSROOT_ENV: &str = "OECORE_NATIVE_SYSROOT";

/// Location of the OE toolchain file inside the native sysroot.
pub const OE_TOOLCHAIN_FILE: &str = "/usr/share/cmake/OEToolchainConfig.cmake";

/// Name of the generated toolchain file.
pub const TOOLCHAIN_FILE_NAME: &str = "conan_toolchain.cmake";

/// A toolchain variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolchainValue {
    Bool(bool),
    Path(PathBuf),
}

impl ToolchainValue {
    /// Get the value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ToolchainValue::Bool(b) => Some(*b),
            ToolchainValue::Path(_) => None,
        }
    }

    fn cache_type(&self) -> &'static str {
        match self {
            ToolchainValue::Bool(_) => "BOOL",
            ToolchainValue::Path(_) => "PATH",
        }
    }

    fn to_cmake(&self) -> String {
        match self {
            ToolchainValue::Bool(true) => "ON".to_string(),
            ToolchainValue::Bool(false) => "OFF".to_string(),
            ToolchainValue::Path(p) => format!("\"{}\"", cmake_path(p)),
        }
    }
}

/// Library kind and code model flags, kept apart from the variables map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreFlags {
    pub build_shared_libs: bool,
    pub position_independent_code: bool,
}

/// Variables and toolchain includes handed to CMake.
///
/// Variables are only ever added or overwritten, never removed. The user
/// toolchain list is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainVariables {
    variables: BTreeMap<String, ToolchainValue>,
    user_toolchain: Vec<PathBuf>,
    core: CoreFlags,
}

impl ToolchainVariables {
    /// Create an empty variable set with the given core flags.
    pub fn new(core: CoreFlags) -> Self {
        ToolchainVariables {
            variables: BTreeMap::new(),
            user_toolchain: Vec::new(),
            core,
        }
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: ToolchainValue) {
        self.variables.insert(name.into(), value);
    }

    /// Get a variable.
    pub fn get(&self, name: &str) -> Option<&ToolchainValue> {
        self.variables.get(name)
    }

    /// Get a boolean variable.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ToolchainValue::as_bool)
    }

    /// Iterate over variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolchainValue)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Append a toolchain file to include, after any existing ones.
    pub fn append_user_toolchain(&mut self, path: impl Into<PathBuf>) {
        self.user_toolchain.push(path.into());
    }

    /// Toolchain files to include, in order.
    pub fn user_toolchain(&self) -> &[PathBuf] {
        &self.user_toolchain
    }

    /// Library kind and code model flags.
    pub fn core(&self) -> CoreFlags {
        self.core
    }

    /// Render the CMake toolchain script.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by sfc-recipe. Do not edit.\n\n");

        for path in &self.user_toolchain {
            let _ = writeln!(out, "include(\"{}\")", cmake_path(path));
        }
        if !self.user_toolchain.is_empty() {
            out.push('\n');
        }

        let on_off = |b: bool| if b { "ON" } else { "OFF" };
        let _ = writeln!(
            out,
            "set(BUILD_SHARED_LIBS {} CACHE BOOL \"Build shared libraries\")",
            on_off(self.core.build_shared_libs)
        );
        let _ = writeln!(
            out,
            "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"Position independent code\")",
            on_off(self.core.position_independent_code)
        );
        out.push('\n');

        for (name, value) in &self.variables {
            let _ = writeln!(
                out,
                "set({} {} CACHE {} \"\" FORCE)",
                name,
                value.to_cmake(),
                value.cache_type()
            );
        }

        out
    }

    /// Write the toolchain script into `generators_folder`.
    pub fn write(&self, generators_folder: &Path) -> Result<PathBuf> {
        let path = generators_folder.join(TOOLCHAIN_FILE_NAME);
        write_string(&path, &self.render())?;
        tracing::debug!("wrote toolchain file {}", path.display());
        Ok(path)
    }
}

/// Environment inputs of the toolchain generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    native_sysroot: Option<String>,
}

impl BuildEnvironment {
    /// Read the environment of the current process.
    pub fn from_env() -> Self {
        BuildEnvironment {
            native_sysroot: std::env::var(NATIVE_SYSROOT_ENV).ok(),
        }
    }

    /// Set the native sysroot explicitly.
    pub fn with_native_sysroot(mut self, sysroot: impl Into<String>) -> Self {
        self.native_sysroot = Some(sysroot.into());
        self
    }

    /// The native sysroot, if set and non-empty.
    pub fn native_sysroot(&self) -> Option<&str> {
        self.native_sysroot.as_deref().filter(|s| !s.is_empty())
    }
}

/// Derives [`ToolchainVariables`] from the recipe config.
#[derive(Debug)]
pub struct ToolchainGenerator<'a> {
    config: &'a RecipeConfig,
    package_folder: &'a Path,
    cross_building: bool,
    env: BuildEnvironment,
    user_toolchain: Vec<PathBuf>,
}

impl<'a> ToolchainGenerator<'a> {
    /// Create a generator installing into `package_folder`.
    pub fn new(config: &'a RecipeConfig, package_folder: &'a Path) -> Self {
        ToolchainGenerator {
            config,
            package_folder,
            cross_building: false,
            env: BuildEnvironment::default(),
            user_toolchain: Vec::new(),
        }
    }

    /// Set whether this run is a cross-build.
    pub fn cross_building(mut self, cross_building: bool) -> Self {
        self.cross_building = cross_building;
        self
    }

    /// Set the environment to read the native sysroot from.
    pub fn environment(mut self, env: BuildEnvironment) -> Self {
        self.env = env;
        self
    }

    /// Toolchain files already configured by the user.
    pub fn user_toolchain(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.user_toolchain.extend(paths);
        self
    }

    /// Generate the variable set.
    pub fn generate(&self) -> ToolchainVariables {
        let options = self.config.options();
        let mut vars = ToolchainVariables::new(CoreFlags {
            build_shared_libs: options.shared,
            position_independent_code: options.fpic,
        });

        for path in &self.user_toolchain {
            vars.append_user_toolchain(path.clone());
        }

        vars.set("CONAN_BUILD", ToolchainValue::Bool(true));
        vars.set("BUILD_TESTS", ToolchainValue::Bool(options.tests_enabled()));
        vars.set("BUILD_DOC", ToolchainValue::Bool(options.build_doc));
        vars.set("CODE_COVERAGE", ToolchainValue::Bool(options.code_coverage));
        vars.set(
            "BASE_INSTALL_DIR",
            ToolchainValue::Path(self.package_folder.to_path_buf()),
        );

        if self.cross_building {
            match self.env.native_sysroot() {
                Some(sysroot) => {
                    let toolchain_file = format!("{}{}", sysroot, OE_TOOLCHAIN_FILE);
                    tracing::info!("cross-building with OE toolchain {}", toolchain_file);
                    vars.set("CONAN_BUILD", ToolchainValue::Bool(true));
                    vars.append_user_toolchain(toolchain_file);
                }
                None => {
                    tracing::debug!(
                        "cross-building without {}; no SDK toolchain included",
                        NATIVE_SYSROOT_ENV
                    );
                }
            }
        }

        vars
    }
}

/// CMake wants forward slashes, even on Windows.
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
