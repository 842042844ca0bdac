//! sfc-recipe - a build and packaging recipe for the sfc C++ library
//!
//! This crate resolves the library version from its CMake build
//! description, plans the build folder layout, generates the CMake
//! toolchain variables, drives configure, build, doc, coverage and
//! install through CMake, and exports the consumer-facing package
//! descriptor.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for sfc-recipe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides source tree fixtures and a recording
/// build tool.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildLayout, BuildOrchestrator, BuildPlan, ToolchainGenerator};
pub use core::{PackageInfo, Recipe, RecipeConfig, RecipeWorkspace, ResolvedVersion};
pub use util::context::GlobalContext;
