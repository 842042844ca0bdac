//! Test utilities and mocks for sfc-recipe unit tests.
//!
//! This module provides a mock build tool so build plans can be run without
//! a real CMake, plus helpers to lay out recipe directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use sfc_recipe::test_support::{MockBuildTool, create_recipe_dir};
//!
//! #[test]
//! fn test_example() {
//!     let mut tool = MockBuildTool::new().fail_at("install");
//!     // Run a plan against the mock...
//!     assert_eq!(tool.calls(), ["configure", "build", "install"]);
//! }
//! ```

pub mod fixtures;

use crate::builder::tool::{BuildTool, ToolError};
use crate::builder::toolchain::ToolchainVariables;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock build tool recording every call.
///
/// Calls are recorded as `configure`, `build`, `build <target> parallel=<bool>`
/// and `install`.
#[derive(Debug, Clone, Default)]
pub struct MockBuildTool {
    calls: Vec<String>,
    fail_at: Option<String>,
    configured_with: Option<ToolchainVariables>,
}

impl MockBuildTool {
    /// Create a mock that succeeds on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first call recorded as `call`.
    pub fn fail_at(mut self, call: impl Into<String>) -> Self {
        self.fail_at = Some(call.into());
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Variables passed to the last configure call.
    pub fn configured_with(&self) -> Option<&ToolchainVariables> {
        self.configured_with.as_ref()
    }

    fn record(&mut self, call: String) -> Result<(), ToolError> {
        let fail = self.fail_at.as_deref() == Some(call.as_str());
        self.calls.push(call.clone());

        if fail {
            self.fail_at = None;
            return Err(ToolError::Failed {
                command: format!("mock {}", call),
                status: Some(1),
                stderr: format!("{} failed", call),
            });
        }
        Ok(())
    }
}

impl BuildTool for MockBuildTool {
    fn configure(&mut self, vars: &ToolchainVariables) -> Result<(), ToolError> {
        self.configured_with = Some(vars.clone());
        self.record("configure".to_string())
    }

    fn build_target(&mut self, target: Option<&str>, parallel: bool) -> Result<(), ToolError> {
        let call = match target {
            Some(target) => format!("build {} parallel={}", target, parallel),
            None => "build".to_string(),
        };
        self.record(call)
    }

    fn install(&mut self) -> Result<(), ToolError> {
        self.record("install".to_string())
    }
}

/// Create a temporary recipe directory with a CMakeLists.txt declaring
/// `major.minor.patch`.
///
/// Returns the TempDir handle - dropping it will clean up the directory.
pub fn create_recipe_dir(major: u64, minor: u64, patch: u64) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    SourceTreeFixture::new(major, minor, patch)
        .write_to(tmp.path())
        .expect("failed to write recipe dir");
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::CoreFlags;

    fn vars() -> ToolchainVariables {
        ToolchainVariables::new(CoreFlags {
            build_shared_libs: true,
            position_independent_code: true,
        })
    }

    #[test]
    fn test_mock_records_calls() {
        let mut tool = MockBuildTool::new();
        tool.configure(&vars()).unwrap();
        tool.build_target(None, true).unwrap();
        tool.build_target(Some("coverage"), false).unwrap();
        tool.install().unwrap();

        assert_eq!(
            tool.calls(),
            ["configure", "build", "build coverage parallel=false", "install"]
        );
        assert!(tool.configured_with().is_some());
    }

    #[test]
    fn test_mock_fails_once() {
        let mut tool = MockBuildTool::new().fail_at("install");
        assert!(tool.install().is_err());
        assert!(tool.install().is_ok());
    }

    #[test]
    fn test_create_recipe_dir() {
        let dir = create_recipe_dir(0, 1, 0);
        assert!(dir.path().join("CMakeLists.txt").exists());
    }
}
