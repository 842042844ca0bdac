//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built recipe inputs and fixture generators
//! for common testing patterns in sfc-recipe.

use std::path::{Path, PathBuf};

use crate::core::settings::Settings;

/// A CMakeLists.txt declaring the given version, laid out like the sfc one.
pub fn cmake_lists(major: u64, minor: u64, patch: u64) -> String {
    format!(
        r#"cmake_minimum_required(VERSION 3.16)

# Version
set(SFC_VERSION_MAJOR {major})
set(SFC_VERSION_MINOR {minor})
set(SFC_VERSION_PATCH {patch})

project(sfc
    VERSION ${{SFC_VERSION_MAJOR}}.${{SFC_VERSION_MINOR}}.${{SFC_VERSION_PATCH}}
    LANGUAGES CXX)

option(BUILD_TESTS "Build the tests" OFF)
option(BUILD_DOC "Build the documentation" OFF)

add_subdirectory(src)
"#
    )
}

/// Native Linux x86_64 release settings.
pub fn linux_settings() -> Settings {
    Settings {
        os: "Linux".to_string(),
        compiler: "gcc".to_string(),
        build_type: "Release".to_string(),
        arch: Some("x86_64".to_string()),
    }
}

/// Fixture for an sfc source tree.
#[derive(Debug, Clone)]
pub struct SourceTreeFixture {
    /// CMakeLists.txt content.
    pub cmake_lists: String,
    /// Other files (path relative to the root -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl SourceTreeFixture {
    /// A source tree declaring `major.minor.patch`.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SourceTreeFixture {
            cmake_lists: cmake_lists(major, minor, patch),
            files: Vec::new(),
        }
    }

    /// The layout of the exported sources.
    pub fn sfc() -> Self {
        Self::new(1, 2, 3)
            .with_file("src/sfc.cpp", "int sfc() { return 0; }\n")
            .with_file("include/sfc/sfc.h", "int sfc();\n")
            .with_file("public/include/sfc/version.h", "#define SFC_VERSION 1\n")
            .with_file("test/sfc_test.cpp", "int main() { return 0; }\n")
            .with_file("cmake/Coverage.cmake", "# coverage\n")
            .with_file("doc/index.md", "# sfc\n")
            .with_file("README.md", "# sfc\n")
            .with_file("LICENSE", "MIT\n")
            .with_file("scratch/notes.txt", "not exported\n")
    }

    /// Replace the CMakeLists.txt content.
    pub fn with_cmake_lists(mut self, content: impl Into<String>) -> Self {
        self.cmake_lists = content.into();
        self
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write the tree under `root`.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(root)?;
        std::fs::write(root.join("CMakeLists.txt"), &self.cmake_lists)?;

        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::ResolvedVersion;

    #[test]
    fn test_cmake_lists_resolves() {
        let version = ResolvedVersion::resolve(&cmake_lists(4, 5, 6)).unwrap();
        assert_eq!(version, ResolvedVersion::new(4, 5, 6));
    }

    #[test]
    fn test_source_tree_write_to() {
        let tmp = tempfile::TempDir::new().unwrap();
        SourceTreeFixture::sfc().write_to(tmp.path()).unwrap();

        assert!(tmp.path().join("CMakeLists.txt").exists());
        assert!(tmp.path().join("public/include/sfc/version.h").exists());
        assert!(tmp.path().join("scratch/notes.txt").exists());
    }
}
