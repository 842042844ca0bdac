//! Package layout declared to downstream consumers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::write_string;

/// Directory roles and library names a consumer of an installed package
/// should expect, relative to the package folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub includedirs: Vec<String>,
    pub libdirs: Vec<String>,
    pub builddirs: Vec<String>,
    pub bindirs: Vec<String>,
    pub libs: Vec<String>,
}

impl PackageInfo {
    /// File written into the package folder after a successful install.
    pub const FILE_NAME: &'static str = "package_info.json";

    /// The declaration for the `sfc` library.
    pub fn sfc() -> Self {
        let owned =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        PackageInfo {
            includedirs: owned(&["include", "public/include"]),
            libdirs: owned(&["lib"]),
            builddirs: owned(&["lib/CMake"]),
            bindirs: owned(&["bin"]),
            libs: owned(&["sfc"]),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize package info")
    }

    /// Write the declaration into `package_folder`.
    pub fn write(&self, package_folder: &Path) -> Result<PathBuf> {
        let path = package_folder.join(Self::FILE_NAME);
        write_string(&path, &self.to_json_pretty()?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sfc_layout() {
        let info = PackageInfo::sfc();
        assert_eq!(info.includedirs, ["include", "public/include"]);
        assert_eq!(info.libdirs, ["lib"]);
        assert_eq!(info.builddirs, ["lib/CMake"]);
        assert_eq!(info.bindirs, ["bin"]);
        assert_eq!(info.libs, ["sfc"]);
    }

    #[test]
    fn test_write_package_info() {
        let tmp = TempDir::new().unwrap();
        let path = PackageInfo::sfc().write(tmp.path()).unwrap();

        assert!(path.ends_with(PackageInfo::FILE_NAME));
        let contents = std::fs::read_to_string(&path).unwrap();
        let info: PackageInfo = serde_json::from_str(&contents).unwrap();
        assert_eq!(info, PackageInfo::sfc());
    }
}
