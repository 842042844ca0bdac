//! Build machine platform and cross-build detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::settings::Settings;

/// An `(os, arch)` pair using the recipe's setting spellings (`Linux`,
/// `x86_64`, `armv8`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: String,
    pub arch: Option<String>,
}

impl Platform {
    /// Create a new platform.
    pub fn new(os: &str, arch: Option<&str>) -> Self {
        Platform {
            os: os.to_string(),
            arch: arch.map(|s| s.to_string()),
        }
    }

    /// Detect the platform this process runs on.
    pub fn host() -> Self {
        Platform {
            os: os_setting(std::env::consts::OS),
            arch: Some(arch_setting(std::env::consts::ARCH)),
        }
    }

    /// The target platform described by `settings`.
    pub fn of(settings: &Settings) -> Self {
        Platform {
            os: settings.os.clone(),
            arch: settings.arch().map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arch {
            Some(arch) => write!(f, "{}-{}", self.os, arch),
            None => write!(f, "{}", self.os),
        }
    }
}

/// Map a Rust `std::env::consts::OS` value to the `os` setting spelling.
pub fn os_setting(os: &str) -> String {
    match os {
        "linux" => "Linux",
        "macos" => "Macos",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "android" => "Android",
        "ios" => "iOS",
        other => other,
    }
    .to_string()
}

/// Map a Rust `std::env::consts::ARCH` value to the `arch` setting spelling.
pub fn arch_setting(arch: &str) -> String {
    match arch {
        "aarch64" => "armv8",
        "arm" => "armv7",
        "x86" => "x86",
        "powerpc64" => "ppc64",
        other => other,
    }
    .to_string()
}

/// Whether building for `target` on `build` is a cross-build.
///
/// The OS must match; the architecture is compared only when the target
/// declares one.
pub fn is_cross_building(target: &Settings, build: &Platform) -> bool {
    if !target.os.is_empty() && !target.os.eq_ignore_ascii_case(&build.os) {
        return true;
    }

    match (target.arch(), build.arch.as_deref()) {
        (Some(target_arch), Some(build_arch)) => target_arch != build_arch,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(os: &str, arch: Option<&str>) -> Settings {
        Settings {
            os: os.to_string(),
            compiler: "gcc".to_string(),
            build_type: "Release".to_string(),
            arch: arch.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_host_platform() {
        let host = Platform::host();
        assert!(!host.os.is_empty());
        assert!(host.arch.is_some());
    }

    #[test]
    fn test_setting_spellings() {
        assert_eq!(os_setting("linux"), "Linux");
        assert_eq!(os_setting("windows"), "Windows");
        assert_eq!(arch_setting("aarch64"), "armv8");
        assert_eq!(arch_setting("x86_64"), "x86_64");
    }

    #[test]
    fn test_native_build_is_not_cross() {
        let build = Platform::new("Linux", Some("x86_64"));
        assert!(!is_cross_building(&settings("Linux", Some("x86_64")), &build));
    }

    #[test]
    fn test_arch_mismatch_is_cross() {
        let build = Platform::new("Linux", Some("x86_64"));
        assert!(is_cross_building(&settings("Linux", Some("armv8")), &build));
    }

    #[test]
    fn test_os_mismatch_is_cross() {
        let build = Platform::new("Linux", Some("x86_64"));
        assert!(is_cross_building(&settings("Windows", Some("x86_64")), &build));
    }

    #[test]
    fn test_unknown_target_arch_compares_os_only() {
        let build = Platform::new("Linux", Some("x86_64"));
        assert!(!is_cross_building(&settings("Linux", None), &build));
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::new("Linux", Some("armv8")).to_string(), "Linux-armv8");
        assert_eq!(Platform::new("Linux", None).to_string(), "Linux");
    }
}
