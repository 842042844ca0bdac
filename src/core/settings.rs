//! Recipe options and settings.
//!
//! A [`RecipeConfig`] is assembled once per invocation from the config files
//! and command line, then passed by reference to every component. It is never
//! mutated after construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigurationError;
use crate::core::platform::Platform;

/// User-facing boolean options of the recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeOptions {
    /// Build a shared library instead of a static one
    pub shared: bool,

    /// Position-independent code
    #[serde(rename = "fPIC")]
    pub fpic: bool,

    /// Build the unit tests
    pub build_tests: bool,

    /// Build the `coverage` target (implies tests)
    pub code_coverage: bool,

    /// Build the `doc` target
    pub build_doc: bool,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        RecipeOptions {
            shared: true,
            fpic: true,
            build_tests: false,
            code_coverage: false,
            build_doc: false,
        }
    }
}

impl RecipeOptions {
    /// Option names as spelled on the command line.
    pub const NAMES: [&'static str; 5] =
        ["shared", "fPIC", "build_tests", "code_coverage", "build_doc"];

    /// Set an option from its textual value.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigurationError> {
        let slot = match name {
            "shared" => &mut self.shared,
            "fPIC" | "fpic" => &mut self.fpic,
            "build_tests" => &mut self.build_tests,
            "code_coverage" => &mut self.code_coverage,
            "build_doc" => &mut self.build_doc,
            _ => {
                return Err(ConfigurationError::UnknownOption {
                    name: name.to_string(),
                })
            }
        };
        *slot = parse_bool(name, value)?;
        Ok(())
    }

    /// Whether the test suite has to be buildable. Coverage runs the tests.
    pub fn tests_enabled(&self) -> bool {
        self.build_tests || self.code_coverage
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        let values = [
            self.shared,
            self.fpic,
            self.build_tests,
            self.code_coverage,
            self.build_doc,
        ];
        Self::NAMES.into_iter().zip(values)
    }
}

/// Host/target settings. Values are opaque identifiers and are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub os: String,
    pub compiler: String,
    pub build_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl Settings {
    /// Setting names as spelled on the command line.
    pub const NAMES: [&'static str; 4] = ["os", "compiler", "build_type", "arch"];

    /// Default settings for building natively on `platform`.
    pub fn for_platform(platform: &Platform) -> Self {
        let compiler = match platform.os.as_str() {
            "Windows" => "msvc",
            "Macos" => "apple-clang",
            _ => "gcc",
        };

        Settings {
            os: platform.os.clone(),
            compiler: compiler.to_string(),
            build_type: "Release".to_string(),
            arch: platform.arch.clone(),
        }
    }

    /// Set a setting from its textual value. An empty `arch` clears it.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigurationError> {
        match name {
            "os" => self.os = value.to_string(),
            "compiler" => self.compiler = value.to_string(),
            "build_type" => self.build_type = value.to_string(),
            "arch" => {
                self.arch = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            _ => {
                return Err(ConfigurationError::UnknownSetting {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    /// The architecture, if known.
    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref().filter(|a| !a.is_empty())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} compiler={} build_type={} arch={}",
            self.os,
            self.compiler,
            self.build_type,
            self.arch().unwrap_or("<unknown>")
        )
    }
}

/// Immutable options and settings for one recipe run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeConfig {
    options: RecipeOptions,
    settings: Settings,
}

impl RecipeConfig {
    /// Create a new recipe config.
    pub fn new(options: RecipeOptions, settings: Settings) -> Self {
        RecipeConfig { options, settings }
    }

    /// Get the options.
    pub fn options(&self) -> &RecipeOptions {
        &self.options
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Split a `name=value` assignment.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), ConfigurationError> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(ConfigurationError::InvalidAssignment {
            input: input.to_string(),
        }),
    }
}

/// Parse a boolean option value.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(ConfigurationError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults() {
        let opts = RecipeOptions::default();
        assert!(opts.shared);
        assert!(opts.fpic);
        assert!(!opts.build_tests);
        assert!(!opts.code_coverage);
        assert!(!opts.build_doc);
    }

    #[test]
    fn test_set_options() {
        let mut opts = RecipeOptions::default();
        opts.set("shared", "False").unwrap();
        opts.set("fPIC", "OFF").unwrap();
        opts.set("build_doc", "True").unwrap();
        opts.set("code_coverage", "1").unwrap();

        assert!(!opts.shared);
        assert!(!opts.fpic);
        assert!(opts.build_doc);
        assert!(opts.code_coverage);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut opts = RecipeOptions::default();
        let err = opts.set("with_gui", "True").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOption { .. }));
    }

    #[test]
    fn test_unknown_option_checked_before_value() {
        let mut opts = RecipeOptions::default();
        let err = opts.set("with_gui", "static").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownOption {
                name: "with_gui".to_string()
            }
        );
        assert_eq!(opts, RecipeOptions::default());
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let mut opts = RecipeOptions::default();
        let err = opts.set("shared", "maybe").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidBool {
                name: "shared".to_string(),
                value: "maybe".to_string()
            }
        );
    }

    #[test]
    fn test_tests_enabled() {
        for (build_tests, code_coverage, expected) in [
            (false, false, false),
            (true, false, true),
            (false, true, true),
            (true, true, true),
        ] {
            let opts = RecipeOptions {
                build_tests,
                code_coverage,
                ..RecipeOptions::default()
            };
            assert_eq!(opts.tests_enabled(), expected);
        }
    }

    #[test]
    fn test_options_iter_order() {
        let names: Vec<_> = RecipeOptions::default().iter().map(|(n, _)| n).collect();
        assert_eq!(names, RecipeOptions::NAMES);
    }

    #[test]
    fn test_settings_set_and_arch() {
        let mut settings = Settings::default();
        settings.set("os", "Linux").unwrap();
        settings.set("build_type", "Debug").unwrap();
        assert_eq!(settings.arch(), None);

        settings.set("arch", "armv8").unwrap();
        assert_eq!(settings.arch(), Some("armv8"));

        settings.set("arch", "").unwrap();
        assert_eq!(settings.arch(), None);

        assert!(settings.set("libc", "musl").is_err());
    }

    #[test]
    fn test_settings_for_platform() {
        let platform = Platform::new("Linux", Some("x86_64"));
        let settings = Settings::for_platform(&platform);
        assert_eq!(settings.os, "Linux");
        assert_eq!(settings.compiler, "gcc");
        assert_eq!(settings.build_type, "Release");
        assert_eq!(settings.arch(), Some("x86_64"));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("arch=x86_64").unwrap(), ("arch", "x86_64"));
        assert_eq!(parse_assignment("arch=").unwrap(), ("arch", ""));
        assert!(parse_assignment("arch").is_err());
        assert!(parse_assignment("=x86_64").is_err());
    }

    #[test]
    fn test_options_deserialize_fpic_spelling() {
        let opts: RecipeOptions = toml::from_str("fPIC = false\nbuild_doc = true").unwrap();
        assert!(!opts.fpic);
        assert!(opts.build_doc);
        assert!(opts.shared);
    }
}
