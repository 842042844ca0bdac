//! Build folder layout.
//!
//! The standard CMake layout puts build output in `build/<build_type>` with
//! generated files under `generators`. When the architecture is known the
//! build folder is renamed so builds for different targets can live side by
//! side.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::settings::Settings;

/// Output folders, relative to the recipe root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLayout {
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub generators_folder: PathBuf,
}

impl BuildLayout {
    /// The standard CMake layout, before any override.
    pub fn standard(settings: &Settings) -> Self {
        let build_folder = if settings.build_type.is_empty() {
            PathBuf::from("build")
        } else {
            Path::new("build").join(&settings.build_type)
        };
        let generators_folder = build_folder.join("generators");

        BuildLayout {
            source_folder: PathBuf::from("."),
            build_folder,
            generators_folder,
        }
    }

    /// Plan the layout for `settings`.
    pub fn plan(settings: &Settings) -> Self {
        let mut layout = Self::standard(settings);

        if let Some(arch) = settings.arch() {
            layout.build_folder = Path::new("build").join(format!(
                "{}-{}-{}-conan-build",
                settings.os, settings.build_type, arch
            ));
            layout.generators_folder = layout.build_folder.join("conan");
        }

        layout
    }

    /// The same layout with every folder anchored at `root`.
    pub fn anchored(&self, root: &Path) -> Self {
        BuildLayout {
            source_folder: root.join(&self.source_folder),
            build_folder: root.join(&self.build_folder),
            generators_folder: root.join(&self.generators_folder),
        }
    }
}
