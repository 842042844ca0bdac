//! Implementation of `sfc-recipe export`.
//!
//! Copies the recipe's exported sources into a destination folder, keeping
//! their paths relative to the recipe root, and writes a checksum manifest.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::recipe::Recipe;
use crate::util::fs::{copy_file, glob_files, relative_path, write_string};
use crate::util::hash::sha256_file;

/// Name of the checksum manifest written next to the exported sources.
pub const MANIFEST_NAME: &str = "export_manifest.txt";

/// Result of an export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Exported files, relative to the destination
    pub files: Vec<PathBuf>,
    pub manifest: PathBuf,
}

/// Export the sources of `recipe` into `dest`.
pub fn export_sources(recipe: &Recipe, dest: &Path) -> Result<ExportResult> {
    let root = recipe.root();
    if dest == root {
        bail!("cannot export into the recipe root {}", root.display());
    }

    let matches = glob_files(root, &Recipe::EXPORTS_SOURCES)?;
    let mut files = Vec::with_capacity(matches.len());
    let mut manifest = String::new();

    for path in matches {
        // Exporting into the source tree must not pick up earlier exports.
        if path.starts_with(dest) {
            continue;
        }

        let rel = relative_path(root, &path);
        copy_file(&path, &dest.join(&rel))?;

        let _ = writeln!(
            manifest,
            "{}: {}",
            rel.display().to_string().replace('\\', "/"),
            sha256_file(&path)?
        );
        files.push(rel);
    }

    let manifest_path = dest.join(MANIFEST_NAME);
    write_string(&manifest_path, &manifest)?;
    tracing::debug!("exported {} files to {}", files.len(), dest.display());

    Ok(ExportResult {
        files,
        manifest: manifest_path,
    })
}
