//! Global context for sfc-recipe operations.
//!
//! Provides centralized access to paths and output preferences.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

/// Environment variable overriding the sfc-recipe home directory.
pub const HOME_ENV: &str = "SFC_RECIPE_HOME";

/// Name of the project-local configuration directory.
pub const PROJECT_DIR_NAME: &str = ".sfc-recipe";

/// Project directories for sfc-recipe
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("fr", "ergen", "sfc-recipe"));

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global data (config, packages)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    ///
    /// The home directory is `SFC_RECIPE_HOME` when set, otherwise the
    /// platform data directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
            Some(home) => PathBuf::from(home),
            None => default_home(),
        };

        Ok(Self::at(cwd, home))
    }

    fn at(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext { cwd, home }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path for a recipe rooted at `root`.
    pub fn project_config_path(&self, root: &Path) -> PathBuf {
        root.join(PROJECT_DIR_NAME).join("config.toml")
    }

    /// Get the directory holding installed packages.
    pub fn packages_dir(&self) -> PathBuf {
        self.home.join("packages")
    }
}

fn default_home() -> PathBuf {
    if let Some(dirs) = PROJECT_DIRS.as_ref() {
        dirs.data_dir().to_path_buf()
    } else {
        // Fallback to ~/.sfc-recipe
        BaseDirs::new()
            .map(|b| b.home_dir().join(PROJECT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(PROJECT_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::at(PathBuf::from("/work"), tmp.path().to_path_buf());

        assert_eq!(ctx.cwd(), Path::new("/work"));
        assert_eq!(ctx.config_path(), tmp.path().join("config.toml"));
        assert_eq!(ctx.packages_dir(), tmp.path().join("packages"));
    }

    #[test]
    fn test_project_config_path() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert_eq!(
            ctx.project_config_path(Path::new("/src/sfc")),
            Path::new("/src/sfc/.sfc-recipe/config.toml")
        );
    }
}
