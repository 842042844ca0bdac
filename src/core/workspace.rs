//! Workspace - central configuration hub.
//!
//! A RecipeWorkspace is one evaluation of the recipe: the loaded recipe,
//! its effective options and settings, the build machine, and every path
//! derived from them. Options and settings are applied in order of
//! increasing precedence: defaults, config files, command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::cmake::CMakeTool;
use crate::builder::layout::BuildLayout;
use crate::builder::plan::BuildPlan;
use crate::builder::tool::ToolError;
use crate::builder::toolchain::{BuildEnvironment, ToolchainGenerator, ToolchainVariables};
use crate::core::platform::{is_cross_building, Platform};
use crate::core::recipe::Recipe;
use crate::core::settings::{parse_assignment, RecipeConfig, RecipeOptions, Settings};
use crate::util::config::{load_config, Config};
use crate::util::process::resolve_program;
use crate::util::GlobalContext;

/// Command line overrides.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `name=value` option assignments
    pub options: Vec<String>,
    /// `name=value` setting assignments
    pub settings: Vec<String>,
    /// Install folder
    pub package_folder: Option<PathBuf>,
}

/// One evaluation of the recipe.
#[derive(Debug)]
pub struct RecipeWorkspace {
    recipe: Recipe,
    config: RecipeConfig,
    file_config: Config,
    build_platform: Platform,
    cross_building: bool,
    layout: BuildLayout,
    package_folder: PathBuf,
    env: BuildEnvironment,
}

impl RecipeWorkspace {
    /// Load the recipe rooted at `root` with the merged global and project
    /// config and the process environment.
    pub fn load(ctx: &GlobalContext, root: &Path, overrides: &Overrides) -> Result<Self> {
        let recipe = Recipe::load(root)?;
        let file_config = load_config(&ctx.config_path(), &ctx.project_config_path(root));

        Self::from_parts(
            recipe,
            file_config,
            overrides,
            &ctx.packages_dir(),
            BuildEnvironment::from_env(),
        )
    }

    /// Assemble a workspace from already loaded parts.
    pub fn from_parts(
        recipe: Recipe,
        file_config: Config,
        overrides: &Overrides,
        packages_dir: &Path,
        env: BuildEnvironment,
    ) -> Result<Self> {
        let build_platform = file_config.build_platform();

        let mut settings = Settings::for_platform(&build_platform);
        file_config
            .apply_settings(&mut settings)
            .context("invalid [settings] in config")?;
        for assignment in &overrides.settings {
            let (name, value) = parse_assignment(assignment)?;
            settings.set(name, value)?;
        }

        let mut options = RecipeOptions::default();
        file_config
            .apply_options(&mut options)
            .context("invalid [options] in config")?;
        for assignment in &overrides.options {
            let (name, value) = parse_assignment(assignment)?;
            options.set(name, value)?;
        }

        let cross_building = is_cross_building(&settings, &build_platform);
        let layout = BuildLayout::plan(&settings);
        let config = RecipeConfig::new(options, settings);

        let package_folder = match (&overrides.package_folder, &file_config.package.folder) {
            (Some(folder), _) => folder.clone(),
            (None, Some(folder)) => recipe.root().join(folder),
            (None, None) => packages_dir
                .join(Recipe::NAME)
                .join(recipe.version().to_string())
                .join(recipe.package_id(&config)),
        };

        tracing::debug!(
            "evaluated {} for {} on {} (cross-building: {})",
            recipe.reference(),
            config.settings(),
            build_platform,
            cross_building
        );

        Ok(RecipeWorkspace {
            recipe,
            config,
            file_config,
            build_platform,
            cross_building,
            layout,
            package_folder,
            env,
        })
    }

    /// Get the recipe.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Effective options and settings.
    pub fn config(&self) -> &RecipeConfig {
        &self.config
    }

    /// The merged config files.
    pub fn file_config(&self) -> &Config {
        &self.file_config
    }

    /// The machine the build runs on.
    pub fn build_platform(&self) -> &Platform {
        &self.build_platform
    }

    /// Whether target and build machine differ.
    pub fn is_cross_building(&self) -> bool {
        self.cross_building
    }

    /// Build layout relative to the recipe root.
    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    /// Build layout anchored at the recipe root.
    pub fn anchored_layout(&self) -> BuildLayout {
        self.layout.anchored(self.recipe.root())
    }

    /// Install folder of the binary package.
    pub fn package_folder(&self) -> &Path {
        &self.package_folder
    }

    /// Binary package identifier.
    pub fn package_id(&self) -> String {
        self.recipe.package_id(&self.config)
    }

    /// Generate the toolchain variables.
    pub fn toolchain(&self) -> ToolchainVariables {
        ToolchainGenerator::new(&self.config, &self.package_folder)
            .cross_building(self.cross_building)
            .environment(self.env.clone())
            .user_toolchain(self.file_config.toolchain.user_toolchain.iter().cloned())
            .generate()
    }

    /// Plan the build, optionally followed by install.
    pub fn build_plan(&self, install: bool) -> BuildPlan {
        let plan = BuildPlan::new(self.config.options(), self.cross_building);
        if install {
            plan.with_install()
        } else {
            plan
        }
    }

    /// Plan an install of an existing build.
    pub fn install_plan(&self) -> BuildPlan {
        BuildPlan::install_only(self.cross_building)
    }

    /// Create the CMake tool for this workspace.
    pub fn cmake_tool(&self) -> Result<CMakeTool, ToolError> {
        let layout = self.anchored_layout();
        let build_type = self.config.settings().build_type.clone();
        let install_prefix = self.package_folder.clone();

        let tool = match &self.file_config.cmake.program {
            Some(program) => {
                let program = resolve_program(program).ok_or_else(|| ToolError::NotFound {
                    tool: program.display().to_string(),
                })?;
                CMakeTool::with_program(program, layout, install_prefix, build_type)
            }
            None => CMakeTool::new(layout, install_prefix, build_type)?,
        };

        Ok(tool
            .generator(self.file_config.cmake.generator.clone())
            .jobs(self.file_config.cmake.jobs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plan::BuildStage;
    use crate::builder::toolchain::ToolchainValue;
    use crate::core::errors::ConfigurationError;
    use crate::test_support::fixtures::cmake_lists;

    fn recipe() -> Recipe {
        Recipe::from_text(Path::new("/src/sfc"), &cmake_lists(1, 2, 3)).unwrap()
    }

    fn linux_build_machine() -> Config {
        let mut config = Config::default();
        config.build_settings.os = Some("Linux".to_string());
        config.build_settings.arch = Some("x86_64".to_string());
        config
    }

    fn workspace(config: Config, overrides: &Overrides) -> RecipeWorkspace {
        RecipeWorkspace::from_parts(
            recipe(),
            config,
            overrides,
            Path::new("/home/me/.sfc-recipe/packages"),
            BuildEnvironment::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_native_defaults() {
        let ws = workspace(linux_build_machine(), &Overrides::default());

        assert!(!ws.is_cross_building());
        assert_eq!(ws.config().settings().os, "Linux");
        assert_eq!(ws.config().settings().build_type, "Release");
        assert_eq!(
            ws.layout().build_folder,
            Path::new("build/Linux-Release-x86_64-conan-build")
        );
        assert_eq!(
            ws.package_folder(),
            Path::new("/home/me/.sfc-recipe/packages/sfc/1.2.3").join(ws.package_id())
        );
        assert_eq!(
            ws.build_plan(true).stages(),
            [BuildStage::Configured, BuildStage::Built, BuildStage::Installed]
        );
    }

    #[test]
    fn test_command_line_overrides_config() {
        let mut config = linux_build_machine();
        config.settings.insert("build_type".to_string(), "Debug".to_string());
        config
            .options
            .insert("build_doc".to_string(), toml::Value::Boolean(true));

        let overrides = Overrides {
            options: vec!["build_doc=False".to_string(), "shared=0".to_string()],
            settings: vec!["build_type=RelWithDebInfo".to_string()],
            package_folder: Some(PathBuf::from("/tmp/pkg")),
        };
        let ws = workspace(config, &overrides);

        assert!(!ws.config().options().build_doc);
        assert!(!ws.config().options().shared);
        assert_eq!(ws.config().settings().build_type, "RelWithDebInfo");
        assert_eq!(ws.package_folder(), Path::new("/tmp/pkg"));
        assert_eq!(
            ws.toolchain().get("BASE_INSTALL_DIR"),
            Some(&ToolchainValue::Path(PathBuf::from("/tmp/pkg")))
        );
    }

    #[test]
    fn test_cross_build_from_settings() {
        let overrides = Overrides {
            options: vec!["build_doc=True".to_string(), "code_coverage=True".to_string()],
            settings: vec!["arch=armv8".to_string()],
            package_folder: None,
        };
        let ws = workspace(linux_build_machine(), &overrides);

        assert!(ws.is_cross_building());
        assert_eq!(
            ws.build_plan(false).stages(),
            [BuildStage::Configured, BuildStage::Built]
        );
        assert_eq!(ws.toolchain().get_bool("BUILD_TESTS"), Some(true));
    }

    #[test]
    fn test_oe_sysroot_reaches_toolchain() {
        let overrides = Overrides {
            settings: vec!["arch=armv7".to_string()],
            ..Overrides::default()
        };
        let mut config = linux_build_machine();
        config.toolchain.user_toolchain = vec![PathBuf::from("/opt/base.cmake")];

        let ws = RecipeWorkspace::from_parts(
            recipe(),
            config,
            &overrides,
            Path::new("/packages"),
            BuildEnvironment::default().with_native_sysroot("/sdk/sysroots/x86_64-oesdk-linux"),
        )
        .unwrap();

        assert_eq!(
            ws.toolchain().user_toolchain(),
            [
                PathBuf::from("/opt/base.cmake"),
                PathBuf::from(
                    "/sdk/sysroots/x86_64-oesdk-linux/usr/share/cmake/OEToolchainConfig.cmake"
                )
            ]
        );
    }

    #[test]
    fn test_project_package_folder_is_relative_to_root() {
        let mut config = linux_build_machine();
        config.package.folder = Some(PathBuf::from("dist"));

        let ws = workspace(config, &Overrides::default());
        assert_eq!(ws.package_folder(), Path::new("/src/sfc/dist"));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let overrides = Overrides {
            options: vec!["with_python=True".to_string()],
            ..Overrides::default()
        };
        let err = RecipeWorkspace::from_parts(
            recipe(),
            linux_build_machine(),
            &overrides,
            Path::new("/packages"),
            BuildEnvironment::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_configured_cmake_program() {
        let mut config = linux_build_machine();
        config.cmake.program = Some(PathBuf::from("/opt/cmake/bin/cmake"));
        config.cmake.generator = Some("Ninja".to_string());

        let ws = workspace(config, &Overrides::default());
        let tool = ws.cmake_tool().unwrap();

        assert_eq!(tool.program(), Path::new("/opt/cmake/bin/cmake"));
        assert!(tool.configure_args().contains(&"Ninja".to_string()));
    }
}
