//! CMake adapter implementing [`BuildTool`].

use std::path::{Path, PathBuf};

use crate::builder::layout::BuildLayout;
use crate::builder::tool::{BuildTool, ToolError};
use crate::builder::toolchain::{ToolchainVariables, TOOLCHAIN_FILE_NAME};
use crate::util::process::{find_cmake, ProcessBuilder};

/// Drives the `cmake` command line.
#[derive(Debug, Clone)]
pub struct CMakeTool {
    program: PathBuf,
    layout: BuildLayout,
    install_prefix: PathBuf,
    build_type: String,
    generator: Option<String>,
    jobs: Option<usize>,
}

impl CMakeTool {
    /// Create a CMake tool found in PATH.
    ///
    /// `layout` must be anchored at the recipe root.
    pub fn new(
        layout: BuildLayout,
        install_prefix: PathBuf,
        build_type: impl Into<String>,
    ) -> Result<Self, ToolError> {
        let program = find_cmake().ok_or_else(|| ToolError::NotFound {
            tool: "cmake".to_string(),
        })?;
        Ok(Self::with_program(program, layout, install_prefix, build_type))
    }

    /// Create a CMake tool using a specific executable.
    pub fn with_program(
        program: impl Into<PathBuf>,
        layout: BuildLayout,
        install_prefix: PathBuf,
        build_type: impl Into<String>,
    ) -> Self {
        CMakeTool {
            program: program.into(),
            layout,
            install_prefix,
            build_type: build_type.into(),
            generator: None,
            jobs: None,
        }
    }

    /// Set the CMake generator (`-G`).
    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    /// Limit the number of parallel jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Get the program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Path of the toolchain file passed at configure time.
    pub fn toolchain_file(&self) -> PathBuf {
        self.layout.generators_folder.join(TOOLCHAIN_FILE_NAME)
    }

    /// Arguments of the configure step.
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.layout.source_folder.display().to_string(),
            "-B".to_string(),
            self.layout.build_folder.display().to_string(),
        ];

        if let Some(ref generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }

        args.push(format!(
            "-DCMAKE_TOOLCHAIN_FILE={}",
            self.toolchain_file().display()
        ));

        // Build type (for single-config generators)
        if !self.build_type.is_empty() {
            args.push(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        }

        args.push(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            self.install_prefix.display()
        ));

        args
    }

    /// Arguments of a build step.
    pub fn build_args(&self, target: Option<&str>, parallel: bool) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            self.layout.build_folder.display().to_string(),
        ];

        // Configuration (for multi-config generators like Visual Studio)
        if !self.build_type.is_empty() {
            args.push("--config".to_string());
            args.push(self.build_type.clone());
        }

        if let Some(target) = target {
            args.push("--target".to_string());
            args.push(target.to_string());
        }

        if parallel {
            args.push("--parallel".to_string());
            if let Some(jobs) = self.jobs {
                args.push(jobs.to_string());
            }
        } else {
            args.push("--parallel".to_string());
            args.push("1".to_string());
        }

        args
    }

    /// Arguments of the install step.
    pub fn install_args(&self) -> Vec<String> {
        let mut args = vec![
            "--install".to_string(),
            self.layout.build_folder.display().to_string(),
        ];

        if !self.build_type.is_empty() {
            args.push("--config".to_string());
            args.push(self.build_type.clone());
        }

        args.push("--prefix".to_string());
        args.push(self.install_prefix.display().to_string());

        args
    }

    fn run(&self, args: Vec<String>) -> Result<(), ToolError> {
        let cmd = ProcessBuilder::new(&self.program)
            .args(&args)
            .cwd(&self.layout.source_folder);
        tracing::debug!("running `{}`", cmd.display_command());

        let output = cmd.exec().map_err(|e| ToolError::Launch {
            command: cmd.display_command(),
            reason: format!("{:#}", e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            tracing::debug!("{}", line);
        }

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: cmd.display_command(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl BuildTool for CMakeTool {
    fn configure(&mut self, vars: &ToolchainVariables) -> Result<(), ToolError> {
        vars.write(&self.layout.generators_folder)
            .map_err(|e| ToolError::Setup(format!("{:#}", e)))?;
        self.run(self.configure_args())
    }

    fn build_target(&mut self, target: Option<&str>, parallel: bool) -> Result<(), ToolError> {
        self.run(self.build_args(target, parallel))
    }

    fn install(&mut self) -> Result<(), ToolError> {
        self.run(self.install_args())
    }
}
