//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use sfc_recipe::util::shell::ColorChoice;

/// sfc-recipe - build and package the sfc C++ library with CMake
#[derive(Parser)]
#[command(name = "sfc-recipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Directory containing the sfc CMakeLists.txt (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub recipe_dir: Option<PathBuf>,
}

/// Message output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageFormat {
    /// Human-readable output
    Human,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the version resolved from CMakeLists.txt
    Version,

    /// Show the build folder layout
    Layout(ConfigArgs),

    /// Show or write the generated CMake toolchain
    Toolchain(ToolchainArgs),

    /// Show the build plan without running it
    Plan(PlanArgs),

    /// Configure and build, including the doc and coverage targets when enabled
    Build(ConfigArgs),

    /// Install an existing build into the package folder
    Package(ConfigArgs),

    /// Build and package in one go
    Create(ConfigArgs),

    /// Show the package descriptor
    Info(ConfigArgs),

    /// Copy the exported sources to a folder
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options, settings and package folder overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Set a recipe option, e.g. `-o shared=False`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Set a setting, e.g. `-s build_type=Debug`
    #[arg(short = 's', long = "setting", value_name = "NAME=VALUE")]
    pub settings: Vec<String>,

    /// Install folder of the package
    #[arg(long, value_name = "DIR")]
    pub package_folder: Option<PathBuf>,
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write the toolchain file into the generators folder
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Include the install step
    #[arg(long)]
    pub package: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Destination folder
    pub dest: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
