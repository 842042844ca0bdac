//! sfc-recipe CLI - build and package the sfc library with CMake

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use sfc_recipe::core::{ConfigurationError, RecipeError};
use sfc_recipe::ops::BuildMode;
use sfc_recipe::util::diagnostic::{emit, Diagnostic};

fn main() {
    let cli = Cli::parse();
    let shell = commands::shell(&cli.global);

    if let Err(e) = run(cli) {
        if shell.is_json() {
            shell.error(format!("{:#}", e));
        } else {
            match diagnostic_for(&e) {
                Some(diag) => emit(&diag, shell.use_color()),
                None => eprintln!("error: {:#}", e),
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("sfc_recipe=debug")
    } else {
        EnvFilter::new("sfc_recipe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = &cli.global;

    // Execute command
    match cli.command {
        Commands::Version => commands::version::execute(global),
        Commands::Layout(args) => commands::layout::execute(args, global),
        Commands::Toolchain(args) => commands::toolchain::execute(args, global),
        Commands::Plan(args) => commands::plan::execute(args, global),
        Commands::Build(args) => commands::build::execute(args, global, BuildMode::Build),
        Commands::Package(args) => commands::build::execute(args, global, BuildMode::Package),
        Commands::Create(args) => commands::build::execute(args, global, BuildMode::Create),
        Commands::Info(args) => commands::info::execute(args, global),
        Commands::Export(args) => commands::export::execute(args, global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Structured diagnostic for recipe errors anywhere in the chain.
fn diagnostic_for(e: &anyhow::Error) -> Option<Diagnostic> {
    let outer = e.to_string();
    let diag = e.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<RecipeError>() {
            Some((err.to_diagnostic(), err.to_string()))
        } else {
            cause
                .downcast_ref::<ConfigurationError>()
                .map(|err| (err.to_diagnostic(), err.to_string()))
        }
    });

    diag.map(|(diag, inner)| {
        if inner != outer {
            diag.with_context(outer)
        } else {
            diag
        }
    })
}
