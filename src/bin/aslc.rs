// src/bin/aslc.rs

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use aslc::cli::{Cli, Commands};
use aslc::commands::check::check_files;
use aslc::commands::compile::compile_file;
use aslc::commands::version::print_version;

fn main() -> ExitCode {
    // Initialize tracing if ASLC_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("ASLC_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    aslc::errors::init_color(cli.color);

    match cli.command {
        Commands::Check { files } => check_files(&files),
        Commands::Compile { file, output } => compile_file(&file, output.as_deref()),
        Commands::Version => print_version(),
    }
}
