// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// ASL compiler: type checking and three-address-code generation
#[derive(Parser)]
#[command(name = "aslc")]
#[command(version = "0.1.0")]
#[command(about = "ASL compiler", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check ASL source files for errors without generating code
    Check {
        /// Files to check
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
    /// Compile an ASL source file to three-address code
    Compile {
        /// Path to the .asl file to compile
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the generated code here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Print version information
    Version,
}
