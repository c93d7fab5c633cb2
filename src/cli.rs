use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-uniqueness")]
#[command(about = "Find Java classes provided by more than one jar and flag the ones whose bytes differ")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Maven repository used to resolve group:name:version coordinates
    #[arg(long, value_name = "PATH", global = true)]
    pub m2: Option<PathBuf>,

    /// Number of jars scanned concurrently
    #[arg(short = 'j', long, value_name = "N", global = true)]
    pub jobs: Option<usize>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Check a set of jars for classes they provide more than once
    Check {
        /// Jar paths or group:name:version coordinates
        #[arg(value_name = "ARTIFACT")]
        artifacts: Vec<String>,

        /// Also check every jar under this directory
        #[arg(long, value_name = "DIR")]
        path: Option<PathBuf>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Exit with an error when a shared class differs between jars
        #[arg(long)]
        fail_on_differing: bool,
    },
    /// List the classes of one jar with their content hashes
    Classes {
        #[arg(value_name = "ARTIFACT")]
        artifact: String,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
