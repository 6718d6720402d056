//! Command-line interface definitions for odfreport

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the odfreport application
#[derive(Parser)]
#[command(name = "odfreport")]
#[command(version)]
#[command(about = "Fill OpenDocument templates with data", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for odfreport
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a document from a TOML job file
    Generate {
        /// Job file describing the template and its values
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Template file (overrides `template` in the job)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file (overrides `output` in the job)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print bookmark and section texts of a document as TOML
    Extract {
        /// Document to read
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Bookmark to read (repeatable; all bookmarks when omitted)
        #[arg(long = "bookmark", value_name = "NAME")]
        bookmarks: Vec<String>,

        /// Section to read (repeatable; all sections when omitted)
        #[arg(long = "section", value_name = "NAME")]
        sections: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the style names that can be requested
    ListStyles,
}
