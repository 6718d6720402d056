//! odfreport - fill OpenDocument templates with data
//!
//! Command-line front end: runs TOML job files against ODF templates and
//! reads bookmark/section values back out of filled documents.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use odfreport::{BookmarkReader, Report, ReportConfig, SectionReader, StyleToken};
use std::path::{Path, PathBuf};

/// Main entry point for the odfreport CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            job,
            template,
            output,
            verbose,
        } => {
            init_logging(verbose);
            handle_generate_command(&job, template, output)?;
        }

        Commands::Extract {
            template,
            bookmarks,
            sections,
            verbose,
        } => {
            init_logging(verbose);
            handle_extract_command(&template, bookmarks, sections)?;
        }

        Commands::ListStyles => {
            handle_list_styles_command();
        }
    }

    Ok(())
}

/// Initialize logging; `--verbose` raises the level to info
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Handle the generate command
fn handle_generate_command(
    job: &Path,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = ReportConfig::load(job)
        .with_context(|| format!("Failed to load job file {}", job.display()))?;
    let base_dir = job.parent().unwrap_or_else(|| Path::new("."));

    let template = template
        .or_else(|| config.template_path(base_dir))
        .context("No template given. Set `template` in the job file or pass --template")?;
    let output = output
        .or_else(|| config.output_path(base_dir))
        .context("No output given. Set `output` in the job file or pass --output")?;

    println!("Generating document...");
    println!("Template: {}", template.display());
    println!("Output: {}", output.display());

    let mut report = Report::open(&template)
        .with_context(|| format!("Failed to open template {}", template.display()))?;
    config
        .apply(&mut report, base_dir)
        .with_context(|| format!("Failed to apply job file {}", job.display()))?;
    report
        .generate_to(&output)
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    println!("\n✓ Successfully generated {}", output.display());
    Ok(())
}

/// Handle the extract command
fn handle_extract_command(
    template: &Path,
    bookmarks: Vec<String>,
    sections: Vec<String>,
) -> Result<()> {
    let report = Report::open(template)
        .with_context(|| format!("Failed to open {}", template.display()))?;

    let bookmark_readers = readers(bookmarks, BookmarkReader::named, BookmarkReader::all);
    let section_readers = readers(sections, SectionReader::named, SectionReader::all);

    let results = report
        .extract(&bookmark_readers, &section_readers)
        .with_context(|| format!("Failed to read {}", template.display()))?;
    let rendered = toml::to_string_pretty(&results).context("Failed to render results as TOML")?;
    print!("{}", rendered);
    Ok(())
}

/// One reader per requested name, or a single read-everything reader
fn readers<R>(names: Vec<String>, named: fn(String) -> R, all: fn() -> R) -> Vec<R> {
    if names.is_empty() {
        vec![all()]
    } else {
        names.into_iter().map(named).collect()
    }
}

/// Handle the list-styles command
fn handle_list_styles_command() {
    println!("Available styles:\n");
    for token in StyleToken::vocabulary() {
        println!("  {}", token);
    }
    println!();
    println!("Any other name is used verbatim as a paragraph style.");
}
