//! cvdoc CLI - DOCX text extraction and résumé formatting tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cvdoc::{
    render, ExtractOptions, Extractor, FormatOptions, Formatter, JsonFormat, StyleSheet,
};

#[derive(Parser)]
#[command(name = "cvdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract text from DOCX files and format markdown résumés as DOCX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text of every DOCX file in a directory
    Extract {
        /// Directory of DOCX files
        #[arg(value_name = "INPUT_DIR", env = "CVDOC_EXTRACT_INPUT", default_value = "upload")]
        input: PathBuf,

        /// Directory for the .txt files and the JSON record
        #[arg(
            value_name = "OUTPUT_DIR",
            env = "CVDOC_EXTRACT_OUTPUT",
            default_value = "source_analysis"
        )]
        output: PathBuf,

        /// File name of the JSON record
        #[arg(long, default_value = "all_documents.json")]
        aggregate: String,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Format every markdown résumé in a directory as DOCX
    #[command(alias = "fmt")]
    Format {
        /// Directory of markdown résumés
        #[arg(value_name = "INPUT_DIR", env = "CVDOC_FORMAT_INPUT", default_value = "final_cvs")]
        input: PathBuf,

        /// Directory for the generated DOCX files
        #[arg(
            value_name = "OUTPUT_DIR",
            env = "CVDOC_FORMAT_OUTPUT",
            default_value = "final_cvs/docx"
        )]
        output: PathBuf,

        /// Font used by every style
        #[arg(long, default_value = "Calibri")]
        font: String,

        /// Page margin in inches, at least 0 and under half the page width
        #[arg(long, default_value = "0.5")]
        margin: f32,
    },

    /// Print the text of one DOCX file
    Text {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            aggregate,
            compact,
        }) => cmd_extract(&input, &output, aggregate, compact),
        Some(Commands::Format {
            input,
            output,
            font,
            margin,
        }) => cmd_format(&input, &output, font, margin),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: cvdoc <COMMAND>".yellow());
            println!("       cvdoc --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    aggregate: String,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let options = ExtractOptions::new()
        .with_aggregate_name(aggregate)
        .with_json_format(format);
    let extractor = Extractor::new(options);
    log::debug!("Extracting {} -> {}", input.display(), output.display());

    let pb = progress_bar(extractor.inputs(input)?.len());
    pb.set_message("Extracting text...");
    let report = extractor.run_with_progress(input, output, |path| {
        pb.set_message(file_label(path));
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} documents ({} failed)",
        "Extracted".green().bold(),
        report.result.len(),
        report.failures()
    );
    for name in &report.failed {
        println!("  {} {}", "✗".red(), name);
    }
    if let Some(path) = report.aggregate_path() {
        println!("  {} {}", "└─".dimmed(), path.display());
    }

    Ok(())
}

fn cmd_format(
    input: &Path,
    output: &Path,
    font: String,
    margin: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let styles = StyleSheet::new().with_font(font).with_margin(margin);
    styles.validate()?;
    let formatter = Formatter::new(FormatOptions::new().with_styles(styles));
    log::debug!("Formatting {} -> {}", input.display(), output.display());

    let pb = progress_bar(formatter.inputs(input)?.len());
    pb.set_message("Formatting...");
    let report = formatter.run_with_progress(input, output, |path| {
        pb.set_message(file_label(path));
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let count = report.len();
    for (i, path) in report.outputs().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
    if report.is_empty() {
        println!("  {}", "(no markdown files found)".dimmed());
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = cvdoc::extract_text(input)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = cvdoc::detect_format_from_path(input)?;
    let doc = cvdoc::parse_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = render::to_text(&doc);
    let words: usize = text.split_whitespace().count();
    let chars = text.chars().count();
    let links: usize = doc.paragraphs().map(|p| p.links().count()).sum();

    println!("{}: {}", "Paragraphs".bold(), doc.paragraphs().count());
    println!("{}: {}", "Tables".bold(), doc.tables().count());
    println!("{}: {}", "Hyperlinks".bold(), links);
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), chars);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "cvdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX text extraction and résumé formatting");
    println!();
    println!("License: MIT");
}
