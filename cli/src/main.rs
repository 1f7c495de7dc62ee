//! docslice CLI - figure, table and per-page export for converted documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docslice::export::{extract_figures, output_stem, plan_page_figures, save_pages};
use docslice::{load_result, ConversionResult, Document, ExportOptions, Exporter, FigureOptions, Item};

#[derive(Parser)]
#[command(name = "docslice")]
#[command(version)]
#[command(about = "Export figures, tables and per-page Markdown/JSON from converted documents", long_about = None)]
struct Cli {
    /// Log debug messages (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every artifact of one or more conversion results
    Export {
        /// Conversion result JSON files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output root directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long, env = "PRETTY_JSON", value_parser = clap::builder::BoolishValueParser::new())]
        pretty: bool,

        #[command(flatten)]
        figures: FigureArgs,
    },

    /// Extract figure crops only
    Figures {
        /// Conversion result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output root directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        figures: FigureArgs,
    },

    /// Write per-page Markdown and element JSON only
    Pages {
        /// Conversion result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output root directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long, env = "PRETTY_JSON", value_parser = clap::builder::BoolishValueParser::new())]
        pretty: bool,
    },

    /// Show document information and planned figures
    Info {
        /// Conversion result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        figures: FigureArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct FigureArgs {
    /// Gap in pixels under which picture fragments are merged
    #[arg(long, default_value = "50")]
    cluster_threshold: f32,

    /// Minimum figure width and height in pixels
    #[arg(long, default_value = "150")]
    min_size: f32,

    /// Maximum distance in pixels to a heading above a figure
    #[arg(long, default_value = "200")]
    header_distance: f32,

    /// Padding in pixels around each figure
    #[arg(long, default_value = "20")]
    padding: f32,
}

impl From<&FigureArgs> for FigureOptions {
    fn from(args: &FigureArgs) -> Self {
        FigureOptions::new()
            .with_cluster_threshold(args.cluster_threshold)
            .with_min_size(args.min_size)
            .with_header_distance(args.header_distance)
            .with_padding(args.padding)
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Export {
            inputs,
            output,
            pretty,
            figures,
        } => cmd_export(&inputs, &output, pretty, (&figures).into()),
        Commands::Figures {
            input,
            output,
            figures,
        } => cmd_figures(&input, &output, (&figures).into()),
        Commands::Pages {
            input,
            output,
            pretty,
        } => cmd_pages(&input, &output, pretty),
        Commands::Info { input, figures } => cmd_info(&input, (&figures).into()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: u64) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Load a result and return its document, refusing unsuccessful conversions.
fn load_document(input: &Path) -> CliResult<(ConversionResult, Document)> {
    let result = load_result(input)?;
    if result.status != docslice::ConversionStatus::Success {
        return Err(docslice::Error::ConversionFailed {
            input: result.input.clone(),
            status: result.status,
        }
        .into());
    }
    let doc = result
        .document
        .clone()
        .ok_or_else(|| format!("{} contains no document", input.display()))?;
    Ok((result, doc))
}

fn cmd_export(inputs: &[PathBuf], output: &Path, pretty: bool, figures: FigureOptions) -> CliResult<()> {
    fs::create_dir_all(output)?;

    let pb = progress_bar(inputs.len() as u64)?;
    pb.set_message("Loading...");
    let mut results = Vec::with_capacity(inputs.len());
    let mut failures = 0;
    for input in inputs {
        match load_result(input) {
            Ok(result) => results.push(result),
            Err(e) => {
                pb.suspend(|| eprintln!("{} {}: {}", "Skipped".yellow(), input.display(), e));
                failures += 1;
            }
        }
        pb.inc(1);
    }

    pb.set_message("Exporting...");
    log::debug!("Exporting {} results to {}", results.len(), output.display());
    let options = ExportOptions::new()
        .with_pretty_json(pretty)
        .with_figures(figures);
    let reports = Exporter::new(options).save_all(&results, output);
    pb.finish_with_message("Done!");

    println!();
    for (result, report) in results.iter().zip(reports) {
        match report {
            Ok(report) => {
                println!("{} {}", "Saved".green().bold(), report.output_dir.display());
                println!("  {} {} elements", "├─".dimmed(), report.element_count);
                println!(
                    "  {} {} figures ({} too small, {} failed)",
                    "├─".dimmed(),
                    report.figures_saved,
                    report.figures_filtered,
                    report.figures_failed
                );
                println!(
                    "  {} {} table files ({} failed)",
                    "├─".dimmed(),
                    report.tables_written,
                    report.tables_failed
                );
                println!(
                    "  {} {} pages ({} failed)",
                    "└─".dimmed(),
                    report.pages_written,
                    report.pages_failed
                );
            }
            Err(e) => {
                println!("{} {}: {}", "Failed".red().bold(), result.input.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} inputs failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn cmd_figures(input: &Path, output: &Path, figures: FigureOptions) -> CliResult<()> {
    let (result, doc) = load_document(input)?;
    let stem = output_stem(&result.input);
    let figures_dir = output.join(format!("output_{}", stem)).join("figures");
    fs::create_dir_all(&figures_dir)?;

    let summary = extract_figures(&doc, &figures_dir, &stem, &figures);
    for path in &summary.saved {
        println!("{} {}", "Extracted".green(), path.display());
    }
    println!(
        "\n{} {} figures extracted from {} pages ({} too small, {} failed)",
        "Done!".green().bold(),
        summary.saved_count(),
        summary.pages_scanned,
        summary.filtered,
        summary.failed
    );
    Ok(())
}

fn cmd_pages(input: &Path, output: &Path, pretty: bool) -> CliResult<()> {
    let (result, doc) = load_document(input)?;
    let stem = output_stem(&result.input);
    let pages_dir = output.join(format!("output_{}", stem)).join("pages");
    fs::create_dir_all(&pages_dir)?;

    let format = ExportOptions::new().with_pretty_json(pretty).json_format;
    let summary = save_pages(&doc, &pages_dir, &stem, format);
    println!(
        "{} {} of {} pages written to {} ({} failed)",
        "Done!".green().bold(),
        summary.written,
        doc.page_count(),
        pages_dir.display(),
        summary.failed
    );
    Ok(())
}

fn cmd_info(input: &Path, figures: FigureOptions) -> CliResult<()> {
    let result = load_result(input)?;

    println!("{}", "Conversion Result".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Input".bold(), result.input.display());
    println!("{}: {}", "Status".bold(), result.status);
    for err in &result.errors {
        println!("{}: {}", "Error".red().bold(), err);
    }

    let Some(ref doc) = result.document else {
        return Ok(());
    };

    let count = |f: fn(&Item) -> bool| doc.items.iter().filter(|i| f(i)).count();
    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Items".bold(), doc.items.len());
    println!("{}: {}", "Headings".bold(), count(|i| matches!(i, Item::SectionHeader(_))));
    println!("{}: {}", "Text".bold(), count(|i| matches!(i, Item::Text(_))));
    println!("{}: {}", "List items".bold(), count(|i| matches!(i, Item::ListItem(_))));
    println!("{}: {}", "Tables".bold(), count(Item::is_table));
    println!("{}: {}", "Pictures".bold(), count(Item::is_picture));
    println!("{}: {}", "Unplaced".bold(), count(|i| i.prov().is_none()));

    println!();
    println!("{}", "Planned Figures".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in doc.pages.values() {
        let (width, height) = match page.raster {
            Some(ref raster) => (raster.width() as f32, raster.height() as f32),
            None => page.dimensions(),
        };
        let plans = plan_page_figures(doc, page.page_no, width, height, &figures);
        if plans.is_empty() {
            continue;
        }
        let raster_note = if page.raster.is_some() { "" } else { " (no raster)" };
        println!("{} {}{}", "Page".bold(), page.page_no, raster_note.dimmed());
        for plan in plans {
            println!("  {} #{} {}", "├─".dimmed(), plan.index, plan.region);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docslice".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Figure, table and per-page export for converted documents");
    println!();
    println!("Library: docslice {}", docslice::version());
    println!("License: MIT");
}
