//! coshh CLI - safety-data-sheet PDFs to a COSHH spreadsheet

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use coshh::{
    BatchConfig, Coshh, ErrorMode, ExtractOptions, OcrPolicy, OutputFormat, TesseractOcr,
    TextOrigin,
};

#[derive(Parser)]
#[command(name = "coshh")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract COSHH hazard fields from safety-data-sheet PDFs into a spreadsheet", long_about = None)]
struct Cli {
    /// Directory containing the PDFs (default: the directory of this program)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Output file (default: DIR/COSHH_output.xlsx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, else xlsx)
    #[arg(long, value_enum)]
    format: Option<TableFormat>,

    /// Number of documents processed in parallel
    #[arg(short, long, default_value = "1", env = "COSHH_JOBS")]
    jobs: usize,

    /// Keep directory-listing order instead of sorting by file name
    #[arg(long)]
    unsorted: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extracted text of one PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show which pages came from OCR
        #[arg(long)]
        pages: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the record extracted from one PDF as JSON
    Fields {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct ExtractArgs {
    /// OCR raster resolution
    #[arg(long, default_value = "300")]
    dpi: u32,

    /// Tesseract language code
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode
    #[arg(long, default_value = "6")]
    psm: u8,

    /// When to OCR pages without embedded text
    #[arg(long, value_enum, default_value = "per-page")]
    ocr: OcrMode,

    /// Fail the file when a page's text cannot be decoded (default: OCR that page)
    #[arg(long)]
    strict: bool,
}

impl ExtractArgs {
    fn coshh(&self) -> Coshh {
        let error_mode = if self.strict {
            ErrorMode::Strict
        } else {
            ErrorMode::Lenient
        };
        let options = ExtractOptions::new()
            .with_error_mode(error_mode)
            .with_dpi(self.dpi)
            .with_language(self.lang.clone())
            .with_page_segmentation(self.psm)
            .with_ocr_policy(self.ocr.into());
        Coshh::new().with_options(options)
    }

    /// Warn up front when OCR is enabled but its tools are missing.
    fn check_ocr_tools(&self) {
        if self.ocr != OcrMode::Off && !TesseractOcr::new().is_available() {
            eprintln!(
                "{} pdftoppm or tesseract not found on PATH; scanned pages will fail",
                "Warning:".yellow().bold()
            );
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OcrMode {
    /// OCR every page without embedded text
    PerPage,
    /// OCR only documents with no embedded text at all
    WholeDocument,
    /// Never OCR
    Off,
}

impl From<OcrMode> for OcrPolicy {
    fn from(mode: OcrMode) -> Self {
        match mode {
            OcrMode::PerPage => OcrPolicy::PerPage,
            OcrMode::WholeDocument => OcrPolicy::WholeDocument,
            OcrMode::Off => OcrPolicy::Disabled,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableFormat {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
    /// JSON array
    Json,
}

impl From<TableFormat> for OutputFormat {
    fn from(format: TableFormat) -> Self {
        match format {
            TableFormat::Xlsx => OutputFormat::Xlsx,
            TableFormat::Csv => OutputFormat::Csv,
            TableFormat::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Text {
            input,
            pages,
            extract,
        }) => cmd_text(input, *pages, extract),
        Some(Commands::Fields {
            input,
            compact,
            extract,
        }) => cmd_fields(input, *compact, extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_run(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn batch_config(cli: &Cli) -> Result<BatchConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.dir {
        Some(dir) => BatchConfig::new(dir),
        None => BatchConfig::for_program_dir()?,
    };

    if let Some(output) = &cli.output {
        config = config.with_output(output);
    }

    let format = cli
        .format
        .map(OutputFormat::from)
        .or_else(|| OutputFormat::from_path(&config.output_path))
        .unwrap_or_default();
    config = config.with_format(format).with_jobs(cli.jobs);

    if cli.unsorted {
        config = config.unsorted();
    }
    Ok(config)
}

fn cmd_run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = batch_config(cli)?;
    cli.extract.check_ocr_tools();
    let runner = cli.extract.coshh().runner(config);

    let total = runner.discover()?.len();
    println!(
        "{} {} PDF file(s) in {}",
        "Found".cyan(),
        total,
        runner.config().input_dir.display()
    );

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = runner.run_with_progress(&|path, _| {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        pb.set_message(name.into_owned());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    // Per-file failures were already logged by the runner.
    println!(
        "{} {} processed, {} failed",
        "Done!".green().bold(),
        report.records.len(),
        report.failures.len()
    );
    println!(
        "{} {}",
        "Extraction complete. Output saved to".green(),
        report.output_path.display()
    );

    Ok(())
}

fn cmd_text(
    input: &Path,
    pages: bool,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extract.coshh().extract_text(input)?;

    if pages {
        for page in &result.pages {
            let origin = match page.origin {
                TextOrigin::Embedded => "embedded".normal(),
                TextOrigin::Ocr => "ocr".yellow(),
            };
            eprintln!(
                "{} {:>4}  {:<8}  {} chars",
                "Page".bold(),
                page.number,
                origin,
                page.chars
            );
        }
        eprintln!();
    }

    print!("{}", result.text);
    Ok(())
}

fn cmd_fields(
    input: &Path,
    compact: bool,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = extract.coshh().process_file(input)?;

    let json = if compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "coshh".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("COSHH safety-data-sheet extraction tool");
    println!();
    let ocr = if TesseractOcr::new().is_available() {
        "available".green()
    } else {
        "missing (install poppler-utils and tesseract)".yellow()
    };
    println!("OCR tools (pdftoppm, tesseract): {}", ocr);
    println!("License: MIT");
}
