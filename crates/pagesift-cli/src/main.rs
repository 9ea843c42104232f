use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pagesift_core::config_file::load_config;
use pagesift_core::terms::parse_terms_with;
use pagesift_core::{
    CaseLocale, FilterOutcome, FilterRequest, MatchMode, PdfBackend, Settings, TermSpec,
    normalize_with, run_filter,
};
use pagesift_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

const DEFAULT_OUTPUT: &str = "filtrirano.pdf";

/// PageSift - keep only the PDF pages that mention your keywords
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter a PDF down to the pages matching the given terms
    Filter {
        /// Path to the source PDF
        file_path: PathBuf,

        /// Term every kept page must contain (repeatable)
        #[arg(long = "required", conflicts_with_all = ["terms", "mode"])]
        required: Vec<String>,

        /// Term of which a kept page must contain at least one (repeatable)
        #[arg(long = "optional", conflicts_with_all = ["terms", "mode"])]
        optional: Vec<String>,

        /// Delimited term list (separated by newlines, commas, semicolons or pipes)
        #[arg(long)]
        terms: Option<String>,

        /// How --terms combine: "any" or "all"
        #[arg(long)]
        mode: Option<String>,

        /// Print ranked page snippets instead of writing a PDF
        #[arg(long)]
        preview: bool,

        /// Path of the filtered PDF (default: filtrirano.pdf). With --preview,
        /// the ranked preview PDF is written here when given
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Filter {
            file_path,
            required,
            optional,
            terms,
            mode,
            preview,
            output,
            no_color,
        } => {
            let settings = Settings::from_env(&load_config());
            let spec = build_spec(required, optional, terms, mode, settings.locale)?;
            let request = FilterRequest::new(spec, preview)?;
            let mut stdout = std::io::stdout();
            let matched = filter(
                &file_path,
                &MupdfBackend::new(),
                &request,
                &settings,
                output,
                &mut stdout,
                ColorMode(!no_color),
            )?;
            stdout.flush()?;
            if !matched {
                std::process::exit(2);
            }
            Ok(())
        }
    }
}

/// Build the term spec from CLI flags, normalized with `locale`.
fn build_spec(
    required: Vec<String>,
    optional: Vec<String>,
    terms: Option<String>,
    mode: Option<String>,
    locale: CaseLocale,
) -> anyhow::Result<TermSpec> {
    if !required.is_empty() || !optional.is_empty() {
        return Ok(TermSpec::required_optional(
            normalize_all(&required, locale),
            normalize_all(&optional, locale),
        ));
    }

    let mode = match mode.as_deref() {
        Some(raw) => raw.parse::<MatchMode>()?,
        None => MatchMode::default(),
    };
    Ok(TermSpec::with_mode(
        parse_terms_with(terms.as_deref().unwrap_or(""), locale),
        mode,
    ))
}

fn normalize_all(terms: &[String], locale: CaseLocale) -> Vec<String> {
    terms
        .iter()
        .map(|t| normalize_with(t, locale))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Run the pipeline and report to `w`. Returns `false` when no page matched.
fn filter(
    file_path: &Path,
    backend: &dyn PdfBackend,
    request: &FilterRequest,
    settings: &Settings,
    output: Option<PathBuf>,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<bool> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let source_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let outcome = run_filter(file_path, backend, request, &settings.filter_options())?;

    match outcome {
        FilterOutcome::NoMatch { total_pages } => {
            output::print_no_match(w, &source_name, total_pages, color)?;
            return Ok(false);
        }
        FilterOutcome::Preview(report) => {
            output::print_preview(w, &source_name, &report, color)?;
            if let Some(out_path) = output {
                std::fs::write(&out_path, &report.preview_pdf)?;
                output::print_preview_written(w, &out_path, report.count, color)?;
            }
        }
        FilterOutcome::Document(document) => {
            let out_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            std::fs::write(&out_path, &document.bytes)?;
            output::print_written(w, &out_path, &document, color)?;
        }
    }
    Ok(true)
}
