use clap::Parser;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use viz_annotator::analyzer::AnnotateOptions;
use viz_annotator::annotate_html;
use viz_annotator::config::{AppConfig, PageConfig, load_config};
use viz_annotator::model::{PageRequest, SourceError, WriteError};
use viz_annotator::report::{PageReport, save_reports};
use viz_annotator::source::{AnySource, FileSource, HttpSource, PageSource};
use viz_annotator::writer::save_page;

#[derive(Parser, Debug)]
#[command(name = "viz-annotator", version, about = "Colour-code marked numeric cells in HTML pages")]
struct Args {
    /// HTML files or http(s) URLs to annotate
    inputs: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for annotated pages (named after their input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Overwrite local input files
    #[arg(long, conflicts_with = "out_dir")]
    in_place: bool,

    /// Write a JSON report of every annotation to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Treat inputs as HTML fragments instead of full documents
    #[arg(long)]
    fragment: bool,

    /// Append classes and glyphs again even if already present
    #[arg(long)]
    no_idempotent: bool,

    /// font-weight applied to classified elements
    #[arg(long)]
    emphasis: Option<String>,

    /// Log per-element decisions
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum PageError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("cannot write {0} in place: not a local file")]
    RemoteInPlace(String),
}

#[derive(Debug, Clone)]
enum Destination {
    Stdout,
    File(PathBuf),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let requests = config.requests();
    if requests.is_empty() {
        error!("No pages to annotate: pass inputs or list pages in the config");
        return ExitCode::from(2);
    }
    let destinations = match plan_destinations(&requests, &args) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let http = match HttpSource::new(&config.user_agent, Duration::from_secs(config.timeout_seconds)) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let source = AnySource::new(FileSource::new(), http);
    let options = config.annotate_options();

    info!("Pages to annotate: {}", requests.len());
    let tasks: Vec<_> = requests
        .iter()
        .zip(destinations)
        .map(|(request, destination)| {
            process_page(request, destination, &source, &options, config.fragment)
        })
        .collect();
    let results = join_all(tasks).await;

    let mut reports = Vec::new();
    let mut failed = 0;
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!("Failed to annotate {}: {}", request.input, e);
                failed += 1;
            }
        }
    }

    if let Some(path) = &args.report {
        match save_reports(path, &reports).await {
            Ok(()) => info!("Saved report: {}", path.display()),
            Err(e) => {
                error!("Report write failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if failed > 0 {
        warn!("{} of {} pages failed", failed, requests.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(emphasis) = &args.emphasis {
        config.emphasis = emphasis.clone();
    }
    if args.no_idempotent {
        config.idempotent = false;
    }
    if args.fragment {
        config.fragment = true;
    }
    config.pages.extend(args.inputs.iter().map(|input| PageConfig {
        input: input.clone(),
        output: None,
    }));
}

/// Picks where each page goes: its configured output, the input itself with
/// `--in-place`, `--out-dir`, or stdout when there is a single page.
/// Two pages may not share an output file.
fn plan_destinations(requests: &[PageRequest], args: &Args) -> Result<Vec<Destination>, String> {
    let single = requests.len() == 1;
    let destinations: Vec<Destination> = requests
        .iter()
        .map(|req| {
            if let Some(output) = &req.output {
                Ok(Destination::File(PathBuf::from(output)))
            } else if args.in_place {
                Ok(Destination::File(PathBuf::from(&req.input)))
            } else if let Some(dir) = &args.out_dir {
                Ok(Destination::File(dir.join(output_name(&req.input))))
            } else if single {
                Ok(Destination::Stdout)
            } else {
                Err(format!(
                    "No output for {}: use --out-dir, --in-place or a configured output",
                    req.input
                ))
            }
        })
        .collect::<Result<_, _>>()?;

    let mut seen = HashSet::new();
    for (req, destination) in requests.iter().zip(&destinations) {
        if let Destination::File(path) = destination {
            if !seen.insert(path) {
                return Err(format!(
                    "{} would overwrite another page's output {}",
                    req.input,
                    path.display()
                ));
            }
        }
    }
    Ok(destinations)
}

/// File name for a page written to the output directory.
fn output_name(input: &str) -> String {
    let trimmed = input.trim_end_matches('/');
    let name = if trimmed.contains("://") {
        trimmed
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split_once('/'))
            .map(|(_, path)| path.rsplit('/').next().unwrap_or_default())
            .map(|segment| segment.split(['?', '#']).next().unwrap_or_default())
            .unwrap_or_default()
    } else {
        Path::new(trimmed)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    };
    if name.is_empty() {
        "index.html".to_string()
    } else {
        name.to_string()
    }
}

/// Fetches, annotates and writes a single page.
async fn process_page(
    request: &PageRequest,
    destination: Destination,
    source: &AnySource,
    options: &AnnotateOptions,
    fragment: bool,
) -> Result<PageReport, PageError> {
    info!("Fetching page: {}", request.input);
    if request.is_remote() && matches!(&destination, Destination::File(p) if p == Path::new(&request.input)) {
        return Err(PageError::RemoteInPlace(request.input.clone()));
    }
    let html = source.fetch(request).await?;

    let (annotated, result) = annotate_html(&html, options, fragment);
    info!(
        "Annotated {}: {} elements, {} skipped",
        request.input,
        result.annotations.len(),
        result.skipped_total()
    );

    match destination {
        Destination::Stdout => println!("{annotated}"),
        Destination::File(path) => {
            save_page(&path, &annotated).await?;
            info!("Saved page: {}", path.display());
        }
    }

    Ok(PageReport::new(&request.input, result))
}
