//! Command-line entry point for the job-market pipeline

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use jobmarket::algorithm::integration::{
    FixedPathResolver, IntegrationInputs, MacroSourceResolver, default_macro_resolver,
};
use jobmarket::error::util::safe_create_file;
use jobmarket::utils::logging::{create_spinner, finish_progress_bar, print_table_summary};
use jobmarket::{PipelineConfig, describe, run_all, run_cleaning, run_integration};

#[derive(Parser)]
#[command(name = "jobmarket")]
#[command(about = "Build and clean the global data-analyst job-market dataset")]
struct Cli {
    /// Directory holding the input files and receiving the outputs
    #[arg(long, global = true)]
    dataset_dir: Option<PathBuf>,

    /// Write the stage report as JSON to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join scraped postings with country economics
    Integrate {
        #[arg(long)]
        postings: Option<PathBuf>,
        /// Macro salary source; by default the dataset directory is scanned
        #[arg(long = "macro")]
        macro_source: Option<PathBuf>,
        #[arg(long)]
        cost_of_living: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Filter and normalize a merged table
    Clean {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Descriptions shorter than this are dropped
        #[arg(long)]
        min_desc_length: Option<f64>,
    },

    /// Integrate then clean with the default file names
    Run,

    /// Print a summary of a cleaned table
    Describe {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn write_report<T: Serialize>(path: Option<&Path>, report: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = safe_create_file(path, "write JSON report")?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = PipelineConfig::from_env();
    if let Some(dir) = cli.dataset_dir {
        config = config.with_dataset_dir(dir);
    }
    info!("Working in {}", config.dataset_dir().display());
    debug!("{config}");

    match cli.command {
        Commands::Integrate {
            postings,
            macro_source,
            cost_of_living,
            output,
        } => {
            config.validate()?;
            let scan = default_macro_resolver(&config);
            let fixed = macro_source.map(FixedPathResolver);
            let resolver: &dyn MacroSourceResolver = match &fixed {
                Some(fixed) => fixed,
                None => &scan,
            };

            let mut inputs = IntegrationInputs::from_config(&config, resolver);
            if let Some(path) = postings {
                inputs.postings = path;
            }
            if let Some(path) = cost_of_living {
                inputs.cost_of_living = path;
            }
            let output = output.unwrap_or_else(|| config.merged_path());

            let start = Instant::now();
            let pb = create_spinner(Some("Integrating postings"));
            let (_, report) = run_integration(&inputs, &config, &output)
                .with_context(|| format!("Integration failed for {}", inputs.postings.display()))?;
            finish_progress_bar(&pb, Some(&format!("Merged {} rows", report.output_rows)));
            print_table_summary(&output, report.output_rows, &report.columns, start.elapsed());

            write_report(cli.report.as_deref(), &report)?;
        }
        Commands::Clean {
            input,
            output,
            min_desc_length,
        } => {
            if let Some(min) = min_desc_length {
                config.min_desc_length = min;
            }
            config.validate()?;
            let input = input.unwrap_or_else(|| config.merged_path());
            let output = output.unwrap_or_else(|| config.cleaned_path());

            let start = Instant::now();
            let pb = create_spinner(Some("Cleaning merged table"));
            let (_, report) = run_cleaning(&input, &output, &config)
                .with_context(|| format!("Cleaning failed for {}", input.display()))?;
            finish_progress_bar(&pb, Some(&format!("Kept {} rows", report.output_rows)));
            print_table_summary(&output, report.output_rows, &report.columns, start.elapsed());

            write_report(cli.report.as_deref(), &report)?;
        }
        Commands::Run => {
            let resolver = default_macro_resolver(&config);
            let pb = create_spinner(Some("Running pipeline"));
            let report = run_all(&config, &resolver).context("Pipeline failed")?;
            finish_progress_bar(&pb, Some("Pipeline complete"));

            println!("{}", report.summary);
            write_report(cli.report.as_deref(), &report)?;
        }
        Commands::Describe { input } => {
            let input = input.unwrap_or_else(|| config.cleaned_path());
            let summary = describe(&input, &config)
                .with_context(|| format!("Failed to summarize {}", input.display()))?;

            println!("{summary}");
            write_report(cli.report.as_deref(), &summary)?;
        }
    }

    Ok(())
}
