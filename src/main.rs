use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use invitro_leads::output;
use invitro_leads::pipeline::{self, StageEvent};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "invitro-leads")]
#[command(about = "Find and rank 3D in-vitro toxicology sales leads", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/invitro-leads/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the CSV here instead of a timestamped file in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the PubMed search and use only the local datasets
    #[arg(long)]
    offline: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_FAILURE);
    }

    let cli = Cli::parse();
    invitro_leads::logging::init_tracing(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config = match invitro_leads::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    // Validate config at startup
    if let Err(errors) = invitro_leads::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_FAILURE);
    }

    debug!(
        queries = config.literature.queries.len(),
        conference = %config.conference.name,
        "Configuration loaded"
    );

    let sources = match invitro_leads::sources::from_config(&config, !cli.offline) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Source setup error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let use_colors = !cli.no_color && output::should_use_colors();

    println!();
    println!(
        "{}",
        output::format_banner("3D IN-VITRO MODELS LEAD GENERATION", use_colors)
    );
    println!();

    let outcome = pipeline::run(&sources, |event| match event {
        StageEvent::Started { stage, name } => {
            println!("{}", output::format_stage_heading(stage, name, use_colors));
        }
        StageEvent::Finished { report, .. } => {
            println!("{}", output::format_stage_result(report, use_colors));
            for error in &report.errors {
                println!("    {}", error);
            }
            println!();
        }
    })
    .await;

    info!(
        collected = outcome.collected,
        unique = outcome.ranked.len(),
        "Leads deduplicated and ranked"
    );

    println!(
        "{}",
        output::format_banner(
            &format!(
                "SCAN COMPLETE: {} unique leads identified and ranked",
                outcome.ranked.len()
            ),
            use_colors
        )
    );
    println!();
    println!("TOP {} HIGHEST PRIORITY LEADS:", output::TOP_LEADS);
    println!();
    println!(
        "{}",
        output::format_top_leads(&outcome.ranked, output::TOP_LEADS, use_colors)
    );
    println!();

    let export_path = cli
        .output
        .unwrap_or_else(|| output::default_export_path(&config.output.directory));

    if let Err(e) = output::write_csv(&export_path, &outcome.ranked) {
        eprintln!("Export error: {:#}", e);
        std::process::exit(EXIT_FAILURE);
    }

    println!("CSV exported: {}", export_path.display());
    println!("{}", output::format_tier_summary(&outcome.ranked, use_colors));
    println!();
    println!("Your lead list is ready: {}", export_path.display());

    debug!(elapsed = ?start_time.elapsed(), "Run finished");

    std::process::exit(EXIT_SUCCESS);
}
