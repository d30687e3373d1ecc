use std::path::PathBuf;

use clap::{Parser, Subcommand};

use weekplan::client::{EngineClient, Source};
use weekplan::config::{ClientConfig, ServerConfig};
use weekplan::display::{print_schedule, render_conflicts, write_schedule_to_file};
use weekplan::export::export_schedule_to_csv;
use weekplan::logging::init_logging;
use weekplan::parser::load_request;
use weekplan::schedule::{analyze_conflicts, GenerationResponse, PlanOutcome};

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Weekly timetable planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a timetable from a JSON request file
    Generate {
        request: PathBuf,
        #[command(flatten)]
        client: ClientConfig,
        /// Proceed even when the request sets proceedWithWarnings to false
        #[arg(long)]
        force: bool,
        /// Write the rendered timetable to a text file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the timetable as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the generation response as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Report conflicts without generating
    Check {
        request: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP service
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { request, client, force, output, csv, json } => {
            generate(request, client, force, output, csv, json).await
        }
        Commands::Check { request, json } => check(request, json),
        Commands::Serve { config } => weekplan::web::start_server(config)
            .await
            .map(|_| true)
            .map_err(Into::into),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns Ok(false) when generation was blocked by conflicts
async fn generate(
    request_path: PathBuf,
    client_config: ClientConfig,
    force: bool,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    json: bool,
) -> weekplan::Result<bool> {
    let mut request = load_request(&request_path)?;
    if force {
        request.proceed_with_warnings = true;
    }

    let client = EngineClient::new(&client_config)?;
    let (outcome, source) = client.generate(&request).await;
    if source == Source::LocalFallback {
        eprintln!("Remote engine unavailable; schedule generated locally as a best-effort fallback.");
    }

    let generated = match outcome {
        PlanOutcome::Scheduled(generated) => generated,
        PlanOutcome::Blocked(report) => {
            if json {
                let response = GenerationResponse::from(PlanOutcome::Blocked(report));
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", render_conflicts(&report));
            }
            return Ok(false);
        }
    };

    if let Some(path) = &output {
        write_schedule_to_file(&generated.schedule, &generated.stats, path)?;
    }
    if let Some(path) = &csv {
        export_schedule_to_csv(&generated.schedule, path)?;
    }

    if json {
        let response = GenerationResponse::from(PlanOutcome::Scheduled(generated));
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        if generated.conflicts.has_warnings() || !generated.conflicts.info.is_empty() {
            print!("{}", render_conflicts(&generated.conflicts));
            println!();
        }
        print_schedule(&generated.schedule, &generated.stats);
    }
    Ok(true)
}

fn check(request_path: PathBuf, json: bool) -> weekplan::Result<bool> {
    let request = load_request(&request_path)?;
    let report = analyze_conflicts(&request);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_conflicts(&report));
    }
    Ok(!report.has_critical)
}
