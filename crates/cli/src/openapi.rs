use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use dialoguer::{Confirm, Input, Select};
use gogen_common::{Config, load_config};
use gogen_core::fetch::build_client;
use gogen_core::naming::{pascal_case, upper_first};
use gogen_core::openapi::{Endpoint, OpenApiDocument, endpoints, load_document, write_endpoint};
use tracing::{debug, warn};

use crate::common::{
    choose_output_dir, configured_output_dir, format_elapsed_ms, hint_line, report_outcome,
    run_cli_async, spinner, success_line, warn_line,
};

#[derive(Args, Debug, Clone)]
pub struct OpenapiArgs {
    #[arg(
        value_name = "SOURCE",
        help = "OpenAPI document: an http(s) URL or a local .json/.yaml file"
    )]
    pub source: String,
    #[arg(
        long,
        short = 'b',
        help = "Generate every endpoint with automatic names, without prompting per endpoint"
    )]
    pub batch: bool,
    #[arg(
        long,
        short = 'o',
        value_name = "DIR",
        help = "Directory to generate into. Will prompt if not provided"
    )]
    pub out: Option<PathBuf>,
}

pub async fn run(args: OpenapiArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: OpenapiArgs) -> Result<(), String> {
    let config = load_config();
    println!("OpenAPI mode\n");

    let load_spinner = spinner("Reading OpenAPI document...");
    let client = build_client().map_err(|err| err.to_string())?;
    let loaded = load_document(&client, &args.source).await;
    load_spinner.finish_and_clear();
    let document = match loaded {
        Ok(document) => document,
        Err(err) => {
            hint_line("Check the file path or URL");
            return Err(format!("Failed to read OpenAPI document: {err}"));
        }
    };
    success_line("OpenAPI document loaded");

    let found = endpoints(&document);
    if found.is_empty() {
        warn_line("No endpoints with a 200 application/json response were found");
        return Ok(());
    }

    let batch = args.batch
        || Select::new()
            .with_prompt(format!("Found {} endpoints, choose a generation mode", found.len()))
            .items(&["One by one (custom names)", "Batch (automatic names)"])
            .default(0)
            .interact()
            .map_err(|err| format!("Failed to select generation mode: {err}"))?
            == 1;

    if batch {
        let base_dir = match configured_output_dir(&config, args.out)? {
            Some(dir) => dir,
            None => choose_output_dir(&config, "Output directory (used for every endpoint)")?,
        };
        run_batch(&document, &found, &base_dir, &config);
        Ok(())
    } else {
        run_manual(&document, &found, args.out, &config)
    }
}

/// Summary of a batch run.
#[derive(Debug, Default, PartialEq, Eq)]
struct BatchReport {
    succeeded: usize,
    failed: usize,
}

fn run_batch(document: &OpenApiDocument, found: &[Endpoint], base_dir: &Path, config: &Config) {
    let start = Instant::now();
    let progress = spinner("Generating...");
    let mut report = BatchReport::default();

    for (index, endpoint) in found.iter().enumerate() {
        progress.set_message(format!(
            "Generating ({}/{}): {} {}",
            index + 1,
            found.len(),
            endpoint.method,
            endpoint.url
        ));
        let api_name = endpoint.default_function_name();
        let type_name = endpoint.default_type_name();
        match write_endpoint(document, endpoint, base_dir, &api_name, &type_name, config) {
            Ok(outcome) => {
                debug!(output_dir = %outcome.output_dir.display(), "Endpoint generated.");
                report.succeeded += 1;
            }
            Err(err) => {
                warn!(url = %endpoint.url, error = %err, "Endpoint generation failed.");
                progress.suspend(|| {
                    warn_line(format!("Skipped {} {}: {err}", endpoint.method, endpoint.url));
                });
                report.failed += 1;
            }
        }
    }
    progress.finish_and_clear();

    success_line(format!(
        "Batch generation complete! Succeeded: {}, failed: {} ({})",
        report.succeeded,
        report.failed,
        format_elapsed_ms(start)
    ));
    println!("{} {}\n", style("Output directory:").cyan(), base_dir.display());
}

fn run_manual(
    document: &OpenApiDocument,
    found: &[Endpoint],
    out: Option<PathBuf>,
    config: &Config,
) -> Result<(), String> {
    let shared_dir = match out {
        Some(out) => Some(out),
        None => {
            let same_dir = Confirm::new()
                .with_prompt("Use the same output directory for every endpoint?")
                .default(true)
                .interact()
                .map_err(|err| format!("Failed to read directory choice: {err}"))?;
            if same_dir {
                Some(choose_output_dir(config, "Output directory")?)
            } else {
                None
            }
        }
    };

    for (index, endpoint) in found.iter().enumerate() {
        println!(
            "\n{}",
            style(format!(
                "[{}/{}] {} {}",
                index + 1,
                found.len(),
                endpoint.method,
                endpoint.url
            ))
            .cyan()
        );
        if let Some(summary) = &endpoint.summary {
            hint_line(format!("   {summary}"));
        }

        let api_name = Input::<String>::new()
            .with_prompt("API function name (leave empty to skip)")
            .default(endpoint.default_function_name())
            .allow_empty(true)
            .interact_text()
            .map_err(|err| format!("Failed to read function name: {err}"))?;
        let api_name = api_name.trim();
        if api_name.is_empty() {
            warn_line("Skipping this endpoint");
            continue;
        }

        let type_name = Input::<String>::new()
            .with_prompt("Response type name")
            .default(endpoint.default_type_name())
            .interact_text()
            .map_err(|err| format!("Failed to read type name: {err}"))?;
        let type_name = upper_first(&pascal_case(type_name.trim()));

        let start = Instant::now();
        let result = match &shared_dir {
            Some(dir) => Ok(dir.clone()),
            None => choose_output_dir(config, "Output directory"),
        }
        .and_then(|base_dir| {
            write_endpoint(document, endpoint, &base_dir, api_name, &type_name, config)
                .map_err(|err| err.to_string())
        });

        match result {
            Ok(outcome) => report_outcome(&outcome, config, start),
            Err(err) => {
                eprintln!("{}", style(format!("Generation failed: {err}")).red());
                let keep_going = Confirm::new()
                    .with_prompt("Continue with the remaining endpoints?")
                    .default(true)
                    .interact()
                    .map_err(|err| format!("Failed to read continue choice: {err}"))?;
                if !keep_going {
                    break;
                }
            }
        }
    }

    success_line("\nAll endpoints processed!");
    Ok(())
}
