use std::time::Instant;

use clap::Args;
use dialoguer::{Confirm, Input, Password, Select};
use gogen_common::{Config, load_config};
use gogen_core::fetch::{Auth, FetchOptions, FetchRequest, build_client, fetch_json, parse_url};
use gogen_core::naming::{pascal_case, upper_first};
use gogen_core::typegen::generate_endpoint_declarations;
use gogen_core::{GenError, HttpMethod, WriteRequest, write_files};
use serde_json::Value;
use tracing::debug;

use crate::common::{
    CtrlCGuard, choose_output_dir, hint_line, report_outcome, run_cli_async, spinner, warn_line,
};

const DEFAULT_BODY: &str = r#"{"name": "string", "id": 0}"#;

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {}

pub async fn run(_args: FetchArgs) -> i32 {
    run_cli_async(run_inner).await
}

async fn run_inner() -> Result<(), String> {
    let config = load_config();
    println!("Fetch mode\n");

    loop {
        let answers = prompt_request(&config)?;
        let start = Instant::now();
        match fetch_sample(&config, &answers).await {
            Ok(json) => return write_sample(&config, &answers, &json, start),
            Err(GenError::Cancelled) => {
                warn_line("Request cancelled");
                hint_line("You can start again or exit");
                return Err(GenError::Cancelled.to_string());
            }
            Err(err) => {
                eprintln!("Request failed: {err}");
                if config.auto_retry
                    && Confirm::new()
                        .with_prompt("Start over?")
                        .default(true)
                        .interact()
                        .map_err(|err| format!("Failed to read retry choice: {err}"))?
                {
                    continue;
                }
                hint_line("Check your network connection and the URL");
                return Err(err.to_string());
            }
        }
    }
}

/// Everything collected from the prompts for one request.
#[derive(Debug)]
struct Answers {
    request: FetchRequest,
    type_name: String,
    api_name: String,
}

fn prompt_request(config: &Config) -> Result<Answers, String> {
    let url = Input::<String>::new()
        .with_prompt("API URL")
        .validate_with(|input: &String| -> Result<(), String> {
            parse_url(input).map(|_| ()).map_err(|err| err.to_string())
        })
        .interact_text()
        .map_err(|err| format!("Failed to read URL: {err}"))?;
    let url = parse_url(&url).map_err(|err| err.to_string())?;

    let methods = HttpMethod::ALL;
    let default_method = config
        .default_method
        .parse::<HttpMethod>()
        .ok()
        .and_then(|m| methods.iter().position(|candidate| *candidate == m))
        .unwrap_or(0);
    let labels: Vec<&str> = methods.iter().map(HttpMethod::as_str).collect();
    let selection = Select::new()
        .with_prompt("Request method")
        .items(&labels)
        .default(default_method)
        .interact()
        .map_err(|err| format!("Failed to select method: {err}"))?;
    let method = methods[selection];

    let auth = match Select::new()
        .with_prompt("Authentication")
        .items(&["None", "Bearer token", "Cookie"])
        .default(0)
        .interact()
        .map_err(|err| format!("Failed to select authentication: {err}"))?
    {
        1 => Auth::Bearer(
            Password::new()
                .with_prompt("Bearer token")
                .interact()
                .map_err(|err| format!("Failed to read token: {err}"))?,
        ),
        2 => Auth::Cookie(
            Input::<String>::new()
                .with_prompt("Cookie")
                .interact_text()
                .map_err(|err| format!("Failed to read cookie: {err}"))?,
        ),
        _ => Auth::None,
    };

    let body = if method.allows_body() { prompt_body()? } else { None };

    let type_name = Input::<String>::new()
        .with_prompt("Response type name")
        .default("ApiResponse".to_string())
        .interact_text()
        .map_err(|err| format!("Failed to read type name: {err}"))?;
    let api_name = Input::<String>::new()
        .with_prompt("API function name")
        .default("getData".to_string())
        .interact_text()
        .map_err(|err| format!("Failed to read function name: {err}"))?;

    let mut request = FetchRequest::new(url, method);
    request.auth = auth;
    request.body = body;

    Ok(Answers {
        request,
        type_name: upper_first(&pascal_case(type_name.trim())),
        api_name: api_name.trim().to_string(),
    })
}

fn prompt_body() -> Result<Option<Value>, String> {
    let needs_body = Confirm::new()
        .with_prompt("Does this endpoint take a request body?")
        .default(false)
        .interact()
        .map_err(|err| format!("Failed to read body choice: {err}"))?;
    if !needs_body {
        return Ok(None);
    }

    hint_line("Enter a JSON sample of the request body; it becomes the Request type");
    let raw = Input::<String>::new()
        .with_prompt("Request body JSON")
        .default(DEFAULT_BODY.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            serde_json::from_str::<Value>(input)
                .map(|_| ())
                .map_err(|_| "Please enter valid JSON".to_string())
        })
        .interact_text()
        .map_err(|err| format!("Failed to read request body: {err}"))?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| format!("Invalid request body JSON: {err}"))
}

async fn fetch_sample(config: &Config, answers: &Answers) -> Result<Value, GenError> {
    let client = build_client()?;
    let options = FetchOptions {
        timeout_ms: config.timeout,
        max_retries: config.max_retries,
    };

    hint_line("Press Ctrl+C to cancel the request");
    let fetch_spinner = spinner("Requesting API data...");
    let result = {
        let guard = CtrlCGuard::install();
        fetch_json(&client, &answers.request, options, guard.token()).await
    };
    fetch_spinner.finish_and_clear();
    debug!(url = %answers.request.url, ok = result.is_ok(), "Fetch finished.");
    result
}

fn write_sample(config: &Config, answers: &Answers, json: &Value, start: Instant) -> Result<(), String> {
    let types_content =
        generate_endpoint_declarations(json, answers.request.body.as_ref(), &answers.type_name);

    let base_dir = choose_output_dir(config, "Output directory")?;
    let mut write = WriteRequest::new(
        base_dir,
        &answers.api_name,
        &answers.type_name,
        answers.request.url.as_str(),
        types_content,
    )
    .with_config(config);
    write.method = answers.request.method;
    write.has_request_body = answers.request.body.is_some();

    let outcome = write_files(&write).map_err(|err| format!("Failed to write files: {err}"))?;
    report_outcome(&outcome, config, start);
    Ok(())
}
