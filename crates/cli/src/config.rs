use clap::Args;
use console::style;
use dialoguer::{Confirm, Input, Select};
use gogen_common::{
    Config, OutputLocation, global_config_path, load_config, load_config_from, local_config_path,
    save_global_config,
};
use serde_json::Value;

use crate::common::{hint_line, run_cli_async, success_line};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, short = 's', help = "Show the effective configuration")]
    pub show: bool,
    #[arg(long, short = 'g', help = "Edit global preferences in ~/.apirc.json")]
    pub global: bool,
}

pub async fn run(args: ConfigArgs) -> i32 {
    run_cli_async(|| async move { run_inner(&args) }).await
}

fn run_inner(args: &ConfigArgs) -> Result<(), String> {
    if args.global {
        edit_global()
    } else {
        show()
    }
}

fn show() -> Result<(), String> {
    let global = global_config_path().map_err(|err| err.to_string())?;
    let local = std::env::current_dir()
        .map(|dir| local_config_path(&dir))
        .map_err(|err| format!("Failed to read current directory: {err}"))?;

    println!("{}", style("Config sources:").cyan());
    for (label, path) in [("global", &global), ("project", &local)] {
        let marker = if path.exists() {
            style("found").green()
        } else {
            style("missing").dim()
        };
        println!("  {label:<8} {} ({marker})", path.display());
    }

    println!("\n{}", style("Effective config:").cyan());
    for line in config_lines(&load_config()) {
        println!("  {line}");
    }

    println!();
    hint_line("Run `go-gen config --global` to edit global preferences");
    hint_line("Run `go-gen init` to create a project .apirc.json");
    Ok(())
}

/// Render each config key as `key: json`.
fn config_lines(config: &Config) -> Vec<String> {
    match serde_json::to_value(config) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect(),
        _ => Vec::new(),
    }
}

fn edit_global() -> Result<(), String> {
    let path = global_config_path().map_err(|err| err.to_string())?;
    let current = load_config_from(Some(&path), None);
    let updated = prompt_preferences(current)?;
    let saved = save_global_config(&updated).map_err(|err| err.to_string())?;
    success_line(format!("Saved global preferences to {}", saved.display()));
    Ok(())
}

const LOCATIONS: [OutputLocation; 3] = [
    OutputLocation::Current,
    OutputLocation::Desktop,
    OutputLocation::Ask,
];

fn prompt_preferences(mut config: Config) -> Result<Config, String> {
    let default_location = LOCATIONS
        .iter()
        .position(|location| *location == config.default_output_path)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Default output location")
        .items(&["Current directory", "Desktop", "Ask every time"])
        .default(default_location)
        .interact()
        .map_err(|err| format!("Failed to select output location: {err}"))?;
    config.default_output_path = LOCATIONS[selection];

    config.timeout = Input::<u64>::new()
        .with_prompt("Request timeout (ms)")
        .default(config.timeout)
        .interact_text()
        .map_err(|err| format!("Failed to read timeout: {err}"))?;

    config.auto_retry = Confirm::new()
        .with_prompt("Offer to retry failed requests?")
        .default(config.auto_retry)
        .interact()
        .map_err(|err| format!("Failed to read retry choice: {err}"))?;

    if config.auto_retry {
        config.max_retries = Input::<u32>::new()
            .with_prompt("Attempts per request")
            .default(config.max_retries)
            .interact_text()
            .map_err(|err| format!("Failed to read max retries: {err}"))?;
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn config_lines_use_camel_case_json() {
        let lines = config_lines(&Config::default());
        assert!(lines.contains(&"defaultOutputPath: \"current\"".to_string()));
        assert!(lines.contains(&"timeout: 10000".to_string()));
        assert!(lines.contains(&"requestModule: \"@/utils/request\"".to_string()));
        assert_eq!(lines.len(), 8);
    }
}
