//! Helpers shared by every command: spinners, styled output, output
//! directory selection and the Ctrl+C cancellation guard.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use console::style;
use dialoguer::{Input, Select};
use gogen_common::{Config, OutputLocation};
use gogen_core::WriteOutcome;
use gogen_core::path_guard::validate_path;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), String>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", style(err).red());
            1
        }
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

pub fn format_elapsed_ms(start: Instant) -> String {
    let elapsed = start.elapsed();
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    let seconds = elapsed.as_secs();
    let remaining_ms = elapsed.subsec_millis();
    format!("{seconds}s {remaining_ms}ms")
}

pub fn warn_line(message: impl std::fmt::Display) {
    println!("{}", style(message).yellow());
}

pub fn success_line(message: impl std::fmt::Display) {
    println!("{}", style(message).green());
}

pub fn hint_line(message: impl std::fmt::Display) {
    println!("{}", style(message).dim());
}

/// Cancels its token on Ctrl+C for as long as it is alive.
///
/// Dropping the guard stops listening, so every exit path of a request
/// tears the listener down.
#[derive(Debug)]
pub struct CtrlCGuard {
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl CtrlCGuard {
    pub fn install() -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let listener = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Ctrl+C received, cancelling request.");
                trigger.cancel();
            }
        });
        Self { token, listener }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for CtrlCGuard {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

fn desktop_dir() -> Result<PathBuf, String> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or_else(|| "Could not determine desktop directory".to_string())
}

fn current_dir() -> Result<PathBuf, String> {
    std::env::current_dir().map_err(|err| format!("Failed to read current directory: {err}"))
}

/// Ask where generated folders go, preselecting the configured location.
pub fn choose_output_dir(config: &Config, prompt: &str) -> Result<PathBuf, String> {
    let default_idx = match config.default_output_path {
        OutputLocation::Desktop => 0,
        OutputLocation::Current | OutputLocation::Ask => 1,
    };
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&["Desktop", "Current directory", "Custom path"])
        .default(default_idx)
        .interact()
        .map_err(|err| format!("Failed to select output directory: {err}"))?;

    match selection {
        0 => desktop_dir(),
        1 => current_dir(),
        _ => {
            let initial = current_dir()?.display().to_string();
            let custom = Input::<String>::new()
                .with_prompt("Save path")
                .default(initial)
                .validate_with(|input: &String| -> Result<(), String> {
                    let resolved = validate_path(input.trim()).map_err(|err| err.to_string())?;
                    if resolved.is_dir() {
                        Ok(())
                    } else {
                        Err("Path does not exist".to_string())
                    }
                })
                .interact_text()
                .map_err(|err| format!("Failed to read save path: {err}"))?;
            Ok(PathBuf::from(custom.trim()))
        }
    }
}

/// Resolve the non-interactive output directory from `--out` or config.
pub fn configured_output_dir(config: &Config, out: Option<PathBuf>) -> Result<Option<PathBuf>, String> {
    if let Some(out) = out {
        return Ok(Some(out));
    }
    match config.default_output_path {
        OutputLocation::Current => current_dir().map(Some),
        OutputLocation::Desktop => desktop_dir().map(Some),
        OutputLocation::Ask => Ok(None),
    }
}

/// Print the result of a write, surfacing skipped and renamed content.
pub fn report_outcome(outcome: &WriteOutcome, config: &Config, start: Instant) {
    if outcome.type_conflict {
        warn_line(format!(
            "Type name conflict detected, renamed the whole declaration group to {}",
            outcome.final_type_name
        ));
        if !outcome.renamed_types.is_empty() {
            hint_line(format!("   Includes: {}", outcome.renamed_types.join(", ")));
        }
    }
    if outcome.type_skipped {
        warn_line("All types already exist, types.ts unchanged");
    }
    if outcome.api_skipped {
        warn_line(format!(
            "API function {} already exists, api.ts unchanged",
            outcome.function_name
        ));
    }

    let elapsed = format_elapsed_ms(start);
    if outcome.is_noop() {
        warn_line(format!("Nothing new to write ({elapsed})"));
    } else if outcome.type_conflict {
        success_line(format!(
            "Generated with renamed types ({}) ({elapsed})",
            outcome.final_type_name
        ));
    } else if outcome.dir_existed {
        success_line(format!("Incremental write complete ({elapsed})"));
    } else {
        success_line(format!("Files generated ({elapsed})"));
    }
    println!("{} {}", style("Output directory:").cyan(), outcome.output_dir.display());

    if !config.type_prefix.is_empty() || !config.api_prefix.is_empty() {
        hint_line("Applied configured prefixes:");
        if !config.type_prefix.is_empty() {
            hint_line(format!("   Type prefix: {}", config.type_prefix));
        }
        if !config.api_prefix.is_empty() {
            hint_line(format!("   API prefix: {}", config.api_prefix));
        }
    }
}
