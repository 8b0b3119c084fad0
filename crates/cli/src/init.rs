use clap::Args;
use dialoguer::Confirm;
use gogen_common::{init_local_config, local_config_path};
use tracing::debug;

use crate::common::{hint_line, run_cli_async, success_line, warn_line};

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        long,
        short = 'f',
        help = "Overwrite an existing .apirc.json without asking"
    )]
    pub force: bool,
}

pub async fn run(args: InitArgs) -> i32 {
    run_cli_async(|| async move { run_inner(&args) }).await
}

fn run_inner(args: &InitArgs) -> Result<(), String> {
    let dir = std::env::current_dir()
        .map_err(|err| format!("Failed to read current directory: {err}"))?;
    let path = local_config_path(&dir);

    if path.exists() && !args.force {
        let overwrite = Confirm::new()
            .with_prompt(".apirc.json already exists. Overwrite it?")
            .default(false)
            .interact()
            .map_err(|err| format!("Failed to read overwrite choice: {err}"))?;
        if !overwrite {
            warn_line("Cancelled");
            return Ok(());
        }
    }

    match init_local_config(&dir, true).map_err(|err| err.to_string())? {
        Some(created) => {
            debug!(path = %created.display(), "Project config written.");
            success_line(format!("Created {}", created.display()));
            hint_line("Edit requestModule, typePrefix and apiPrefix to match your project");
        }
        None => warn_line("Project config was left unchanged"),
    }
    Ok(())
}
