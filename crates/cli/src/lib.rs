//! Command tree and dispatch for the `go-gen` binary.

use clap::{CommandFactory, Parser, Subcommand};

mod common;
mod config;
mod fetch;
mod init;
mod openapi;

#[derive(Parser, Debug)]
#[command(
    name = "go-gen",
    version,
    about = "\x1b[33mgo-gen\x1b[0m turns JSON responses and OpenAPI documents into TypeScript types and request functions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 🌐 Fetch a live endpoint and generate types from its response
    Fetch(fetch::FetchArgs),
    /// 📄 Generate types and functions from an OpenAPI document
    Openapi(openapi::OpenapiArgs),
    /// 🎬 Create a project .apirc.json
    Init(init::InitArgs),
    /// ⚙️  Show or edit configuration
    Config(config::ConfigArgs),
}

pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Fetch(args)) => fetch::run(args).await,
            Some(Commands::Openapi(args)) => openapi::run(args).await,
            Some(Commands::Init(args)) => init::run(args).await,
            Some(Commands::Config(args)) => config::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn openapi_flags_parse() {
        let cli = Cli::try_parse_from(["go-gen", "openapi", "openapi.yaml", "-b", "--out", "gen"])
            .unwrap();
        let Some(Commands::Openapi(args)) = cli.command else {
            unreachable!("expected the openapi command");
        };
        assert_eq!(args.source, "openapi.yaml");
        assert!(args.batch);
        assert_eq!(args.out, Some(std::path::PathBuf::from("gen")));
    }

    #[test]
    fn config_flags_parse() {
        let cli = Cli::try_parse_from(["go-gen", "config", "--global"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config(config::ConfigArgs { global: true, show: false }))
        ));
    }

    #[test]
    fn openapi_requires_a_source() {
        assert!(Cli::try_parse_from(["go-gen", "openapi"]).is_err());
    }

    #[tokio::test]
    async fn unknown_commands_exit_with_usage_code() {
        assert_eq!(run_cli_async(vec!["go-gen".into(), "nope".into()]).await, 2);
    }
}
