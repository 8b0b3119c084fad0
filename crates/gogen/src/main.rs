use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "GOGEN_LOG";
const CRATES: [&str; 3] = ["gogen_core", "gogen_cli", "gogen_common"];

fn main() {
    init_tracing();
    std::process::exit(gogen_cli::run_cli(std::env::args().collect()));
}

fn init_tracing() {
    // GOGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "gogen_core=debug,reqwest=info"
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_levels_expand_to_every_crate() {
        assert!(is_plain_level("DEBUG"));
        assert!(!is_plain_level("gogen_core=debug"));
        assert_eq!(
            crate_filter("info"),
            "gogen_core=info,gogen_cli=info,gogen_common=info"
        );
    }
}
