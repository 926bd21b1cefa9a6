use anyhow::Context;
use lineage_auction::{AuctionRuntime, Invocation, Operation};
use lineage_types::{AuctionConfig, AuctionError, constants};

use crate::cli::{Cli, Command, InvokeArgs, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Invoke(args) => cmd_invoke(&cli, args),
        Command::Operations => {
            cmd_operations(&cli.format);
            Ok(())
        }
        Command::Status => cmd_status(&cli),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AuctionConfig> {
    match &cli.config {
        Some(path) => AuctionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AuctionConfig::default()),
    }
}

fn open_runtime(cli: &Cli) -> anyhow::Result<AuctionRuntime> {
    let config = load_config(cli)?;
    AuctionRuntime::open(&cli.state, config)
        .with_context(|| format!("opening ledger {}", cli.state.display()))
}

fn cmd_invoke(cli: &Cli, args: &InvokeArgs) -> anyhow::Result<()> {
    let runtime = open_runtime(cli)?;

    let invocation = match runtime.invoke(&args.operation, &args.args) {
        Ok(invocation) => invocation,
        Err(err) => return Err(caller_error(&err)),
    };

    if !invocation.receipt.write_keys.is_empty() {
        runtime
            .save(&cli.state)
            .with_context(|| format!("saving ledger {}", cli.state.display()))?;
        tracing::debug!(state = %cli.state.display(), height = invocation.receipt.height, "Ledger saved");
    }
    print_invocation(&cli.format, &invocation)
}

/// `<ErrorClass>: <message>`, the shape external callers match on.
fn caller_error(err: &AuctionError) -> anyhow::Error {
    anyhow::anyhow!("{}: {err}", err.kind())
}

fn print_invocation(format: &OutputFormat, invocation: &Invocation) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(payload) = &invocation.payload {
                println!("{}", String::from_utf8_lossy(payload));
            } else {
                println!("{}", invocation.receipt);
            }
        }
        OutputFormat::Json => {
            let payload = invocation
                .payload
                .as_deref()
                .map(|bytes| {
                    serde_json::from_slice::<serde_json::Value>(bytes).unwrap_or_else(|_| {
                        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
                    })
                });
            let out = serde_json::json!({
                "operation": invocation.operation.name(),
                "attempts": invocation.attempts,
                "receipt": invocation.receipt,
                "payload": payload,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_operations(format: &OutputFormat) {
    match format {
        OutputFormat::Text => {
            for op in Operation::ALL {
                println!("{:<14} {} args", op.name(), op.arity());
            }
        }
        OutputFormat::Json => {
            let ops: Vec<_> = Operation::ALL
                .iter()
                .map(|op| serde_json::json!({ "name": op.name(), "arity": op.arity() }))
                .collect();
            println!("{}", serde_json::Value::Array(ops));
        }
    }
}

fn cmd_status(cli: &Cli) -> anyhow::Result<()> {
    let runtime = open_runtime(cli)?;
    let ledger = runtime.ledger();
    let height = ledger.height()?;
    let keys = ledger.keys()?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", engine_banner());
            println!("Ledger: {}", cli.state.display());
            println!("Height: {height}");
            println!("Keys:   {}", keys.len());
            for key in &keys {
                let version = ledger.version(key)?.unwrap_or_default();
                println!("  {key} (v{version})");
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "engine": constants::ENGINE_NAME,
                "version": constants::VERSION,
                "height": height,
                "keys": keys,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn engine_banner() -> String {
    format!("{} {}", constants::ENGINE_NAME, constants::VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(state: &std::path::Path, rest: &[&str]) -> Cli {
        let mut argv = vec!["lineage", "--state", state.to_str().unwrap()];
        argv.extend_from_slice(rest);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn invoke_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");

        run_command(cli(&state, &["invoke", "initLedger"])).unwrap();
        run_command(cli(
            &state,
            &["invoke", "makeOffer", "4000", "ABCD", "memberB@lineagecodemember"],
        ))
        .unwrap();
        run_command(cli(&state, &["invoke", "closeBidding", "ABCD"])).unwrap();

        let runtime = AuctionRuntime::open(&state, AuctionConfig::default()).unwrap();
        assert_eq!(runtime.ledger().height().unwrap(), 3);
    }

    #[test]
    fn failure_reports_error_class() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");

        let err = run_command(cli(&state, &["invoke", "closeBidding", "ABCD"])).unwrap_err();
        assert!(err.to_string().starts_with("NotFoundError: "), "Got: {err}");
        assert!(!state.exists(), "failed invocation must not create a snapshot");
    }

    #[test]
    fn status_banner_names_engine_and_version() {
        let banner = engine_banner();
        assert!(banner.starts_with("Lineage "), "Got: {banner}");
        assert!(banner.ends_with(env!("CARGO_PKG_VERSION")), "Got: {banner}");
    }

    #[test]
    fn status_runs_on_fresh_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        run_command(cli(&state, &["--format", "json", "status"])).unwrap();
    }

    #[test]
    fn bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let config = dir.path().join("config.json");
        std::fs::write(&config, "{not json").unwrap();

        let err = run_command(cli(
            &state,
            &["--config", config.to_str().unwrap(), "status"],
        ))
        .unwrap_err();
        assert!(format!("{err:#}").contains("LA_ERR_900"), "Got: {err:#}");
    }
}
