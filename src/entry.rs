use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::args::{DEFAULT_CONFIG_JSON, DEFAULT_CONFIG_TOML, TesterArgs};
use crate::config::{apply_config, load_config};
use crate::coordinator::{RunHandle, start_run};
use crate::domain::Form;
use crate::error::AppResult;
use crate::report::{drain_results, print_summary};
use crate::request::RequestSpec;
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::verify::VerifierRegistry;

/// Parses the command line, loads config, runs the load and prints a summary.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the request cannot
/// be built, or the runtime fails.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON]
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let raw_request = args.raw_request().inspect_err(|err| error!("{}", err))?;
    let registry = VerifierRegistry::with_builtins();
    let spec = Arc::new(RequestSpec::build(&registry, raw_request)?);
    info!("Request:\n{}", spec.describe());

    let plan = args.run_plan();
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let RunHandle {
        results,
        supervisor,
    } = match start_run(&spec, &plan, &shutdown_tx) {
        Ok(handle) => handle,
        Err(err) => {
            drop(shutdown_tx.send(()));
            drop(signal_handle.await);
            return Err(err);
        }
    };

    let tally = drain_results(results).await;
    print_summary(&tally);

    if spec.form == Form::WebSocket && plan.keep_alive {
        info!(
            "Holding {} connections open; press Ctrl+C to close them",
            plan.concurrency
        );
    }

    let supervised = supervisor.await;
    drop(shutdown_tx.send(()));
    signal_handle.await?;
    supervised?;
    Ok(())
}
