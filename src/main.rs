use anyhow::{Result, bail};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io;

mod api;
mod catalog;
mod cmd;
mod error;
mod registry;
mod utils;

use api::{Invoker, RootConfig};
use cmd::OutputOpts;

/// scylla-cli - command tree generated from REST endpoint descriptors
///
/// Layout:
///   scylla-cli [-a HOST] [-p PORT] <namespace> <command> [--<flag> VALUE]...
///   scylla-cli list [--json]
///
/// Every namespace in the endpoint catalog becomes a subcommand group and
/// every endpoint a command inside it. Remote endpoints issue one HTTP GET to
/// http://HOST:PORT/<namespace><path> and print the status and raw body.
///
/// Global flags / env:
///   -a / --address  Target node (SCYLLA_API_ADDRESS), default localhost
///   -p / --port     REST API port (SCYLLA_API_PORT), default 10000
///   -v / -vv        Increase verbosity
///   -q / --quiet    Errors only
///   --json          Machine-readable output
///
/// Examples:
///   scylla-cli system uptime_ms
///   scylla-cli -a 10.0.0.5 gossiper endpoint-live
///   scylla-cli config config --id 7
#[derive(Parser, Debug)]
#[command(
    name = "scylla-cli",
    version,
    about = "scylla-cli - CLI generated from the node's REST API endpoints",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// IP address of server node
    #[arg(
        short = 'a',
        long,
        global = true,
        env = "SCYLLA_API_ADDRESS",
        default_value = api::DEFAULT_ADDRESS,
        value_name = "HOST"
    )]
    address: String,

    /// Api port
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "SCYLLA_API_PORT",
        default_value = api::DEFAULT_PORT,
        value_name = "PORT"
    )]
    port: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    json: bool,
}

fn main() -> Result<()> {
    // Catalog problems are fatal before anything is parsed.
    let catalog = catalog::builtin()?;
    let groups = registry::group(&catalog);
    let root = Cli::command()
        .subcommand(cmd::list::command())
        .subcommand_required(true)
        .arg_required_else_help(true);
    let mut tree = registry::build(root, &groups)?;

    let matches = tree.command_mut().get_matches_mut();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));
    tracing::debug!(
        descriptors = catalog.len(),
        groups = groups.len(),
        leaves = tree.len(),
        "loaded endpoint descriptors"
    );

    if tree.is_empty() {
        tracing::warn!("endpoint catalog is empty");
    }

    // Fixed once here, read by the invoker for the rest of the run.
    let config = RootConfig::new(cli.address, cli.port)?;
    tracing::debug!(base = %config.base_url(), "target configured");

    let opts = OutputOpts::new(cli.json);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches.subcommand_name() == Some(cmd::list::NAME) {
        return cmd::execute_list(&groups, &mut out, &opts);
    }

    let Some((descriptor, params)) = tree.resolve(&matches) else {
        bail!("no endpoint command selected");
    };
    let invoker = Invoker::new(config)?;
    cmd::execute_call(&invoker, descriptor, &params, &mut out, &opts)?;
    Ok(())
}
