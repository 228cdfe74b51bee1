mod args;
mod output;

use anyhow::{Context, Result};
use usercheck_lib::{Endpoint, MessageCatalog, UserCheckClient};

use std::io::{self, BufRead};

use crate::args::{Cli, Commands};
use crate::output::OutputRow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.check_combinations()?;

    let (values, forced) = match (&cli.cmd, cli.stdin) {
        (None, true) => {
            let mut values = Vec::new();
            for line in io::stdin().lock().lines() {
                let line = line.context("read stdin")?;
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    values.push(trimmed.to_string());
                }
            }
            (values, None)
        }
        (Some(Commands::Email { value }), _) => (vec![value.clone()], Some(Endpoint::Email)),
        (Some(Commands::Domain { value }), _) => (vec![value.clone()], Some(Endpoint::Domain)),
        (None, false) => {
            Cli::clap_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let client = UserCheckClient::new(cli.client_config()).context("configure UserCheck client")?;
    let catalog = MessageCatalog::english();
    let options = cli.block_options();
    // la sous-commande a priorité sur --domain-only
    let endpoint = forced.unwrap_or_else(|| Endpoint::for_mode(options.domain_only));

    let mut rows = Vec::with_capacity(values.len());
    for value in values {
        let outcome = match endpoint {
            Endpoint::Email => client.validate_email(&value, &options),
            Endpoint::Domain => client.validate_domain(&value, &options),
        }
        .with_context(|| format!("check {value}"))?;
        rows.push(OutputRow::new(value, endpoint, outcome, &catalog, &cli.attribute));
    }

    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 invalides, 1 fatal
    if output::any_invalid(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(feature = "with-tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(not(feature = "with-tracing"))]
fn init_tracing() {}
