//! CLI entry point for narthex-enable.
//!
//! Prints each enabled actor and the store's raw response to stdout,
//! followed by the JSON run report. Logs go to stderr.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use narthex_core::OrgId;
use narthex_sparql::SparqlClient;

use narthex_enable::config::{load_config, AppConfig, FailurePolicy};
use narthex_enable::enabler::{enable_all_actors, EnableOptions};
use narthex_enable::error::Result;

#[derive(Parser)]
#[command(name = "narthex-enable")]
#[command(about = "Enable every actor of a Narthex organization in the triple store")]
#[command(
    long_about = "Enable every actor of a Narthex organization in the triple store.\n\n\
                  Actors can be disabled again via the Narthex user management interface."
)]
struct Cli {
    /// Organization id (the dataset name on the SPARQL server).
    org_id: String,

    /// Config file prefix (default: narthex).
    #[arg(short, long, default_value = "narthex")]
    config: String,

    /// Override the SPARQL server base URL (e.g., http://localhost:3030).
    #[arg(long)]
    base_url: Option<String>,

    /// Stop at the first failed actor instead of continuing.
    #[arg(long)]
    halt_on_error: bool,

    /// List actors without updating them.
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let (org_id, app_config, options) = apply_overrides(&cli, load_config(&cli.config)?)?;

    let client = SparqlClient::new(&app_config.sparql, &org_id)?;
    let report = enable_all_actors(&client, &org_id, &options, |actor, response| {
        println!("{actor}");
        println!("{response}");
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} of {} actors could not be enabled",
            report.failed.len(),
            report.attempted()
        );
    }
    if !report.rejected.is_empty() {
        anyhow::bail!(
            "{} of {} listed rows did not name a usable actor",
            report.rejected.len(),
            report.listed
        );
    }
    Ok(())
}

/// Validate the org id and lay command-line flags over the loaded config.
/// Flags win over file and environment values.
fn apply_overrides(
    cli: &Cli,
    mut app_config: AppConfig,
) -> Result<(OrgId, AppConfig, EnableOptions)> {
    let org_id = OrgId::parse(&cli.org_id)?;

    if let Some(base_url) = &cli.base_url {
        app_config.sparql.base_url = base_url.clone();
    }
    let options = EnableOptions {
        failure_policy: if cli.halt_on_error {
            FailurePolicy::Halt
        } else {
            app_config.enable.failure_policy
        },
        dry_run: cli.dry_run,
    };
    Ok((org_id, app_config, options))
}
