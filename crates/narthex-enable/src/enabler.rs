//! The enable run: list → update each actor → report.

use narthex_core::{ActorIri, OrgId};
use narthex_sparql::mutations::enable_actor;
use narthex_sparql::queries::list_actors;
use narthex_sparql::SparqlEndpoint;

use crate::config::FailurePolicy;
use crate::error::Result;
use crate::report::{ActorFailure, EnableReport};

/// Run-level switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnableOptions {
    pub failure_policy: FailurePolicy,
    /// List actors without sending any update.
    pub dry_run: bool,
}

/// Enable every actor of `org_id`, one update per actor, in listing order.
///
/// `on_response` receives each successfully enabled actor with the store's
/// raw response body. A failed listing is returned as an error; per-actor
/// failures and rejected listing rows are recorded in the report.
pub async fn enable_all_actors<E, F>(
    endpoint: &E,
    org_id: &OrgId,
    options: &EnableOptions,
    mut on_response: F,
) -> Result<EnableReport>
where
    E: SparqlEndpoint,
    F: FnMut(&ActorIri, &str),
{
    let started_at = chrono::Utc::now();
    let listing = list_actors(endpoint).await?;

    let mut report = EnableReport::new(org_id.clone(), listing.rows(), options.dry_run);
    report.started_at = started_at;
    report.rejected = listing.rejected;
    let actors = listing.actors;

    tracing::info!(
        run_id = %report.run_id,
        org_id = %org_id,
        actors = actors.len(),
        rejected = report.rejected.len(),
        dry_run = options.dry_run,
        "Starting enable run"
    );

    if options.dry_run {
        report.skipped = actors;
        report.finish();
        return Ok(report);
    }

    let mut remaining = actors.into_iter();
    while let Some(actor) = remaining.next() {
        match enable_actor(endpoint, &actor).await {
            Ok(response) => {
                tracing::info!(run_id = %report.run_id, actor = %actor, "Actor enabled");
                on_response(&actor, &response);
                report.enabled.push(actor);
            }
            Err(e) => {
                tracing::error!(
                    run_id = %report.run_id,
                    actor = %actor,
                    error = %e,
                    "Failed to enable actor"
                );
                report.failed.push(ActorFailure {
                    actor,
                    error: e.to_string(),
                });
                if options.failure_policy == FailurePolicy::Halt {
                    report.skipped.extend(remaining);
                    break;
                }
            }
        }
    }

    report.finish();
    tracing::info!(
        run_id = %report.run_id,
        org_id = %org_id,
        enabled = report.enabled.len(),
        failed = report.failed.len(),
        rejected = report.rejected.len(),
        skipped = report.skipped.len(),
        duration_ms = (report.finished_at - report.started_at).num_milliseconds(),
        "Enable run complete"
    );

    Ok(report)
}
