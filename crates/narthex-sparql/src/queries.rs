//! Read operations for actor records.

use serde::Serialize;

use narthex_core::{ActorIri, ACTORS_GRAPH, ACTOR_CLASS, ACTOR_ENABLED};

use crate::client::{SparqlEndpoint, SparqlError};
use crate::results::{QueryResults, RdfTerm};

/// SELECT every resource typed Actor in the Actors graph.
pub fn list_actors_query() -> String {
    format!(
        "SELECT ?actor
WHERE {{
  GRAPH <{ACTORS_GRAPH}> {{
    ?actor a <{ACTOR_CLASS}> .
  }}
}}"
    )
}

/// SELECT the `actorEnabled` values currently stored for one actor.
pub fn actor_enabled_query(actor: &ActorIri) -> String {
    format!(
        "SELECT ?enabled
WHERE {{
  VALUES ?actor {{ {actor} }}
  GRAPH <{ACTORS_GRAPH}> {{
    ?actor <{ACTOR_ENABLED}> ?enabled .
  }}
}}",
        actor = actor.to_sparql()
    )
}

/// A listing row that did not yield a usable actor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RejectedBinding {
    /// The bound term as returned by the store, if any.
    pub value: Option<String>,
    pub reason: String,
}

/// Result of [`list_actors`]: usable actors in store order, plus the rows
/// that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorListing {
    pub actors: Vec<ActorIri>,
    pub rejected: Vec<RejectedBinding>,
}

impl ActorListing {
    /// Rows returned by the store, usable or not.
    pub fn rows(&self) -> usize {
        self.actors.len() + self.rejected.len()
    }
}

/// List the organization's actors.
///
/// An empty graph yields an empty listing. Rows that do not carry a valid
/// actor IRI are logged and kept in [`ActorListing::rejected`].
pub async fn list_actors<E: SparqlEndpoint>(endpoint: &E) -> Result<ActorListing, SparqlError> {
    let results = endpoint.query(&list_actors_query()).await?;
    let listing = actors_from_results(&results);
    tracing::info!(
        count = listing.actors.len(),
        rejected = listing.rejected.len(),
        "Listed actors"
    );
    Ok(listing)
}

/// Every `actorEnabled` value stored for `actor` (normally exactly one).
pub async fn actor_enabled<E: SparqlEndpoint>(
    endpoint: &E,
    actor: &ActorIri,
) -> Result<Vec<RdfTerm>, SparqlError> {
    let results = endpoint.query(&actor_enabled_query(actor)).await?;
    Ok(results
        .solutions
        .into_iter()
        .filter_map(|mut s| s.remove("enabled"))
        .collect())
}

/// Extract actor IRIs from the `?actor` column.
pub fn actors_from_results(results: &QueryResults) -> ActorListing {
    let mut listing = ActorListing {
        actors: Vec::with_capacity(results.solutions.len()),
        rejected: Vec::new(),
    };
    for solution in &results.solutions {
        let Some(term) = solution.get("actor") else {
            tracing::warn!("Skipping result row without ?actor binding");
            listing.rejected.push(RejectedBinding {
                value: None,
                reason: "no ?actor binding".to_string(),
            });
            continue;
        };
        let Some(raw) = term.as_iri() else {
            tracing::warn!(term = %term, "Skipping non-IRI actor binding");
            listing.rejected.push(RejectedBinding {
                value: Some(term.to_string()),
                reason: "not an IRI".to_string(),
            });
            continue;
        };
        match ActorIri::parse(raw) {
            Ok(actor) => listing.actors.push(actor),
            Err(e) => {
                tracing::warn!(actor = %raw, error = %e, "Skipping unusable actor IRI");
                listing.rejected.push(RejectedBinding {
                    value: Some(raw.to_string()),
                    reason: e.to_string(),
                });
            }
        }
    }
    listing
}
