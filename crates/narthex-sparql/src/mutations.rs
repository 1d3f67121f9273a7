//! Write operations for actor records.
//!
//! The update text is fixed; the actor enters only through a `VALUES`
//! binding of an already validated [`ActorIri`]. Every update is gated on
//! the subject still being typed Actor, so other resources are never touched.

use narthex_core::{ActorIri, ACTORS_GRAPH, ACTOR_CLASS, ACTOR_ENABLED};

use crate::client::{SparqlEndpoint, SparqlError};

/// Replace every `actorEnabled` value of `actor` with `true`.
///
/// The DELETE matches any prior value (true, false, or anything else) so
/// the actor ends with exactly one triple, whatever the store held.
pub fn enable_actor_update(actor: &ActorIri) -> String {
    format!(
        "WITH <{ACTORS_GRAPH}>
DELETE {{
  ?actor <{ACTOR_ENABLED}> ?enabled .
}}
INSERT {{
  ?actor <{ACTOR_ENABLED}> true .
}}
WHERE {{
  VALUES ?actor {{ {actor} }}
  ?actor a <{ACTOR_CLASS}> .
  OPTIONAL {{ ?actor <{ACTOR_ENABLED}> ?enabled . }}
}}",
        actor = actor.to_sparql()
    )
}

/// Enable one actor. Returns the store's raw response body.
pub async fn enable_actor<E: SparqlEndpoint>(
    endpoint: &E,
    actor: &ActorIri,
) -> Result<String, SparqlError> {
    let response = endpoint.update(&enable_actor_update(actor)).await?;
    tracing::debug!(actor = %actor, "Actor enabled");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEndpoint;
    use crate::queries::{actor_enabled, list_actors};

    const ALICE: &str = "http://example.org/alice";
    const BOB: &str = "http://example.org/bob";
    const CAROL: &str = "http://example.org/carol";

    fn iri(raw: &str) -> ActorIri {
        ActorIri::parse(raw).unwrap()
    }

    fn seeded_store() -> MemoryEndpoint {
        let store = MemoryEndpoint::new().unwrap();
        store
            .load(&format!(
                "INSERT DATA {{
  GRAPH <{ACTORS_GRAPH}> {{
    <{ALICE}> a <{ACTOR_CLASS}> ; <{ACTOR_ENABLED}> false .
    <{BOB}> a <{ACTOR_CLASS}> .
    <{CAROL}> <{ACTOR_ENABLED}> false .
  }}
}}"
            ))
            .unwrap();
        store
    }

    async fn enabled_values(store: &MemoryEndpoint, actor: &str) -> Vec<Option<bool>> {
        actor_enabled(store, &iri(actor))
            .await
            .unwrap()
            .iter()
            .map(|t| t.as_bool())
            .collect()
    }

    #[test]
    fn test_update_text_binds_actor_once() {
        let update = enable_actor_update(&iri(ALICE));
        assert_eq!(update.matches("<http://example.org/alice>").count(), 1);
        assert!(update.contains("VALUES ?actor { <http://example.org/alice> }"));
        assert!(update.starts_with(
            "WITH <http://schemas.delving.eu/narthex/terms/Actors/graph>"
        ));
        assert!(update.contains("?actor a <http://schemas.delving.eu/narthex/terms/Actor> ."));
    }

    #[tokio::test]
    async fn test_enable_replaces_false_and_inserts_missing() {
        let store = seeded_store();

        enable_actor(&store, &iri(ALICE)).await.unwrap();
        enable_actor(&store, &iri(BOB)).await.unwrap();

        assert_eq!(enabled_values(&store, ALICE).await, vec![Some(true)]);
        assert_eq!(enabled_values(&store, BOB).await, vec![Some(true)]);
    }

    #[tokio::test]
    async fn test_enable_is_idempotent() {
        let store = seeded_store();

        for _ in 0..2 {
            enable_actor(&store, &iri(ALICE)).await.unwrap();
            enable_actor(&store, &iri(BOB)).await.unwrap();
        }

        assert_eq!(enabled_values(&store, ALICE).await, vec![Some(true)]);
        assert_eq!(enabled_values(&store, BOB).await, vec![Some(true)]);
    }

    #[tokio::test]
    async fn test_enable_collapses_conflicting_values() {
        let store = seeded_store();
        store
            .load(&format!(
                "INSERT DATA {{
  GRAPH <{ACTORS_GRAPH}> {{
    <{ALICE}> <{ACTOR_ENABLED}> true, \"yes\" .
  }}
}}"
            ))
            .unwrap();
        assert_eq!(enabled_values(&store, ALICE).await.len(), 3);

        enable_actor(&store, &iri(ALICE)).await.unwrap();

        assert_eq!(enabled_values(&store, ALICE).await, vec![Some(true)]);
    }

    #[tokio::test]
    async fn test_enable_skips_non_actor() {
        let store = seeded_store();

        enable_actor(&store, &iri(CAROL)).await.unwrap();

        // carol is not typed Actor: her stored value is left alone.
        assert_eq!(enabled_values(&store, CAROL).await, vec![Some(false)]);
        let listed = list_actors(&store).await.unwrap();
        assert!(!listed.actors.contains(&iri(CAROL)));
    }

    #[tokio::test]
    async fn test_enable_unknown_actor_is_noop() {
        let store = seeded_store();

        enable_actor(&store, &iri("http://example.org/nobody"))
            .await
            .unwrap();

        assert!(enabled_values(&store, "http://example.org/nobody")
            .await
            .is_empty());
    }
}
