//! In-memory SPARQL endpoint backed by `oxigraph`.
//!
//! Evaluates exactly the query and update text a live store would receive,
//! and keeps a log of every update applied through [`SparqlEndpoint`].

use std::sync::Mutex;

use oxigraph::model::Term;
use oxigraph::sparql::QueryResults as OxQueryResults;
use oxigraph::store::Store;

use crate::client::{SparqlEndpoint, SparqlError};
use crate::results::{QueryResults, RdfTerm, Solution};

pub struct MemoryEndpoint {
    store: Store,
    updates: Mutex<Vec<String>>,
}

impl MemoryEndpoint {
    pub fn new() -> Result<Self, SparqlError> {
        let store = Store::new().map_err(|e| SparqlError::Store(e.to_string()))?;
        Ok(Self {
            store,
            updates: Mutex::new(Vec::new()),
        })
    }

    /// Apply an update without recording it (fixture setup).
    pub fn load(&self, update: &str) -> Result<(), SparqlError> {
        self.store
            .update(update)
            .map_err(|e| SparqlError::Store(e.to_string()))
    }

    /// Updates received through [`SparqlEndpoint::update`], oldest first.
    pub fn updates(&self) -> Vec<String> {
        self.updates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Total number of quads in the store.
    pub fn len(&self) -> Result<usize, SparqlError> {
        self.store
            .len()
            .map_err(|e| SparqlError::Store(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, SparqlError> {
        Ok(self.len()? == 0)
    }

    fn evaluate(&self, query: &str) -> Result<QueryResults, SparqlError> {
        let results = self
            .store
            .query(query)
            .map_err(|e| SparqlError::Store(e.to_string()))?;

        match results {
            OxQueryResults::Solutions(solutions) => {
                let vars = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| SparqlError::Store(e.to_string()))?;
                    let mut row = Solution::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), convert_term(term));
                    }
                    rows.push(row);
                }
                Ok(QueryResults {
                    vars,
                    solutions: rows,
                    boolean: None,
                })
            }
            OxQueryResults::Boolean(value) => Ok(QueryResults {
                boolean: Some(value),
                ..QueryResults::default()
            }),
            OxQueryResults::Graph(_) => Err(SparqlError::UnexpectedResults(
                "CONSTRUCT and DESCRIBE are not supported".to_string(),
            )),
        }
    }
}

impl SparqlEndpoint for MemoryEndpoint {
    async fn query(&self, query: &str) -> Result<QueryResults, SparqlError> {
        self.evaluate(query)
    }

    async fn update(&self, update: &str) -> Result<String, SparqlError> {
        self.updates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(update.to_string());
        self.load(update)?;
        Ok("Update succeeded".to_string())
    }
}

fn convert_term(term: &Term) -> RdfTerm {
    match term {
        Term::NamedNode(node) => RdfTerm::Iri(node.as_str().to_string()),
        Term::BlankNode(node) => RdfTerm::BlankNode(node.as_str().to_string()),
        Term::Literal(lit) => RdfTerm::literal(
            lit.value(),
            Some(lit.datatype().as_str()),
            lit.language(),
        ),
        #[allow(unreachable_patterns)]
        _ => RdfTerm::Other {
            kind: "triple".to_string(),
        },
    }
}
