//! Narthex SPARQL — triple store client for actor administration.
//!
//! All reads and writes of actor records flow through this crate, so query
//! text is built in one place from validated identifiers only.

pub mod client;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod results;

pub use client::{SparqlClient, SparqlConfig, SparqlEndpoint, SparqlError};
pub use results::{QueryResults, RdfTerm};
