//! narthex-enable: Enable every actor of a Narthex organization.
//!
//! Lists the actors in the organization's triple store dataset, then sets
//! `actorEnabled true` on each one with its own SPARQL update, collecting
//! the outcome in an [`EnableReport`](report::EnableReport).

pub mod config;
pub mod enabler;
pub mod error;
pub mod report;
