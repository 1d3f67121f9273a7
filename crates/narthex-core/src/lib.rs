//! narthex-core: Shared identifiers and error handling for Narthex admin tooling.
//!
//! This crate provides the types every other crate agrees on:
//! - Validated organization ids and actor IRIs
//! - The Narthex actor vocabulary (graph, class, and property IRIs)
//! - Validation errors

pub mod error;
pub mod types;

pub use error::NarthexError;
pub use types::{ActorIri, OrgId, ACTORS_GRAPH, ACTOR_CLASS, ACTOR_ENABLED};
