use thiserror::Error;

/// Validation errors for the shared identifiers.
#[derive(Error, Debug)]
pub enum NarthexError {
    #[error("Invalid organization id {org_id:?}: {reason}")]
    InvalidOrgId { org_id: String, reason: String },

    #[error("Invalid IRI {iri:?}: {reason}")]
    InvalidIri { iri: String, reason: String },
}
