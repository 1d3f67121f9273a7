//! Core identifiers for the Narthex actor records.
//!
//! Both identifiers end up inside text sent to the triple store (a URL path
//! segment and a SPARQL IRI), so they are validated on construction and
//! cannot be built any other way.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NarthexError;

// ── Vocabulary ────────────────────────────────────────────────────

/// Named graph holding every actor record of an organization.
pub const ACTORS_GRAPH: &str = "http://schemas.delving.eu/narthex/terms/Actors/graph";

/// RDF class of actor records.
pub const ACTOR_CLASS: &str = "http://schemas.delving.eu/narthex/terms/Actor";

/// Boolean property toggled by the enabler.
pub const ACTOR_ENABLED: &str = "http://schemas.delving.eu/narthex/terms/actorEnabled";

// ── Organization ──────────────────────────────────────────────────

/// Organization identifier, used as the dataset segment of the store URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct OrgId(String);

impl OrgId {
    /// Validate an organization id.
    ///
    /// Must be non-empty, not `.` or `..`, and free of `/`, whitespace, and
    /// control characters so it stays a single path segment.
    pub fn parse(raw: &str) -> Result<Self, NarthexError> {
        if raw.is_empty() {
            return Err(NarthexError::InvalidOrgId {
                org_id: raw.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if raw == "." || raw == ".." {
            return Err(NarthexError::InvalidOrgId {
                org_id: raw.to_string(),
                reason: "dot segments do not name a dataset".to_string(),
            });
        }
        if let Some(c) = raw
            .chars()
            .find(|c| *c == '/' || c.is_whitespace() || c.is_control())
        {
            return Err(NarthexError::InvalidOrgId {
                org_id: raw.to_string(),
                reason: format!("contains forbidden character {c:?}"),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrgId {
    type Error = NarthexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrgId> for String {
    fn from(value: OrgId) -> Self {
        value.0
    }
}

// ── Actor ─────────────────────────────────────────────────────────

/// Absolute IRI of an actor resource.
///
/// Accepts exactly what fits inside a SPARQL `IRIREF` (`<...>`), so
/// [`ActorIri::to_sparql`] can never break out of the term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ActorIri(String);

impl ActorIri {
    pub fn parse(raw: &str) -> Result<Self, NarthexError> {
        let invalid = |reason: String| NarthexError::InvalidIri {
            iri: raw.to_string(),
            reason,
        };

        if let Some(c) = raw.chars().find(|c| is_forbidden_iri_char(*c)) {
            return Err(invalid(format!("contains forbidden character {c:?}")));
        }

        let scheme = raw
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| invalid("missing scheme".to_string()))?;
        if !is_valid_scheme(scheme) {
            return Err(invalid(format!("invalid scheme {scheme:?}")));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as a SPARQL IRI term: `<iri>`.
    pub fn to_sparql(&self) -> String {
        format!("<{}>", self.0)
    }
}

impl fmt::Display for ActorIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ActorIri {
    type Error = NarthexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ActorIri> for String {
    fn from(value: ActorIri) -> Self {
        value.0
    }
}

/// Characters excluded from `IRIREF`: `<>"{}|^`\` and `U+0000..=U+0020`.
fn is_forbidden_iri_char(c: char) -> bool {
    matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c <= '\u{20}'
}

/// RFC 3987 scheme: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
