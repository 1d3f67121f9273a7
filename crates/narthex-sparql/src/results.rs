//! SPARQL query results deserialization.
//!
//! Stores answer with either `application/sparql-results+json` or
//! `application/sparql-results+xml`. Both formats are decoded with serde
//! (`serde_json` and `quick-xml`) into wire structs, then flattened into
//! [`QueryResults`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::client::SparqlError;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// One bound value in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfTerm {
    Iri(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    BlankNode(String),
    /// A term this client does not model (e.g. an RDF-star `triple`).
    Other { kind: String },
}

impl RdfTerm {
    /// Build a literal, dropping the implicit `xsd:string` / `rdf:langString` datatypes.
    pub fn literal(value: &str, datatype: Option<&str>, language: Option<&str>) -> Self {
        let datatype = datatype
            .filter(|dt| *dt != XSD_STRING && *dt != RDF_LANG_STRING)
            .map(str::to_string);
        Self::Literal {
            value: value.to_string(),
            datatype,
            language: language.map(str::to_string),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Value of an `xsd:boolean` literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } if dt == XSD_BOOLEAN => match value.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// N-Triples-like rendering, used when reporting terms back to the operator.
impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } => write!(f, "{value:?}^^<{dt}>"),
            Self::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "{value:?}@{lang}"),
            Self::Literal { value, .. } => write!(f, "{value:?}"),
            Self::BlankNode(id) => write!(f, "_:{id}"),
            Self::Other { kind } => write!(f, "[{kind} term]"),
        }
    }
}

/// A single result row: variable name → bound term. Unbound variables are absent.
pub type Solution = BTreeMap<String, RdfTerm>;

/// Results of a SELECT (`solutions`) or ASK (`boolean`) query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults {
    pub vars: Vec<String>,
    pub solutions: Vec<Solution>,
    pub boolean: Option<bool>,
}

/// Pick the decoder matching the response `Content-Type`. JSON is the default.
pub fn parse_results(content_type: &str, body: &str) -> Result<QueryResults, SparqlError> {
    if content_type.to_ascii_lowercase().contains("xml") {
        parse_xml_results(body)
    } else {
        parse_json_results(body)
    }
}

// ── JSON ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JsonResults {
    #[serde(default)]
    head: JsonHead,
    results: Option<JsonBindings>,
    boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonBindings {
    #[serde(default)]
    bindings: Vec<BTreeMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    kind: String,
    /// A string for plain terms; an object for RDF-star triples.
    value: serde_json::Value,
    datatype: Option<String>,
    #[serde(rename = "xml:lang")]
    lang: Option<String>,
}

impl JsonTerm {
    fn into_term(self) -> RdfTerm {
        let serde_json::Value::String(value) = self.value else {
            return RdfTerm::Other { kind: self.kind };
        };
        match self.kind.as_str() {
            "uri" => RdfTerm::Iri(value),
            "bnode" => RdfTerm::BlankNode(value),
            // "typed-literal" is the pre-recommendation spelling some stores still emit.
            "literal" | "typed-literal" => {
                RdfTerm::literal(&value, self.datatype.as_deref(), self.lang.as_deref())
            }
            _ => RdfTerm::Other { kind: self.kind },
        }
    }
}

/// Parse `application/sparql-results+json`.
pub fn parse_json_results(body: &str) -> Result<QueryResults, SparqlError> {
    let raw: JsonResults =
        serde_json::from_str(body).map_err(|e| SparqlError::Json(format!("{e}")))?;

    if raw.results.is_none() && raw.boolean.is_none() {
        return Err(SparqlError::UnexpectedResults(
            "response has neither results nor boolean".to_string(),
        ));
    }

    let mut solutions = Vec::new();
    for binding in raw.results.map(|r| r.bindings).unwrap_or_default() {
        let mut solution = Solution::new();
        for (var, term) in binding {
            solution.insert(var, term.into_term());
        }
        solutions.push(solution);
    }

    Ok(QueryResults {
        vars: raw.head.vars,
        solutions,
        boolean: raw.boolean,
    })
}

// ── XML ──────────────────────────────────────────────────────────

/// Root element: `<sparql>`.
#[derive(Debug, Deserialize)]
#[serde(rename = "sparql")]
struct XmlSparql {
    head: Option<XmlHead>,
    results: Option<XmlResultSet>,
    boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlHead {
    #[serde(rename = "variable", default)]
    variables: Vec<XmlVariable>,
}

#[derive(Debug, Deserialize)]
struct XmlVariable {
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct XmlResultSet {
    #[serde(rename = "result", default)]
    results: Vec<XmlResult>,
}

#[derive(Debug, Deserialize)]
struct XmlResult {
    #[serde(rename = "binding", default)]
    bindings: Vec<XmlBinding>,
}

#[derive(Debug, Deserialize)]
struct XmlBinding {
    #[serde(rename = "@name")]
    name: String,
    uri: Option<String>,
    literal: Option<XmlLiteral>,
    bnode: Option<String>,
    triple: Option<serde::de::IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct XmlLiteral {
    #[serde(rename = "@datatype")]
    datatype: Option<String>,
    #[serde(rename = "@xml:lang")]
    lang: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

impl XmlBinding {
    fn into_term(self) -> RdfTerm {
        if let Some(uri) = self.uri {
            return RdfTerm::Iri(uri);
        }
        if let Some(lit) = self.literal {
            return RdfTerm::literal(&lit.value, lit.datatype.as_deref(), lit.lang.as_deref());
        }
        if let Some(bnode) = self.bnode {
            return RdfTerm::BlankNode(bnode);
        }
        let kind = if self.triple.is_some() { "triple" } else { "unknown" };
        RdfTerm::Other {
            kind: kind.to_string(),
        }
    }
}

/// Parse `application/sparql-results+xml`.
pub fn parse_xml_results(body: &str) -> Result<QueryResults, SparqlError> {
    let raw: XmlSparql =
        quick_xml::de::from_str(body).map_err(|e| SparqlError::Xml(format!("{e}")))?;

    if raw.results.is_none() && raw.boolean.is_none() {
        return Err(SparqlError::UnexpectedResults(
            "response has neither results nor boolean".to_string(),
        ));
    }

    let mut solutions = Vec::new();
    for result in raw.results.map(|r| r.results).unwrap_or_default() {
        let mut solution = Solution::new();
        for binding in result.bindings {
            let name = binding.name.clone();
            solution.insert(name, binding.into_term());
        }
        solutions.push(solution);
    }

    Ok(QueryResults {
        vars: raw
            .head
            .unwrap_or_default()
            .variables
            .into_iter()
            .map(|v| v.name)
            .collect(),
        solutions,
        boolean: raw.boolean,
    })
}
