use std::fmt;
use crate::schema::Kind;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Unable to decode introspection response: {0}")]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("Introspection response carries no data: {0}")]
    Response(String),
    #[error("Malformed schema: {kind} type '{name}' is referenced but not defined")]
    MissingType { kind: Kind, name: String },
}

/// What an allow-list rejection points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denied {
    Field(String),
    Document(String),
}

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denied::Field(name) => write!(f, "field '{}'", name),
            Denied::Document(document) => write!(f, "document '{}'", document.trim()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("Operation not permitted: {0} is not allowed")]
    QueryNotAllowed(Denied),
    #[error("Unable to parse GraphQL document: {0}")]
    DocumentParse(#[from] graphql_parser::query::ParseError),
}
