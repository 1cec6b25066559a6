//! Schema governance for GraphQL endpoints.
//!
//! Two independent pipelines live here:
//!
//! - [`project_schema`] decodes an introspection result, keeps the root fields a
//!   [`Filter`] allows plus every type they reach, and renders that fragment as SDL.
//! - [`check_allowed_graphql_query`] parses an operation document and rejects it
//!   unless every field with a sub-selection is on the allow-list.
//!
//! Both are pure functions over their inputs and keep no state between calls.

pub mod allow_list;
pub mod collector;
pub mod error;
pub mod filter;
pub mod schema;
pub mod schema_introspection;
pub mod schema_sdl;
pub mod sdl_writer;

pub use allow_list::check_allowed_graphql_query;
pub use collector::{collect, Collected};
pub use error::{Denied, QueryError, SchemaError};
pub use filter::{Filter, RootSelector};
pub use schema::Schema;
pub use schema_introspection::INTROSPECTION_QUERY;

/// Decodes `introspection_json` and renders the part of the schema `filter` exposes.
pub fn project_schema(introspection_json: &str, filter: &Filter) -> Result<String, SchemaError> {
    let schema = schema_introspection::from_response_body(introspection_json)?;
    let collected = collector::collect(&schema, filter)?;
    Ok(schema_sdl::render(&collected))
}
