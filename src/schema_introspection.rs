use serde::Deserialize;
use serde_json::Deserializer;
use serde_path_to_error::deserialize;
use crate::error::SchemaError;
use crate::schema::Schema;

pub const INTROSPECTION_QUERY: &'static str = include_str!("../resources/introspect.gql");

/// Decodes an introspection result, either the whole HTTP response body
/// (`{"data": {"__schema": ...}}`) or the bare `{"__schema": ...}` object.
pub fn from_response_body(response_body: &str) -> Result<Schema, SchemaError> {
    let deserializer = &mut Deserializer::from_str(response_body);
    let response: IntrospectionQueryResponse = deserialize(deserializer)?;

    if let Some(schema) = response.data.and_then(|data| data.schema).or(response.schema) {
        tracing::debug!(types = schema.types.len(), query_type = %schema.query_type.name, "decoded introspection schema");
        return Ok(schema);
    }

    let message = response
        .errors
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|error| error.message)
        .unwrap_or_else(|| "missing __schema".to_string());
    Err(SchemaError::Response(message))
}

#[derive(Deserialize)]
struct IntrospectionQueryResponse {
    #[serde(default)]
    data: Option<SchemaData>,
    #[serde(default)]
    errors: Option<Vec<ResponseError>>,
    #[serde(default, rename = "__schema")]
    schema: Option<Schema>,
}

#[derive(Deserialize)]
struct SchemaData {
    #[serde(default, rename = "__schema")]
    schema: Option<Schema>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}
