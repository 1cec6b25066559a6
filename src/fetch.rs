use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use anyhow::Context;
use serde::Serialize;
use graphql_governance::INTROSPECTION_QUERY;

#[derive(Serialize)]
struct GraphQLQuery<'q> {
    query: &'q str
}

/// Posts the introspection query and returns the raw response body.
pub async fn read_endpoint(url: &str, headers: &HashMap<String, String>) -> anyhow::Result<String> {
    let mut request = reqwest::Client::new()
        .post(url)
        .json(&GraphQLQuery { query: INTROSPECTION_QUERY });
    for (name, value) in headers {
        request = request.header(name, value);
    }
    tracing::debug!(%url, "sending introspection query");

    request
        .send()
        .await
        .with_context(|| format!("Introspection request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Introspection request to {} was rejected", url))?
        .text()
        .await
        .with_context(|| format!("Unable to read introspection response from {}", url))
}

pub async fn read_file(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Unable to read {}", path.display()))
}

pub fn read_pipe() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Unable to read from stdin")?;
    Ok(buffer)
}
