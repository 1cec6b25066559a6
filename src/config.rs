use std::collections::HashMap;
use std::path::Path;
use anyhow::Context;
use serde::Deserialize;
use graphql_governance::Filter;

pub const DEFAULT_CONFIG_PATH: &'static str = "graphql-governance.json";
pub const DEFAULT_PROFILE_NAME: &'static str = "default";

#[derive(Deserialize, Debug, Default)]
pub struct GovernanceJsonConfig {
    pub profiles: Option<HashMap<String, ConfigProfile>>,
    pub filter: Option<Filter>,
    #[serde(rename = "allowedQueries")]
    pub allowed_queries: Option<Vec<String>>,
    #[serde(rename = "allowedMutations")]
    pub allowed_mutations: Option<Vec<String>>,
    pub output: Option<String>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "method")]
pub enum ConfigProfile {
    Endpoint {
        url: String,
        #[serde(default)]
        headers: HashMap<String, String>,
    },
    File { path: String },
    Pipe,
}

impl GovernanceJsonConfig {
    pub fn profile(&self, name: &str) -> Option<&ConfigProfile> {
        self.profiles.as_ref().and_then(|profiles| profiles.get(name))
    }
}

/// Reads the config named on the command line, or the default one when it exists.
pub fn read_config_from_args(path: Option<&str>) -> anyhow::Result<Option<GovernanceJsonConfig>> {
    match path {
        Some(path) => read_config(Path::new(path))?
            .map(Some)
            .with_context(|| format!("Unable to locate config file {}", path)),
        None => read_config(Path::new(DEFAULT_CONFIG_PATH)),
    }
}

fn read_config(path: &Path) -> anyhow::Result<Option<GovernanceJsonConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let config_content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read config file {}", path.display()))?;
    parse_config(&config_content)
        .with_context(|| format!("Invalid config file {}", path.display()))
        .map(Some)
}

pub fn parse_config(config_content: &str) -> anyhow::Result<GovernanceJsonConfig> {
    let deserializer = &mut serde_json::Deserializer::from_str(config_content);
    Ok(serde_path_to_error::deserialize(deserializer)?)
}
