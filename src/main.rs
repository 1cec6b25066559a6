use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use graphql_governance::{check_allowed_graphql_query, project_schema, Filter, QueryError, RootSelector};
use crate::config::{ConfigProfile, GovernanceJsonConfig, DEFAULT_PROFILE_NAME};
use crate::output::overwrite_on_diff;

mod config;
mod fetch;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match execute(Cli::parse()).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(about = "Projects GraphQL schemas to an allow-list and enforces it on operations")]
struct Cli {
    #[arg(short, long, global = true, help = "Path to config file from working directory, default: graphql-governance.json")]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints (or writes) the SDL reachable from the allowed root fields
    Project {
        #[arg(short, long, help = "Profile used from config file, default: default")]
        profile: Option<String>,
        #[arg(short, long, help = "Introspects this endpoint, override config file")]
        url: Option<String>,
        #[arg(short, long, help = "Reads an introspection response from file, override config file")]
        file: Option<String>,
        #[arg(short, long, help = "Writes the SDL to this file instead of stdout, override config file")]
        output: Option<String>,
        #[arg(short = 'q', long = "query", help = "Root query field to expose, override config filter")]
        queries: Vec<String>,
        #[arg(short = 'm', long = "mutation", help = "Root mutation field to expose, override config filter")]
        mutations: Vec<String>,
        #[arg(long, help = "Do not expand the types returned by root fields given on the command line")]
        no_nesting: bool,
    },
    /// Checks an operation document against the allow-lists
    Check {
        #[arg(help = "File holding the GraphQL document, or - for stdin")]
        document: String,
        #[arg(
            long = "allow-query",
            help = "Allowed query field, override config file; when none are given the config list applies, an empty list can only come from the config file"
        )]
        allowed_queries: Vec<String>,
        #[arg(
            long = "allow-mutation",
            help = "Allowed mutation field, override config file; when none are given the config list applies, an empty list can only come from the config file"
        )]
        allowed_mutations: Vec<String>,
    },
}

async fn execute(args: Cli) -> anyhow::Result<ExitCode> {
    let config = config::read_config_from_args(args.config.as_deref())?.unwrap_or_default();

    match args.command {
        Command::Project { profile, url, file, output, queries, mutations, no_nesting } => {
            let introspection = read_introspection(&config, profile, url, file).await?;
            let filter = Filter {
                allow_queries: selectors(queries, no_nesting)
                    .or_else(|| config.filter.as_ref().and_then(|it| it.allow_queries.clone())),
                allow_mutations: selectors(mutations, no_nesting)
                    .or_else(|| config.filter.as_ref().and_then(|it| it.allow_mutations.clone())),
            };
            let sdl = project_schema(&introspection, &filter)?;

            match output.or(config.output) {
                Some(output) => {
                    let path = PathBuf::from(&output);
                    overwrite_on_diff(&path, &sdl)?.log(&output);
                }
                None => print!("{}", sdl),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { document, allowed_queries, allowed_mutations } => {
            let document = if document == "-" {
                fetch::read_pipe()?
            } else {
                fetch::read_file(Path::new(&document)).await?
            };
            let allowed_queries = non_empty(allowed_queries).or(config.allowed_queries);
            let allowed_mutations = non_empty(allowed_mutations).or(config.allowed_mutations);

            match check_allowed_graphql_query(allowed_queries.as_deref(), allowed_mutations.as_deref(), &document) {
                Ok(()) => {
                    println!("allowed");
                    Ok(ExitCode::SUCCESS)
                }
                Err(error @ QueryError::QueryNotAllowed(_)) => {
                    println!("{}", error);
                    Ok(ExitCode::FAILURE)
                }
                Err(error) => Err(error.into()),
            }
        }
    }
}

async fn read_introspection(
    config: &GovernanceJsonConfig,
    profile: Option<String>,
    url: Option<String>,
    file: Option<String>,
) -> anyhow::Result<String> {
    if let Some(url) = url {
        return fetch::read_endpoint(&url, &HashMap::new()).await;
    }
    if let Some(file) = file {
        return fetch::read_file(Path::new(&file)).await;
    }

    let profile_name = profile.unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
    match config.profile(&profile_name) {
        Some(ConfigProfile::Endpoint { url, headers }) => fetch::read_endpoint(url, headers).await,
        Some(ConfigProfile::File { path }) => fetch::read_file(Path::new(path)).await,
        Some(ConfigProfile::Pipe) => fetch::read_pipe(),
        None if config.profiles.is_some() => bail!("No profile named \"{}\"", profile_name),
        None => fetch::read_pipe().context("No --url, --file or config profile given, reading stdin"),
    }
}

fn selectors(names: Vec<String>, no_nesting: bool) -> Option<Vec<RootSelector>> {
    non_empty(names).map(|names| {
        names
            .into_iter()
            .map(|name| RootSelector { name, disable_nesting: no_nesting })
            .collect()
    })
}

/// No names on the command line means "not given", so the config value applies.
fn non_empty(names: Vec<String>) -> Option<Vec<String>> {
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_allow_flags_fall_back_to_config() {
        let config = Some(vec![]);
        assert_eq!(non_empty(vec![]).or(config.clone()), Some(vec![]));
        assert_eq!(non_empty(vec!["app".to_string()]).or(config), Some(vec!["app".to_string()]));
        assert_eq!(non_empty(vec![]).or(None), None);
    }

    #[test]
    fn check_flags_parse_into_allow_lists() {
        let cli = Cli::parse_from(["graphql-governance", "check", "-", "--allow-query", "app", "--allow-query", "user"]);
        let Command::Check { allowed_queries, allowed_mutations, .. } = cli.command else {
            panic!("expected the check subcommand");
        };
        assert_eq!(non_empty(allowed_queries), Some(vec!["app".to_string(), "user".to_string()]));
        assert_eq!(non_empty(allowed_mutations), None);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
