//! `burndown` command line entry point

use anyhow::Context;
use burndown_cli::{logging, server, AppConfig};
use burndown_core::{AuthToken, BurndownEngine, MilestoneId};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use taiga_client::TaigaClient;

fn token_arg() -> Arg {
    Arg::new("token")
        .long("token")
        .env("TAIGA_TOKEN")
        .required(true)
        .help("Tracker bearer token")
}

fn project_arg() -> Arg {
    Arg::new("project")
        .long("project")
        .required(true)
        .value_parser(value_parser!(u64))
        .help("Project ID")
}

fn milestone_arg() -> Arg {
    Arg::new("milestone")
        .long("milestone")
        .required(true)
        .value_parser(value_parser!(u64))
        .help("Milestone (sprint) ID")
}

fn cli() -> Command {
    Command::new("burndown")
        .version(burndown_core::VERSION)
        .about("Sprint burndown charts from a Taiga tracker")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .env("BURNDOWN_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Tracker API base URL"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("chart")
                .about("Compute the burndown chart for a milestone")
                .arg(milestone_arg())
                .arg(token_arg())
                .arg(
                    Arg::new("max-concurrency")
                        .long("max-concurrency")
                        .value_parser(value_parser!(usize))
                        .help("Maximum in-flight story fetches"),
                )
                .arg(
                    Arg::new("deadline")
                        .long("deadline")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Fetch deadline in seconds"),
                ),
        )
        .subcommand(
            Command::new("milestone")
                .about("Show a milestone as the engine sees it")
                .arg(milestone_arg())
                .arg(token_arg()),
        )
        .subcommand(
            Command::new("stories")
                .about("List a project's stories")
                .arg(project_arg())
                .arg(token_arg()),
        )
        .subcommand(
            Command::new("custom-attributes")
                .about("List a project's story custom attributes")
                .arg(project_arg())
                .arg(token_arg()),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the burndown endpoint over HTTP")
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<AppConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = AppConfig::load(path.map(PathBuf::as_path))
        .with_context(|| format!("loading configuration from {path:?}"))?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        config.taiga = config.taiga.with_base_url(url.as_str());
    }
    Ok(config)
}

fn token(args: &ArgMatches) -> anyhow::Result<AuthToken> {
    args.get_one::<String>("token")
        .map(AuthToken::new)
        .context("missing --token")
}

fn required_id(args: &ArgMatches, name: &str) -> anyhow::Result<u64> {
    args.get_one::<u64>(name)
        .copied()
        .with_context(|| format!("missing --{name}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("log-json"));
    let mut config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("chart", args)) => {
            if let Some(max) = args.get_one::<usize>("max-concurrency") {
                config.burndown = config.burndown.with_max_concurrent_fetches(*max);
            }
            if let Some(secs) = args.get_one::<u64>("deadline") {
                config.burndown = config
                    .burndown
                    .with_fetch_deadline(std::time::Duration::from_secs(*secs));
            }
            let client = TaigaClient::new(config.taiga)?;
            let engine = BurndownEngine::new(client.clone(), client, config.burndown);
            let id = MilestoneId(required_id(args, "milestone")?);
            let chart = engine.compute(id, &token(args)?).await?;
            if !chart.skipped_stories.is_empty() {
                tracing::warn!(count = chart.skipped_stories.len(), "some stories were left out");
            }
            print_json(&chart)?;
        }
        Some(("milestone", args)) => {
            let client = TaigaClient::new(config.taiga)?;
            let id = MilestoneId(required_id(args, "milestone")?);
            print_json(&client.milestone(id, &token(args)?).await?)?;
        }
        Some(("stories", args)) => {
            let client = TaigaClient::new(config.taiga)?;
            let project = required_id(args, "project")?;
            print_json(&client.project_stories(project, &token(args)?).await?)?;
        }
        Some(("custom-attributes", args)) => {
            let client = TaigaClient::new(config.taiga)?;
            let project = required_id(args, "project")?;
            print_json(&client.custom_attributes(project, &token(args)?).await?)?;
        }
        Some(("serve", args)) => {
            let bind = args
                .get_one::<SocketAddr>("bind")
                .copied()
                .unwrap_or(config.server.bind);
            let client = TaigaClient::new(config.taiga)?;
            let engine = Arc::new(BurndownEngine::new(client.clone(), client, config.burndown));
            server::serve(engine, bind).await;
        }
        other => anyhow::bail!("unknown subcommand {:?}", other.map(|(name, _)| name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn chart_arguments_parse() {
        let matches = cli()
            .try_get_matches_from([
                "burndown", "chart", "--milestone", "7", "--token", "t", "--max-concurrency", "3",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "chart");
        assert_eq!(required_id(args, "milestone").unwrap(), 7);
        assert_eq!(args.get_one::<usize>("max-concurrency"), Some(&3));
        assert_eq!(token(args).unwrap().expose(), "t");
    }

    #[test]
    fn zero_deadline_flag_rejected() {
        let result = cli().try_get_matches_from([
            "burndown", "chart", "--milestone", "7", "--token", "t", "--deadline", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn base_url_flag_overrides_config() {
        let matches = cli()
            .try_get_matches_from([
                "burndown", "stories", "--project", "5", "--token", "t", "--base-url", "http://x/api",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.taiga.base_url, "http://x/api");
    }
}
