use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    server::{self, AppState},
    services::{pdf_filename, render_itinerary_pdf},
    types::{ItineraryPlan, TripFormData, TripPreferences},
};

fn command() -> Command {
    Command::new("travel-genie")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Travel planning backend: destinations, itineraries, bookings and PDF export")
        .subcommand_required(true)
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Chat model to use (or set GENIE_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("OpenAI-compatible API key (or set OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("API base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("sample-fallback")
                .long("sample-fallback")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Serve built-in sample data when generation fails"),
        )
        .arg(
            Arg::new("strict-schema")
                .long("strict-schema")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Reject replies that do not match the JSON Schema (or set GENIE_STRICT_SCHEMA)"),
        )
        .subcommand(
            Command::new("serve").about("Run the HTTP API").arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .value_parser(clap::value_parser!(u16))
                    .help("Port to listen on (or set GENIE_PORT)"),
            ),
        )
        .subcommand(
            Command::new("destinations")
                .about("Suggest destinations for a trip form")
                .arg(form_arg()),
        )
        .subcommand(
            Command::new("itinerary")
                .about("Plan day by day for one destination")
                .arg(form_arg())
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("NAME")
                        .required(true)
                        .help("Destination to plan"),
                ),
        )
        .subcommand(
            Command::new("export-pdf")
                .about("Render a saved itinerary as a PDF")
                .arg(
                    Arg::new("itinerary")
                        .short('i')
                        .long("itinerary")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Itinerary JSON as returned by `itinerary`"),
                )
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("NAME")
                        .required(true),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Output path (defaults to <destination>-itinerary.pdf)"),
                ),
        )
        .subcommand(Command::new("env").about("Show which providers are configured"))
}

fn form_arg() -> Arg {
    Arg::new("form")
        .short('f')
        .long("form")
        .value_name("FILE")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Trip form as JSON")
}

/// Environment first, flags on top.
fn resolve_config(matches: &ArgMatches) -> Config {
    let mut config = Config::from_env();
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(key) = matches.get_one::<String>("api-key") {
        config.openai_api_key = Some(key.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.openai_base_url = Some(base_url.clone());
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*seconds);
    }
    if matches.get_flag("sample-fallback") {
        config.sample_fallback = true;
    }
    if matches.get_flag("strict-schema") {
        config.strict_schema = true;
    }
    config
}

async fn read_preferences(matches: &ArgMatches) -> anyhow::Result<TripPreferences> {
    let path = matches
        .get_one::<PathBuf>("form")
        .context("--form is required")?;
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let form: TripFormData =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(form.validate()?)
}

/// CLI entry point
pub async fn run() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        bail!("a command is required");
    };
    let config = resolve_config(sub);

    match (name, sub) {
        ("serve", sub) => {
            let mut config = config;
            if let Some(port) = sub.get_one::<u16>("port") {
                config.port = *port;
            }
            server::serve(config).await?;
        }
        ("destinations", sub) => {
            let prefs = read_preferences(sub).await?;
            let planner = AppState::from_config(config)?.planner;
            let validation = planner.generate_destinations(&prefs).await?;
            info!(
                received = validation.report.received(),
                kept = validation.report.kept(),
                "destinations validated"
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "outcome": validation.outcome,
                    "report": validation.report,
                }))?
            );
        }
        ("itinerary", sub) => {
            let prefs = read_preferences(sub).await?;
            let destination = sub
                .get_one::<String>("destination")
                .context("--destination is required")?;
            let planner = AppState::from_config(config)?.planner;
            let plan = planner.generate_itinerary(&prefs, destination).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        ("export-pdf", sub) => {
            let path = sub
                .get_one::<PathBuf>("itinerary")
                .context("--itinerary is required")?;
            let destination = sub
                .get_one::<String>("destination")
                .context("--destination is required")?;
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let plan: ItineraryPlan = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;

            let bytes = render_itinerary_pdf(destination, &plan)?;
            let out = sub
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(pdf_filename(destination)));
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Saved {} ({} bytes)", out.display(), bytes.len());
        }
        ("env", _) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "hasOpenAIKey": config.has_openai_key(),
                    "hasGeminiKey": config.has_gemini_key(),
                    "environment": config.environment,
                    "model": config.model,
                }))?
            );
        }
        (other, _) => bail!("unknown command `{other}`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let matches = command()
            .try_get_matches_from([
                "travel-genie",
                "itinerary",
                "--form",
                "trip.json",
                "-d",
                "Goa",
                "--timeout",
                "30",
                "--sample-fallback",
                "--strict-schema",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "itinerary");
        assert_eq!(sub.get_one::<u64>("timeout"), Some(&30));
        assert!(sub.get_flag("sample-fallback"));

        let config = resolve_config(sub);
        assert!(config.sample_fallback);
        assert!(config.strict_schema);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(sub.get_one::<String>("destination").map(String::as_str), Some("Goa"));
    }
}
