//! Command-line front end for courier catalogues.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use courier::catalog::Catalog;
use courier::dispatch::Dispatcher;
use courier::schema::input_schema;
use courier::transport::{HttpTransport, Transport as _};
use courier::validate::CallArguments;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "courier", version, about = "Invoke declaratively described HTTP endpoints")]
struct Cli {
    /// Path to the catalogue document.
    #[arg(
        long,
        env = "COURIER_CATALOG",
        global = true,
        default_value = "catalog.yaml"
    )]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate the catalogue, listing its endpoints.
    Check,
    /// Print the input schema of one endpoint, or of every endpoint.
    Describe { endpoint: Option<String> },
    /// Build (and unless --dry-run, execute) one invocation.
    Invoke {
        endpoint: String,

        /// KEY=VALUE argument (repeatable). Values that parse as JSON
        /// scalars keep their type; everything else is a string.
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Full JSON object of arguments; --arg pairs are applied on top.
        #[arg(long, value_name = "JSON")]
        args_json: Option<String>,

        /// Print the request descriptor as JSON instead of executing it.
        #[arg(long)]
        dry_run: bool,

        /// Call timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::load_file(&cli.catalog)
        .with_context(|| format!("load catalogue {}", cli.catalog.display()))?;

    match cli.command {
        Command::Check => check(&catalog),
        Command::Describe { endpoint } => describe(&catalog, endpoint.as_deref()),
        Command::Invoke {
            endpoint,
            args,
            args_json,
            dry_run,
            timeout,
        } => {
            invoke(
                catalog,
                &endpoint,
                &args,
                args_json.as_deref(),
                dry_run,
                Duration::from_secs(timeout),
            )
            .await
        }
    }
}

fn check(catalog: &Catalog) -> anyhow::Result<()> {
    println!(
        "{}{} — {} endpoint(s), base {}",
        catalog.name(),
        catalog
            .version()
            .map(|v| format!(" v{v}"))
            .unwrap_or_default(),
        catalog.len(),
        catalog.base_url()
    );
    for endpoint in catalog.endpoints() {
        println!(
            "  {:6} {:32} {}",
            endpoint.method.as_str(),
            endpoint.url.source(),
            endpoint.name
        );
    }
    Ok(())
}

fn describe(catalog: &Catalog, endpoint: Option<&str>) -> anyhow::Result<()> {
    match endpoint {
        Some(name) => {
            let def = catalog
                .get(name)
                .with_context(|| format!("unknown endpoint '{name}'"))?;
            println!("{}", serde_json::to_string_pretty(&input_schema(def))?);
        }
        None => {
            for def in catalog.endpoints() {
                println!("# {}", def.name);
                if let Some(description) = &def.description {
                    println!("# {description}");
                }
                println!("{}", serde_json::to_string_pretty(&input_schema(def))?);
            }
        }
    }
    Ok(())
}

async fn invoke(
    catalog: Catalog,
    endpoint: &str,
    pairs: &[String],
    args_json: Option<&str>,
    dry_run: bool,
    timeout: Duration,
) -> anyhow::Result<()> {
    let args = parse_arguments(pairs, args_json)?;
    let dispatcher = Dispatcher::new(catalog);
    let descriptor = dispatcher.invoke(endpoint, &args)?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    let transport = HttpTransport::for_catalog(dispatcher.catalog(), timeout);
    let response = transport.send(descriptor).await?;
    println!("HTTP {}", response.status);
    println!("{}", response.body);
    Ok(())
}

fn parse_arguments(pairs: &[String], args_json: Option<&str>) -> anyhow::Result<CallArguments> {
    let mut args = CallArguments::new();

    if let Some(text) = args_json {
        let value: Value = serde_json::from_str(text).context("parse --args-json")?;
        let object = value
            .as_object()
            .context("--args-json must be a JSON object")?;
        args.extend(object.clone());
    }

    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("--arg '{pair}' is not of the form KEY=VALUE"))?;
        // Scalars that parse as JSON keep their type; everything else is a
        // plain string.
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
            _ => Value::String(raw.to_string()),
        };
        args.insert(key.to_string(), value);
    }

    Ok(args)
}
