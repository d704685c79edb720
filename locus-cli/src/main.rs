use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use colored::Colorize;

use locus_core::location::LocationUri;
use locus_core::provider::Provider;
use locus_core::resource::{ResourceId, State, Value};
use locus_provider_aws::DataSyncProvider;

#[derive(Parser)]
#[command(name = "locus")]
#[command(about = "Inspect AWS DataSync locations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode location URIs into global ID and subdirectory
    Parse {
        /// Location URIs (e.g., nfs://example.com/export/)
        #[arg(required = true)]
        uris: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read a DataSync location and show its decoded attributes
    Read {
        /// Resource type (e.g., datasync.location_s3)
        #[arg(long = "type")]
        resource_type: String,

        /// Location ARN
        #[arg(long)]
        arn: String,

        /// AWS region
        #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
        region: String,

        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { uris, json } => run_parse(&uris, json),
        Commands::Read {
            resource_type,
            arn,
            region,
            json,
        } => run_read(&resource_type, &arn, &region, json).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_parse(uris: &[String], json: bool) -> Result<(), String> {
    let mut failures = 0;
    let mut reports = Vec::new();

    for uri in uris {
        match LocationUri::parse(uri) {
            Ok(parsed) => {
                if json {
                    reports.push(location_uri_to_json(uri, &parsed));
                } else {
                    print_location_uri(uri, &parsed);
                }
            }
            Err(e) => {
                failures += 1;
                if json {
                    reports.push(serde_json::json!({ "uri": uri, "error": e.to_string() }));
                } else {
                    println!("{} {}", "✗".red().bold(), uri);
                    println!("    {}", e.to_string().red());
                }
            }
        }
    }

    if json {
        let output = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize output: {}", e))?;
        println!("{}", output);
    }

    if failures > 0 {
        Err(format!("{} of {} location URIs failed to parse", failures, uris.len()))
    } else {
        Ok(())
    }
}

async fn run_read(resource_type: &str, arn: &str, region: &str, json: bool) -> Result<(), String> {
    let provider = DataSyncProvider::new(region).await;
    let id = ResourceId::new(resource_type, arn);

    log::info!("reading {} in {}", id, region);
    let state = provider.read(&id, Some(arn)).await.map_err(|e| e.to_string())?;

    if !state.exists {
        return Err(format!("Location {} not found", arn));
    }

    if json {
        let output = serde_json::to_string_pretty(&state_to_json(&state))
            .map_err(|e| format!("Failed to serialize output: {}", e))?;
        println!("{}", output);
    } else {
        print_state(&state);
    }
    Ok(())
}

fn print_location_uri(uri: &str, parsed: &LocationUri) {
    println!("{} {}", "✓".green().bold(), uri);
    let kind = parsed
        .location_type()
        .map(|t| t.resource_type().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("    {} {} ({})", label("scheme:"), parsed.scheme, kind);
    println!(
        "    {} {}",
        label("global_id:"),
        parsed.global_id.as_deref().unwrap_or("-")
    );
    println!("    {} {}", label("subdirectory:"), parsed.subdirectory);
}

fn label(name: &str) -> colored::ColoredString {
    format!("{:<14}", name).dimmed()
}

fn print_state(state: &State) {
    println!("{}", state.id.resource_type.cyan().bold());
    let sorted: BTreeMap<_, _> = state.attributes.iter().collect();
    for (key, value) in sorted {
        println!("  {} = {}", key, format_value(value));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let strs: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", strs.join(", "))
        }
        Value::Map(map) => {
            let sorted: BTreeMap<_, _> = map.iter().collect();
            let strs: Vec<_> = sorted
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", strs.join(", "))
        }
    }
}

fn location_uri_to_json(uri: &str, parsed: &LocationUri) -> serde_json::Value {
    serde_json::json!({
        "uri": uri,
        "scheme": parsed.scheme,
        "resource_type": parsed.location_type().map(|t| t.resource_type()),
        "global_id": parsed.global_id,
        "subdirectory": parsed.subdirectory,
    })
}

fn state_to_json(state: &State) -> serde_json::Value {
    let attributes: serde_json::Map<_, _> = state
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();

    serde_json::json!({
        "resource_type": state.id.resource_type,
        "identifier": state.identifier,
        "attributes": attributes,
    })
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => {
            let obj: serde_json::Map<_, _> = map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            serde_json::Value::Object(obj)
        }
    }
}
