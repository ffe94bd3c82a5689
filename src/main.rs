//! `nreq`: issue one normalized request and print the result.
//!
//! ```text
//! nreq --prefix http://localhost:3001 get /users
//! nreq --config client.toml --token abc post /users --body '{"name":"a"}'
//! ```
//!
//! The result is printed as pretty JSON: to stdout on success, to stderr
//! on failure (exit code 1).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use normalized_request::config::{load_config, ClientConfig};
use normalized_request::observability::logging;
use normalized_request::token::{BearerTokenProvider, MemoryTokenStore};
use normalized_request::{ApiResult, NormalizeConfig, RequestClient, RequestOptions};

#[derive(Parser)]
#[command(name = "nreq")]
#[command(about = "Send a request and print the normalized result", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Bearer token (otherwise read from the configured token store)
    #[arg(short, long)]
    token: Option<String>,

    /// Extra header, `name:value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Overrides the configured timeout
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path
    Get { path: String },
    /// POST a JSON body to a path
    Post {
        path: String,
        #[arg(short, long, default_value = "{}")]
        body: String,
    },
    /// PUT a JSON body to a path
    Put {
        path: String,
        #[arg(short, long, default_value = "{}")]
        body: String,
    },
    /// DELETE a path
    Delete { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(Ok(result)) => {
            print_result(&result, false);
            ExitCode::SUCCESS
        }
        Ok(Err(result)) => {
            print_result(&result, true);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Result<ApiResult, ApiResult>, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    logging::init(&config.observability.log_level);
    tracing::debug!(prefix = %config.prefix, "nreq starting");

    let token_config = config.token.clone();
    let mut client = RequestClient::new(config, NormalizeConfig::default())?;
    if let Some(token) = cli.token {
        let store = Arc::new(MemoryTokenStore::with_entry(&token_config.key, &token));
        client = client.with_token_provider(BearerTokenProvider::with_store(store, &token_config)?);
    }

    let (path, mut options) = match cli.command {
        Commands::Get { path } => (path, RequestOptions::get()),
        Commands::Post { path, body } => (path, RequestOptions::post(parse_json(&body)?)),
        Commands::Put { path, body } => (path, RequestOptions::put(parse_json(&body)?)),
        Commands::Delete { path } => (path, RequestOptions::delete()),
    };
    for raw in &cli.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(name, value);
    }

    Ok(client.request(&path, options).await)
}

fn parse_json(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(body)
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header '{}' is not in name:value form", raw))?;
    Ok((
        HeaderName::from_bytes(name.trim().as_bytes())?,
        HeaderValue::from_str(value.trim())?,
    ))
}

fn print_result(result: &ApiResult, failed: bool) {
    let text = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    if failed {
        eprintln!("{}", text);
    } else {
        println!("{}", text);
    }
}
