use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crpt_client::{ClientConfig, Document, SubmissionClient, SubmissionRequest, SubmitError};

struct Args {
    document: PathBuf,
    signature: String,
    limit: usize,
    time_unit: Duration,
    endpoint: Option<String>,
}

/// Initialize tracing with CRPT_LOG and LOG_FORMAT support.
fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match std::env::var("CRPT_LOG").as_deref() {
            Ok("trace") => "trace",
            Ok("debug") => "debug",
            Ok("warn") | Ok("warning") => "warn",
            Ok("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("crpt_client={level},crpt_submit={level}"))
    };

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}

fn usage() {
    eprintln!(
        "Usage: crpt-submit <document.json> --signature <sig> [--limit <n>] [--time-unit-ms <ms>] [--endpoint <url>]"
    );
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <document.json>       Goods introduction document in API JSON form");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --signature <sig>     Document signature sent in the Signature header");
    eprintln!("  --limit <n>           Requests allowed per time unit [default: 5]");
    eprintln!("  --time-unit-ms <ms>   Length of the time unit [default: 1000]");
    eprintln!("  --endpoint <url>      Registration endpoint [default: CRPT production]");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut document: Option<PathBuf> = None;
    let mut signature: Option<String> = None;
    let mut limit = 5usize;
    let mut time_unit = Duration::from_secs(1);
    let mut endpoint = None;

    let mut i = 1; // skip argv[0]
    while i < args.len() {
        match args[i].as_str() {
            "--signature" => {
                i += 1;
                signature = Some(args.get(i).ok_or("--signature requires a value")?.clone());
            }
            "--limit" => {
                i += 1;
                let value = args.get(i).ok_or("--limit requires a value")?;
                limit = value
                    .parse()
                    .map_err(|_| format!("invalid --limit '{value}'"))?;
            }
            "--time-unit-ms" => {
                i += 1;
                let value = args.get(i).ok_or("--time-unit-ms requires a value")?;
                let millis: u64 = value
                    .parse()
                    .map_err(|_| format!("invalid --time-unit-ms '{value}'"))?;
                time_unit = Duration::from_millis(millis);
            }
            "--endpoint" => {
                i += 1;
                endpoint = Some(args.get(i).ok_or("--endpoint requires a value")?.clone());
            }
            "--help" | "-h" => return Err(String::new()),
            arg if arg.starts_with('-') => return Err(format!("unknown flag: {arg}")),
            arg => {
                if document.is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                document = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(Args {
        document: document.ok_or("missing required argument: <document.json>")?,
        signature: signature.ok_or("missing required option: --signature")?,
        limit,
        time_unit,
        endpoint,
    })
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let raw = std::fs::read_to_string(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let document: Document = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.document.display()))?;

    let mut config = ClientConfig::new(args.time_unit, args.limit);
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    let client = SubmissionClient::new(config)?;

    let result = client
        .submit(&SubmissionRequest::new(document, args.signature))
        .await;
    client.shutdown();

    match result {
        Ok(response) => {
            println!("Response status code: {}", response.status);
            println!("Response body: {}", response.body);
            Ok(true)
        }
        Err(SubmitError::Remote { status, body }) => {
            println!("Response status code: {status}");
            println!("Response body: {body}");
            Ok(false)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    let args = match parse_args(&args) {
        Ok(v) => v,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            usage();
            process::exit(2);
        }
    };

    init_tracing();

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("crpt-submit")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_required_and_defaults() {
        let args = parse_args(&argv(&["doc.json", "--signature", "abc"])).unwrap();
        assert_eq!(args.document, PathBuf::from("doc.json"));
        assert_eq!(args.signature, "abc");
        assert_eq!(args.limit, 5);
        assert_eq!(args.time_unit, Duration::from_secs(1));
        assert!(args.endpoint.is_none());
    }

    #[test]
    fn parses_all_options() {
        let args = parse_args(&argv(&[
            "--limit",
            "10",
            "--time-unit-ms",
            "250",
            "--endpoint",
            "http://localhost:1234/create",
            "doc.json",
            "--signature",
            "abc",
        ]))
        .unwrap();
        assert_eq!(args.limit, 10);
        assert_eq!(args.time_unit, Duration::from_millis(250));
        assert_eq!(args.endpoint.as_deref(), Some("http://localhost:1234/create"));
    }

    #[test]
    fn missing_signature_is_error() {
        let err = parse_args(&argv(&["doc.json"])).err().unwrap();
        assert!(err.contains("--signature"));
    }

    #[test]
    fn rejects_bad_values_and_flags() {
        assert!(parse_args(&argv(&["doc.json", "--signature", "s", "--limit", "x"])).is_err());
        assert!(parse_args(&argv(&["doc.json", "--signature", "s", "--verbose"])).is_err());
        assert!(parse_args(&argv(&["a.json", "b.json", "--signature", "s"])).is_err());
        assert_eq!(parse_args(&argv(&["--help"])).err().unwrap(), "");
    }
}
