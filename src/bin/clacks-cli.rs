use axum::body::{self, Body};
use axum::http::{HeaderName, Request};
use clap::Parser;
use serde_json::json;

use clacks_overhead::config::ClacksConfig;
use clacks_overhead::http::headers::read_messages;
use clacks_overhead::http::transport::{http_client, ClacksTransport};
use clacks_overhead::protocol::{DEFAULT_MESSAGE, OVERHEAD_HEADER};

#[derive(Parser)]
#[command(name = "clacks-cli")]
#[command(about = "Send a request with Clacks Overhead and show what comes back", long_about = None)]
struct Cli {
    /// Target URL (http only).
    url: String,

    /// Overhead message to send; repeat for more.
    #[arg(short, long = "message", default_values_t = [DEFAULT_MESSAGE.to_string()])]
    messages: Vec<String>,

    /// Overhead header name.
    #[arg(long, default_value = OVERHEAD_HEADER)]
    header: String,

    /// Also print the response body.
    #[arg(long)]
    body: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ClacksConfig {
        header_name: cli.header.clone(),
        messages: cli.messages,
        ..ClacksConfig::default()
    };
    let transport = ClacksTransport::from_config(http_client(), &config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    let mut request = Request::get(cli.url.as_str()).body(String::new())?;
    let response = transport.round_trip(&mut request).await?;

    let status = response.status();
    let header = HeaderName::from_bytes(cli.header.as_bytes())?;
    let received = read_messages(response.headers(), &header);
    let body = if cli.body {
        let bytes = body::to_bytes(Body::new(response.into_body()), usize::MAX).await?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        None
    };

    if cli.json {
        let summary = json!({
            "status": status.as_u16(),
            "sent": config.messages,
            "received": received,
            "body": body,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", status);
    for message in &received {
        println!("{}: {}", cli.header, message);
    }
    if let Some(body) = body {
        println!();
        println!("{}", body);
    }

    Ok(())
}
