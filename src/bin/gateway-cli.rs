use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the tenant gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_ADMIN_URL", default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, env = "GATEWAY_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List tenants
    Tenants,
    /// Show one tenant with its pages
    Tenant { subdomain: String },
    /// Remove a tenant
    Remove { subdomain: String },
    /// Show how a request would be routed
    Explain {
        host: String,
        #[arg(default_value = "/")]
        path: String,
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", cli.url)),
        Commands::Tenants => client.get(format!("{}/admin/tenants", cli.url)),
        Commands::Tenant { subdomain } => client.get(format!("{}/admin/tenants/{}", cli.url, subdomain)),
        Commands::Remove { subdomain } => client.delete(format!("{}/admin/tenants/{}", cli.url, subdomain)),
        Commands::Explain { host, path, query } => {
            let mut params = vec![("host", host), ("path", path)];
            if let Some(query) = query {
                params.push(("query", query));
            }
            client.get(format!("{}/admin/explain", cli.url)).query(&params)
        }
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }
    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
