use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use backup_report::model::ReportResult;

#[derive(Parser)]
#[command(name = "report-cli")]
#[command(about = "Query a running backup-report service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the backup/license report for a domain
    Report {
        domain_id: Uuid,
        /// Page size; 0 returns every user
        #[arg(long, default_value_t = 0)]
        page_size: i32,
        /// 1-based page number; 0 returns every user
        #[arg(long, default_value_t = 0)]
        page_number: i32,
    },
    /// Show service status and license breaker state
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Report {
            domain_id,
            page_size,
            page_number,
        } => {
            let res = client
                .get(format!("{}/domains/{}/report", cli.url, domain_id))
                .query(&[("pageSize", page_size), ("pageNumber", page_number)])
                .send()
                .await?;
            return print_report(res).await;
        }
        Commands::Health => client.get(format!("{}/health", cli.url)).send().await?,
    };

    print_response(res).await
}

/// Print a report as JSON. A rejected request is shown as a failed
/// `ReportResult` carrying the service's message.
async fn print_report(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if res.status() != StatusCode::BAD_REQUEST {
        return print_response(res).await;
    }

    let message = res.text().await?;
    let result = ReportResult::failure(message);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
