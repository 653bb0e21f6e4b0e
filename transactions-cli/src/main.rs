//! Transactions CLI
//!
//! Command-line interface for the Transactions API.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use transactions_client::TransactionsClient;
use transactions_types::{CreateTransactionRequest, HealthStatus, TransactionId};

#[derive(Parser)]
#[command(name = "transactions")]
#[command(author, version, about = "Transactions API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Transactions API
    #[arg(
        long,
        env = "TRANSACTIONS_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a purchase transaction
    Create {
        /// Description, at most 50 characters
        #[arg(long)]
        description: String,
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Purchase amount in USD
        #[arg(long)]
        amount: Decimal,
    },
    /// Retrieve a transaction, optionally converted to another currency
    Get {
        /// Transaction ID (UUID)
        id: String,
        /// Treasury currency descriptor, e.g. "Brazil-Real"
        #[arg(long)]
        currency: Option<String>,
    },
    /// Check API health
    Health,
}

fn parse_transaction_id(s: &str) -> Result<TransactionId> {
    s.parse()
        .with_context(|| format!("Invalid transaction id: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = TransactionsClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let report = client.health().await?;
            if report.status == HealthStatus::Up {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Create {
            description,
            date,
            amount,
        } => {
            let req = CreateTransactionRequest::new(description, date, amount);
            let created = client.create_transaction(&req).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Commands::Get { id, currency } => {
            let id = parse_transaction_id(&id)?;
            let tx = client
                .get_converted_transaction(id, currency.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
    }

    Ok(())
}
