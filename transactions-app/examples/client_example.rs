//! Client example: store a purchase and read it back in other currencies.
//!
//! Run with: cargo run -p transactions-app --example client_example

use chrono::NaiveDate;
use exchange_rates::RateProvider;
use rust_decimal_macros::dec;
use tempfile::tempdir;
use tokio::net::TcpListener;
use transactions_client::TransactionsClient;
use transactions_hex::{TransactionService, inbound::HttpServer};
use transactions_repo::build_repo;
use transactions_types::CreateTransactionRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Bind first so the port is reserved before the client connects
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_url = format!("sqlite://{}", tmp.path().join("transactions.db").display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url).await?;
    let service = TransactionService::new(repo, RateProvider::fixed());
    tokio::spawn(HttpServer::new(service).serve(listener));

    let client = TransactionsClient::new(format!("http://{addr}"));

    let health = client.health().await?;
    println!("✅ Server health: {:?}", health.status);

    let date = NaiveDate::from_ymd_opt(2024, 8, 20).ok_or_else(|| anyhow::anyhow!("bad date"))?;
    let created = client
        .create_transaction(&CreateTransactionRequest::new(
            "New keyboard for home office",
            date,
            dec!(150.75),
        ))
        .await?;
    println!("✅ Stored transaction {}", created.id);

    for currency in [None, Some("Brazil-Real"), Some("Euro Zone-Euro")] {
        match client.get_converted_transaction(created.id, currency).await {
            Ok(tx) => println!(
                "   {:<16} rate {:>8} → {}",
                currency.unwrap_or("USD"),
                tx.exchange_rate,
                tx.converted_amount
            ),
            Err(e) => println!("   {:<16} {}", currency.unwrap_or("USD"), e),
        }
    }

    // A currency with no published rate is reported, not converted
    let err = client
        .get_converted_transaction(created.id, Some("Atlantis-Shell"))
        .await;
    if let Err(e) = err {
        println!("✅ Unknown currency rejected: {e}");
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
