use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lending_catalog::{Catalog, config, seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lending_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // Check for --profile and --export CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|arg| arg == "--profile") {
        Some(pos) => match args.get(pos + 1) {
            Some(profile) => config::Config::with_profile(profile),
            None => return Err("--profile requires a value".into()),
        },
        None => config::Config::from_env(),
    };
    let export = args.iter().any(|arg| arg == "--export");

    tracing::info!(
        "Opening catalog (profile '{}', database {})",
        config.profile,
        config.database_url
    );
    let catalog = Catalog::open(&config.database_url).await?;

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&catalog).await {
            tracing::error!("Failed to seed data: {}", e);
        }
    }

    let snapshot = catalog.snapshot().await?;
    let open_loans = snapshot
        .borrowings
        .iter()
        .filter(|b| b.is_open())
        .count();
    tracing::info!(
        "Catalog holds {} books, {} copies, {} users, {} open borrowings",
        snapshot.books.len(),
        snapshot.copies.len(),
        snapshot.users.len(),
        open_loans
    );

    if export {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    catalog.close().await?;
    Ok(())
}
