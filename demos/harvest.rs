//! Run a full Finna harvest into a timestamped TSV file
//!
//! Usage: cargo run --release --example harvest
//!
//! Set OUTPUT_DIR to change where the TSV lands (default: ./output).

use finna_harvest::{Config, Harvester, TsvImageStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string());
    std::fs::create_dir_all(&output_dir)?;

    let config = Config::default();
    let store = TsvImageStore::new(&output_dir, &config.provider);

    println!("═══════════════════════════════════════════════════════════");
    println!("  finna-harvest");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Endpoint: {}", config.endpoint);
    println!("  Buildings: {}", config.buildings.len());
    println!("  Output: {}", store.path().display());
    println!("═══════════════════════════════════════════════════════════");

    let harvester = Harvester::new(config, store)?;
    let total = harvester.run().await?;

    println!("harvested {total} image records");
    println!("output file: {}", harvester.store().path().display());
    Ok(())
}
