/// src/main.rs - Application entry point for the OpenRouter model explorer.

use clap::Parser;
use openrouter_model_explorer::{Config, Explorer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let explorer = Explorer::new(config)?;
    explorer.run().await?;
    Ok(())
}
