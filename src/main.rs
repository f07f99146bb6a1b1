use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    stepwright_cli::cli::app::run().await
}
