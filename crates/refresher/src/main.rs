#[tokio::main]
async fn main() -> anyhow::Result<()> {
    refresher::run().await
}
