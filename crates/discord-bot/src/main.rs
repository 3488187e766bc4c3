#[tokio::main]
async fn main() -> anyhow::Result<()> {
    discord_bot::run().await
}
