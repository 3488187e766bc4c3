#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ticker_server::run_server().await
}
