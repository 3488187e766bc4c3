#[tokio::main]
async fn main() -> anyhow::Result<()> {
    realtime_server::run_server().await
}
