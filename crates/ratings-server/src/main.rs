#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ratings_server::run_server().await
}
