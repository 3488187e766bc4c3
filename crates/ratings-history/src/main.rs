#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ratings_history::run_server().await
}
