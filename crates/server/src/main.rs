#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hrchat_server::start().await
}
