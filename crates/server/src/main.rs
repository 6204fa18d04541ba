#[tokio::main]
async fn main() -> anyhow::Result<()> {
    replykit_server::start().await
}
