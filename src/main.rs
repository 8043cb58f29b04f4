#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    localmart::server::run().await
}
