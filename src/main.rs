#[tokio::main]
async fn main() -> anyhow::Result<()> {
    guess_the_card::run_bot().await
}
