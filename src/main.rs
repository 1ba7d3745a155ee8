mod booking;
mod cli;
pub mod data;
pub(crate) mod entity;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}
