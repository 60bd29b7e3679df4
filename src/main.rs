#[tokio::main]
async fn main() {
    if let Err(e) = carebridge_lib::run().await {
        tracing::error!("{e}");
        eprintln!("carebridge: {e}");
        std::process::exit(1);
    }
}
