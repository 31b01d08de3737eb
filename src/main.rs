#[tokio::main]
async fn main() {
    if let Err(e) = wardbook::run().await {
        eprintln!("wardbook: {e}");
        std::process::exit(1);
    }
}
