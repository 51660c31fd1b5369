#[tokio::main]
async fn main() {
    let code = zapscan::app::startup::startup().await;
    std::process::exit(code);
}
