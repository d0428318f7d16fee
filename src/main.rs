use gemfetch::{Client, Console, OutputSink};

const DEFAULT_TARGET: &str = "gemini://geminiprotocol.net/";

#[tokio::main]
async fn main() {
    env_logger::init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    let mut sink = Console;
    sink.line("==========================");
    sink.line(" gemfetch");
    sink.line("==========================");

    let client = Client::new();
    if let Err(e) = client.fetch(&target, &mut sink).await {
        eprintln!("gemfetch: {e}");
        std::process::exit(1);
    }
}
