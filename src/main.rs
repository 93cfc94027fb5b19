use clap::Parser;

use airgap::adapter::inbound::cli::{self, command::Cli, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli::configure(&cli);

    if let Err(e) = cli::run(cli).await {
        output::error(&e.to_string());
        std::process::exit(if e.is_rejection() { 3 } else { 1 });
    }
}
