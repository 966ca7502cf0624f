use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "node-cli")]
#[command(about = "Send commands to a running node daemon", long_about = None)]
struct Cli {
    /// Base URL of the daemon's command API
    #[arg(short, long, default_value = "http://127.0.0.1:3453")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the node's peer ID and addresses
    Id,
    /// Show the daemon version
    Version,
    /// List swarm listen addresses
    SwarmAddrs,
    /// Echo a message through the daemon
    Echo { message: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api", cli.url.trim_end_matches('/'));

    let request = match &cli.command {
        Commands::Id => client.post(format!("{}/id", base)),
        Commands::Version => client.post(format!("{}/version", base)),
        Commands::SwarmAddrs => client.post(format!("{}/swarm/addrs", base)),
        Commands::Echo { message } => client
            .post(format!("{}/echo", base))
            .query(&[("arg", message.as_str())]),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        let message = json["Message"].as_str().unwrap_or("unknown error");
        eprintln!("Error: {} ({})", message, status);
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
