use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "employee-cli")]
#[command(about = "Management CLI for the Employee Service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// List active employees
    List,
    /// Show one employee
    Get { id: u64 },
    /// Search employees by name
    Search { name: String },
    /// Fetch a record from the external service
    FetchExternal { query: String },
    /// Send a stored employee to the external service
    ForwardExternal { id: u64 },
    /// Show circuit breaker states
    Breakers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{base}/health")).send().await?,
        Commands::List => client.get(format!("{base}/api/employees")).send().await?,
        Commands::Get { id } => client.get(format!("{base}/api/employees/{id}")).send().await?,
        Commands::Search { name } => {
            client
                .get(format!("{base}/api/employees/search/{name}"))
                .send()
                .await?
        }
        Commands::FetchExternal { query } => {
            client
                .get(format!("{base}/api/employees/external/{query}"))
                .send()
                .await?
        }
        Commands::ForwardExternal { id } => {
            client
                .post(format!("{base}/api/employees/external/{id}"))
                .send()
                .await?
        }
        Commands::Breakers => {
            client
                .get(format!("{base}/admin/circuit-breakers"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    // External payloads are relayed verbatim and may not be JSON.
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
