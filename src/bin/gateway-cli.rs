use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the Stubo gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all scenarios
    Scenarios,
    /// List the stubs of a scenario
    Stublist {
        #[arg(short, long)]
        scenario: String,
    },
    /// Show one delay policy, or all when no name is given
    DelayPolicies {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Begin a record or playback session
    BeginSession {
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        session: String,
        #[arg(long, default_value = "playback")]
        mode: String,
    },
    /// End all sessions of a scenario
    EndSessions {
        #[arg(short, long)]
        scenario: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Scenarios => {
            let res = client
                .get(format!("{}/gateway/get/scenarios", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Stublist { scenario } => {
            let res = client
                .get(format!("{}/gateway/get/stublist", cli.url))
                .query(&[("scenario", scenario)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::DelayPolicies { name } => {
            let mut req = client.get(format!("{}/gateway/get/delay_policy", cli.url));
            if let Some(name) = name {
                req = req.query(&[("name", name)]);
            }
            print_response(req.send().await?).await?;
        }
        Commands::BeginSession {
            scenario,
            session,
            mode,
        } => {
            let res = client
                .get(format!("{}/gateway/begin/session", cli.url))
                .query(&[
                    ("scenario", scenario),
                    ("session", session),
                    ("mode", mode),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::EndSessions { scenario } => {
            let res = client
                .get(format!("{}/gateway/end/sessions", cli.url))
                .query(&[("scenario", scenario)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
