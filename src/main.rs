use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kamleads::cli::{self, Cli, Commands};
use kamleads::models::Registration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kamleads=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login { email, password } => {
            cli::commands::login(api_url, &email, password).await
        }
        Commands::Register {
            name,
            email,
            phone,
            role,
            password,
        } => {
            let form = Registration {
                name,
                email,
                phone,
                password: String::new(),
                role,
            };
            cli::commands::register(api_url, form, password).await
        }
        Commands::Logout => cli::commands::logout(api_url).await,
        Commands::Whoami { format } => cli::commands::whoami(api_url, format).await,
        Commands::Restaurants { action } => cli::commands::restaurants(api_url, action).await,
        Commands::Contacts { action } => cli::commands::contacts(api_url, action).await,
        Commands::Interactions { action } => cli::commands::interactions(api_url, action).await,
        Commands::Users { action } => cli::commands::users(api_url, action).await,
        Commands::Metrics { format } => cli::commands::metrics(api_url, format).await,
    }
}
