//! Client manager CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! client-manager migrate
//!
//! # Create a user (add --admin for an administrator)
//! client-manager user create -n "Maria Souza" -e maria@example.com -p 's3cret-pass' --admin
//! ```
//!
//! Both commands read the database settings the server uses
//! (`CLIENT_MANAGER_DATABASE_URL`, `DATABASE_URL`, or the `DATABASE_*` parts).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "client-manager")]
#[command(author, version, about = "client-manager CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name (5-100 characters)
        #[arg(short, long)]
        name: String,

        /// Email address, used to log in
        #[arg(short, long)]
        email: String,

        /// Password (8-100 characters)
        #[arg(short, long)]
        password: String,

        /// Grant admin privileges
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                admin,
            } => {
                commands::user::create(name, email, password, admin).await?;
            }
        },
    }
    Ok(())
}
