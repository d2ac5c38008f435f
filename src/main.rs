use clap::Parser;
use orders_app_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::HashPassword(args) => cli::hash_password::run(args),
        Command::IssueToken(args) => cli::issue_token::run(args),
    }
}
