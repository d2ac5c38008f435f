//! Issue-token command

use clap::Args;
use serde_json::json;

use crate::config::AppConfig;
use crate::domain::UserId;
use crate::infrastructure::auth::TokenIssuer;

#[derive(Debug, Args)]
pub struct IssueTokenArgs {
    /// Numeric id carried in the token's `data.user_id` claim
    #[arg(long)]
    pub user_id: u64,
}

/// Sign a token without checking that the user exists
pub fn run(args: IssueTokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let output = issue(&config, args.user_id)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn issue(config: &AppConfig, user_id: u64) -> anyhow::Result<serde_json::Value> {
    let user_id = UserId::new(user_id)?;
    let issued = crate::create_jwt_service(config).issue(user_id)?;

    Ok(json!({
        "token": issued.token,
        "user_id": user_id.value(),
        "expires_at": issued.claims.expires_at().map(|at| at.to_rfc3339()),
    }))
}
