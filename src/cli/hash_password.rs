//! Hash-password command

use clap::Args;

use crate::domain::user::validate_password;
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher};

#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Plain text password to hash
    #[arg(long)]
    pub password: String,
}

pub fn run(args: HashPasswordArgs) -> anyhow::Result<()> {
    println!("{}", hash(&args.password)?);
    Ok(())
}

fn hash(password: &str) -> anyhow::Result<String> {
    validate_password(password)?;
    Ok(Argon2Hasher::new().hash(password)?)
}
