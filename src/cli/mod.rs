//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `hash-password`: print an Argon2 hash for a users seed file
//! - `issue-token`: sign a token for a user id with the configured secret

pub mod hash_password;
pub mod issue_token;
pub mod serve;

use clap::{Parser, Subcommand};

/// Orders App API - JWT-gated REST endpoints for shop orders
#[derive(Parser)]
#[command(name = "orders-app-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Hash a password for a users seed file
    HashPassword(hash_password::HashPasswordArgs),

    /// Issue a token for a user id
    IssueToken(issue_token::IssueTokenArgs),
}
