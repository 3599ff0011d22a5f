use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use ballot_types::VoteType;

#[derive(Debug, Parser)]
#[command(name = "ballot", version, about = "Vote on RFCs and argue your position")]
pub struct Cli {
    /// SQLite database file (overrides BALLOT_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or inspect accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Create or inspect proposals
    #[command(subcommand)]
    Rfc(RfcCommand),

    /// Cast or change a vote
    Vote {
        user: Uuid,
        rfc: Uuid,
        /// `yes` or `no`
        vote_type: VoteType,
    },

    /// Write or rewrite an argument on an Rfc
    Argue { user: Uuid, rfc: Uuid, body: String },

    /// Upvote an argument, or retract an existing upvote
    Upvote { user: Uuid, argument: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Add {
        name: String,
        email: String,
        /// Read from BALLOT_PASSWORD when omitted
        #[arg(env = "BALLOT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Show {
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
pub enum RfcCommand {
    Add { title: String },
    Show { id: Uuid },
    List,
}
