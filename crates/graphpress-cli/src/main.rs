//! graphpress inspection CLI.
//!
//! Provides the `graphpress` binary for reading a forum database offline.
//! Every subcommand runs the same `GraphService` read operation the HTTP
//! server uses and prints its JSON to stdout.

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use graphpress_server::error::ApiError;
use graphpress_server::schema::forum::ThreadListResponse;
use graphpress_server::schema::profile::ProfileResponse;
use graphpress_server::service::GraphService;

/// Offline tools for graphpress forum databases.
#[derive(Parser)]
#[command(name = "graphpress", about = "Inspect a graphpress forum database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every thread with its contributors.
    Threads {
        /// Path to the forum database file.
        #[arg(short, long)]
        db: String,
    },
    /// Print one thread and its messages.
    Thread {
        /// Path to the forum database file.
        #[arg(short, long)]
        db: String,

        /// Thread ID (32 hex characters).
        #[arg(short, long)]
        id: String,
    },
    /// Print a user's public profile.
    Profile {
        /// Path to the forum database file.
        #[arg(short, long)]
        db: String,

        /// User ID (32 hex characters).
        #[arg(short, long)]
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(cli.command));
}

/// Executes one subcommand.
///
/// Returns exit code: 0 = success, 1 = not found or invalid input,
/// 3 = I/O or database error.
fn run(command: Commands) -> i32 {
    let db_path = match &command {
        Commands::Threads { db } | Commands::Thread { db, .. } | Commands::Profile { db, .. } => {
            db.as_str()
        }
    };

    // Opening a missing path would create an empty database.
    if !Path::new(db_path).is_file() {
        eprintln!("Error: database '{}' does not exist", db_path);
        return 3;
    }
    let service = match GraphService::new(db_path) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            return 3;
        }
    };

    let result = match &command {
        Commands::Threads { .. } => service
            .list_threads()
            .and_then(|threads| render(&ThreadListResponse { threads })),
        Commands::Thread { id, .. } => service
            .get_thread(Some(id.as_str()))
            .and_then(|view| render(&view)),
        Commands::Profile { id, .. } => service
            .get_profile(Some(id.as_str()))
            .and_then(|profile| render(&ProfileResponse { profile })),
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e.public_message());
            exit_code(&e)
        }
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Internal(e.to_string()))
}

fn exit_code(error: &ApiError) -> i32 {
    match error {
        ApiError::Internal(_) => 3,
        _ => 1,
    }
}
