//! Quire CLI
//!
//! ```bash
//! quire serve --config quire.toml
//! quire permissions --role editor
//! quire check --role user content:publish
//! quire hash-password 'secret'
//! ```
//!
//! See `quire --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quire", about = "Quire access control server and tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Config file (missing file means defaults + environment)
        #[arg(long, short, default_value = quire_core::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// List the permission catalog, or one role's permissions
    Permissions {
        /// user, editor or admin
        #[arg(long)]
        role: Option<String>,
    },

    /// Check whether a role holds a permission (exit code 2 when denied)
    Check {
        #[arg(long)]
        role: String,

        /// Permission identifier, e.g. `content:publish`
        permission: String,
    },

    /// Print an Argon2 hash for a `[[users]]` entry
    HashPassword { password: String },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config } => commands::serve::run(&config),
        Commands::Permissions { role } => commands::permissions::list(role.as_deref()).map(|out| print!("{}", out)),
        Commands::Check { role, permission } => match commands::permissions::check(&role, &permission) {
            Ok(true) => {
                println!("allowed: {} has {}", role, permission);
                Ok(())
            }
            Ok(false) => {
                println!("denied: {} lacks {}", role, permission);
                std::process::exit(2);
            }
            Err(e) => Err(e),
        },
        Commands::HashPassword { password } => commands::hash_password::run(&password).map(|hash| println!("{}", hash)),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
