mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use donelist::web::ServeOptions;

#[derive(Parser)]
#[command(
    name = "donelist",
    version,
    about = "Small shared to-do board with user accounts"
)]
struct Cli {
    /// Path to the database file
    #[arg(long, env = "DONELIST_DB", default_value = "database.db", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,
    /// Run the web server
    Serve {
        /// Address to bind
        #[arg(long, env = "DONELIST_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "DONELIST_PORT", default_value_t = 5000)]
        port: u16,
        /// bcrypt work factor for new passwords (4-31)
        #[arg(long, env = "DONELIST_BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST,
              value_parser = clap::value_parser!(u32).range(4..=31))]
        bcrypt_cost: u32,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("donelist=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(&cli.db),
        Commands::Serve {
            host,
            port,
            bcrypt_cost,
        } => commands::serve::run(
            &cli.db,
            &ServeOptions {
                host,
                port,
                bcrypt_cost,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
