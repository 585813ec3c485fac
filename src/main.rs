//! allegro-auth CLI binary entry point.

use clap::Parser;

use allegro_auth::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login => commands::handle_login(cli.config).await,
        Commands::Status => commands::handle_status(cli.config).await,
        Commands::Logout => commands::handle_logout(cli.config).await,
    };

    if let Err(e) = result {
        eprintln!("Authorization error: {e}");
        std::process::exit(1);
    }
}
