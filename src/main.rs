//! craftwarden - Minecraft server supervisor daemon
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;

use craftwarden::config::{init_config_file, load_settings};
use craftwarden_core::prelude::*;

/// Supervisor daemon for a Minecraft server with HTTP and push-button control
#[derive(Parser, Debug)]
#[command(name = "craftwarden")]
#[command(about = "Supervise a Minecraft server over HTTP and a physical button", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH", default_value = "craftwarden.toml")]
    config: PathBuf,

    /// Override the HTTP listen address from the config file
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    craftwarden_core::logging::init()?;

    if args.init_config {
        init_config_file(&args.config)?;
        println!("Wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut settings = load_settings(&args.config);
    if let Some(listen) = args.listen {
        settings.http.listen = listen;
    }

    craftwarden::run(settings).await
}
