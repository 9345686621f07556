//! Ember
//!
//! A minimal code editor that hands compile and run off to an external
//! toolchain.

mod app;
mod config;
mod input;
mod layout;
mod renderer;

use std::error::Error;

use app::App;
use clap::Parser;
use config::{CliArgs, Config};

fn main() -> Result<(), Box<dyn Error>> {
    // "warn" by default; RUST_LOG=info shows saves, builds and listings
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    // Precedence: CLI > env > file > defaults
    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    log::debug!("Theme: {:?}", config.theme);
    log::debug!("Compiler: {} in {}", config.toolchain.compiler, config.toolchain.work_dir.display());

    let app = App::new(config)?;
    app.run()?;

    log::debug!("Ember exited");
    Ok(())
}
