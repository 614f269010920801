//! # Static Server - Entry Point
//! src/main.rs
//!
//! `static_server [port] [document-root]`

use anyhow::Context;
use clap::Parser;
use static_server::config::Config;
use static_server::server::Server;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            // --help y --version salen con 0; un puerto inválido u otro error, con 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if config.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(config.level().unwrap_or(tracing::Level::INFO))
        .init();

    config.validate().map_err(anyhow::Error::msg)?;
    config.print_summary();

    let server = Server::bind(&config)
        .with_context(|| format!("could not start server on {}", config.address()))?;

    // El handler de señales recibe su propio handle; no hay servidor global
    let handle = server.shutdown_handle();
    ctrlc::set_handler(move || {
        info!("shutdown signal received");
        handle.stop();
    })
    .context("could not install signal handler")?;

    server.run();

    // Las conexiones en curso no se esperan
    info!("server stopped");
    Ok(())
}
