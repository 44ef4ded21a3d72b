//! # File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos. Lee la configuración, instala
//! el logger y el handler de Ctrl-C, y corre el acceptor hasta el apagado.

use file_server::config::Config;
use file_server::server::Server;
use file_server::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .with_target(false)
        .init();

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();

    if let Err(e) = run(config) {
        if e.is_fatal() {
            error!("Could not start server: {}", e);
            std::process::exit(2);
        }
        error!("Server stopped with error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    config.log_summary();

    let server = Server::bind(config)?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || shutdown.trigger())?;

    // Esto bloquea hasta Ctrl-C
    let snapshot = server.run()?;

    info!("Final metrics: {}", snapshot.to_json());

    Ok(())
}
