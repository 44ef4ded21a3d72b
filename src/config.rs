//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./file_server ./public 8080 --workers 5 --queue-capacity 8
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! SERVE_DIR=./public HTTP_PORT=8080 WORKERS=8 ./file_server
//! ```

use crate::error::{Result, ServerError};
use clap::Parser;
use std::path::Path;
use tracing::info;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "file_server")]
#[command(about = "Servidor HTTP/1.0 concurrente de archivos estáticos")]
#[command(version)]
pub struct Config {
    /// Directorio servido; el recurso pedido se concatena a esta ruta
    #[arg(default_value = ".", env = "SERVE_DIR")]
    pub serve_dir: String,

    /// Puerto en el que escucha el servidor
    #[arg(default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers del pool
    #[arg(long, default_value = "5", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad de la cola de conexiones aceptadas
    #[arg(long = "queue-capacity", default_value = "8", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Máximo de bytes leídos buscando el fin del header
    #[arg(long = "max-request-bytes", default_value = "8192", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Permitir segmentos `..` en el recurso pedido
    #[arg(long = "allow-path-traversal", env = "ALLOW_PATH_TRAVERSAL")]
    pub allow_path_traversal: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(invalid("workers must be >= 1"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue capacity must be >= 1"));
        }
        if self.max_request_bytes < 16 {
            return Err(invalid("max request bytes must be >= 16"));
        }
        if !Path::new(&self.serve_dir).is_dir() {
            return Err(invalid(&format!(
                "serve dir '{}' is not a directory",
                self.serve_dir
            )));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            serve_dir = %self.serve_dir,
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            max_request_bytes = self.max_request_bytes,
            allow_path_traversal = self.allow_path_traversal,
            "Configuration"
        );
    }
}

fn invalid(reason: &str) -> ServerError {
    ServerError::InvalidConfig(reason.to_string())
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            serve_dir: ".".to_string(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            workers: 5,
            queue_capacity: 8,
            max_request_bytes: 8192,
            allow_path_traversal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 5);
        assert_eq!(config.queue_capacity, 8);
        assert!(!config.allow_path_traversal);
    }

    #[test]
    fn test_address_custom() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..Config::default()
        };
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_validate_invalid_queue_capacity() {
        let config = Config {
            queue_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("queue capacity"));
    }

    #[test]
    fn test_validate_tiny_request_buffer() {
        let config = Config {
            max_request_bytes: 4,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_serve_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            serve_dir: dir.path().join("nope").to_str().unwrap().to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_positional_arguments() {
        let config = Config::try_parse_from([
            "file_server",
            "/srv/www",
            "9090",
            "--workers",
            "3",
            "--queue-capacity",
            "2",
            "--allow-path-traversal",
        ])
        .unwrap();

        assert_eq!(config.serve_dir, "/srv/www");
        assert_eq!(config.port, 9090);
        assert_eq!(config.workers, 3);
        assert_eq!(config.queue_capacity, 2);
        assert!(config.allow_path_traversal);
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        Config::default().log_summary();
    }
}
