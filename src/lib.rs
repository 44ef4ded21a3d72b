//! # File Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 concurrente de archivos estáticos. Un pool fijo de
//! workers drena las conexiones aceptadas desde una cola acotada
//! thread-safe, lee la request line, busca el archivo bajo el directorio
//! servido y responde con el archivo o con un 404.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `queue`: Cola circular acotada con enqueue/dequeue bloqueantes y shutdown
//! - `http`: Lectura del request y envío de la respuesta (HTTP/1.0)
//! - `server`: Acceptor, pool de workers y coordinación del apagado
//! - `metrics`: Contadores de conexiones y respuestas
//! - `config`: Configuración por CLI y variables de entorno
//! - `error`: Taxonomía de errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use file_server::config::Config;
//! use file_server::server::Server;
//!
//! let config = Config {
//!     serve_dir: "./public".to_string(),
//!     ..Config::default()
//! };
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod queue;
pub mod server;

pub use error::{Result, ServerError};
